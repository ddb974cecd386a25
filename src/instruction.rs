//! # instruction
//!
//! Every CHIP-8 instruction is two bytes, big-endian, split into nibbles:
//!
//! ```text
//!  15..12  11..8   7..4   3..0
//!  family    x       y      n
//!                  `---nn----'
//!          `-------nnn------'
//! ```
//!
//! Decoding into fields is total; classifying the fields into an `Op` is
//! where unknown encodings turn up, as `Op::Unknown`.
use std::fmt;

/// raw fields of one instruction word
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub raw: u16,
    /// top nibble, the operation family
    pub family: u8,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Instruction {
    pub fn decode(raw: u16) -> Self {
        Instruction {
            raw,
            family: (raw >> 12) as u8,
            x: ((raw >> 8) & 0x0f) as usize,
            y: ((raw >> 4) & 0x0f) as usize,
            n: (raw & 0x000f) as u8,
            nn: (raw & 0x00ff) as u8,
            nnn: raw & 0x0fff,
        }
    }

    pub fn op(&self) -> Op {
        Op::from(*self)
    }
}

/// the 35 behaviours the interpreter knows, plus everything else
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ClearScreen,                               // 00E0
    Return,                                    // 00EE
    Jump { nnn: u16 },                         // 1NNN
    Call { nnn: u16 },                         // 2NNN
    SkipEqImm { x: usize, nn: u8 },            // 3XNN
    SkipNeqImm { x: usize, nn: u8 },           // 4XNN
    SkipEqReg { x: usize, y: usize },          // 5XY0
    LoadImm { x: usize, nn: u8 },              // 6XNN
    AddImm { x: usize, nn: u8 },               // 7XNN
    LoadReg { x: usize, y: usize },            // 8XY0
    Or { x: usize, y: usize },                 // 8XY1
    And { x: usize, y: usize },                // 8XY2
    Xor { x: usize, y: usize },                // 8XY3
    AddReg { x: usize, y: usize },             // 8XY4
    SubXY { x: usize, y: usize },              // 8XY5
    ShiftRight { x: usize },                   // 8XY6
    SubYX { x: usize, y: usize },              // 8XY7
    ShiftLeft { x: usize },                    // 8XYE
    SkipNeqReg { x: usize, y: usize },         // 9XY0
    LoadIndex { nnn: u16 },                    // ANNN
    JumpOffset { nnn: u16 },                   // BNNN
    RandomAnd { x: usize, nn: u8 },            // CXNN
    Draw { x: usize, y: usize, n: u8 },        // DXYN
    SkipKeyPressed { x: usize },               // EX9E
    SkipKeyNotPressed { x: usize },            // EXA1
    LoadDelay { x: usize },                    // FX07
    WaitKey { x: usize },                      // FX0A
    StoreDelay { x: usize },                   // FX15
    StoreSound { x: usize },                   // FX18
    AddIndex { x: usize },                     // FX1E
    FontAddr { x: usize },                     // FX29
    StoreBcd { x: usize },                     // FX33
    DumpRegs { x: usize },                     // FX55
    LoadRegs { x: usize },                     // FX65
    Unknown(u16),
}

impl From<Instruction> for Op {
    fn from(i: Instruction) -> Self {
        let (x, y, n, nn, nnn) = (i.x, i.y, i.n, i.nn, i.nnn);
        match (i.family, n) {
            (0x0, _) => match nnn {
                0x0e0 => Op::ClearScreen,
                0x0ee => Op::Return,
                _ => Op::Unknown(i.raw),
            },
            (0x1, _) => Op::Jump { nnn },
            (0x2, _) => Op::Call { nnn },
            (0x3, _) => Op::SkipEqImm { x, nn },
            (0x4, _) => Op::SkipNeqImm { x, nn },
            (0x5, 0x0) => Op::SkipEqReg { x, y },
            (0x6, _) => Op::LoadImm { x, nn },
            (0x7, _) => Op::AddImm { x, nn },
            (0x8, 0x0) => Op::LoadReg { x, y },
            (0x8, 0x1) => Op::Or { x, y },
            (0x8, 0x2) => Op::And { x, y },
            (0x8, 0x3) => Op::Xor { x, y },
            (0x8, 0x4) => Op::AddReg { x, y },
            (0x8, 0x5) => Op::SubXY { x, y },
            (0x8, 0x6) => Op::ShiftRight { x },
            (0x8, 0x7) => Op::SubYX { x, y },
            (0x8, 0xe) => Op::ShiftLeft { x },
            (0x9, 0x0) => Op::SkipNeqReg { x, y },
            (0xa, _) => Op::LoadIndex { nnn },
            (0xb, _) => Op::JumpOffset { nnn },
            (0xc, _) => Op::RandomAnd { x, nn },
            (0xd, _) => Op::Draw { x, y, n },
            (0xe, _) => match nn {
                0x9e => Op::SkipKeyPressed { x },
                0xa1 => Op::SkipKeyNotPressed { x },
                _ => Op::Unknown(i.raw),
            },
            (0xf, _) => match nn {
                0x07 => Op::LoadDelay { x },
                0x0a => Op::WaitKey { x },
                0x15 => Op::StoreDelay { x },
                0x18 => Op::StoreSound { x },
                0x1e => Op::AddIndex { x },
                0x29 => Op::FontAddr { x },
                0x33 => Op::StoreBcd { x },
                0x55 => Op::DumpRegs { x },
                0x65 => Op::LoadRegs { x },
                _ => Op::Unknown(i.raw),
            },
            _ => Op::Unknown(i.raw),
        }
    }
}

/// Cowgod-style mnemonics, for trace logging
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Op::ClearScreen => write!(f, "CLS"),
            Op::Return => write!(f, "RET"),
            Op::Jump { nnn } => write!(f, "JP {:03X}", nnn),
            Op::Call { nnn } => write!(f, "CALL {:03X}", nnn),
            Op::SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:02X}", x, nn),
            Op::SkipNeqImm { x, nn } => write!(f, "SNE V{:X}, {:02X}", x, nn),
            Op::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Op::LoadImm { x, nn } => write!(f, "LD V{:X}, {:02X}", x, nn),
            Op::AddImm { x, nn } => write!(f, "ADD V{:X}, {:02X}", x, nn),
            Op::LoadReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Op::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Op::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Op::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Op::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Op::SubXY { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Op::ShiftRight { x } => write!(f, "SHR V{:X}", x),
            Op::SubYX { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Op::ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            Op::SkipNeqReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Op::LoadIndex { nnn } => write!(f, "LD I, {:03X}", nnn),
            Op::JumpOffset { nnn } => write!(f, "JP V0, {:03X}", nnn),
            Op::RandomAnd { x, nn } => write!(f, "RND V{:X}, {:02X}", x, nn),
            Op::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Op::SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Op::SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Op::LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Op::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Op::StoreDelay { x } => write!(f, "LD DT, V{:X}", x),
            Op::StoreSound { x } => write!(f, "LD ST, V{:X}", x),
            Op::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Op::FontAddr { x } => write!(f, "LD F, V{:X}", x),
            Op::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Op::DumpRegs { x } => write!(f, "LD [I], V{:X}", x),
            Op::LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Op::Unknown(raw) => write!(f, "??? {:04X}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        let i = Instruction::decode(0xd5a7);
        assert_eq!(i.family, 0xd);
        assert_eq!(i.x, 0x5);
        assert_eq!(i.y, 0xa);
        assert_eq!(i.n, 0x7);
        assert_eq!(i.nn, 0xa7);
        assert_eq!(i.nnn, 0x5a7);
    }

    #[test]
    fn test_every_word_decodes_consistently() {
        for raw in 0..=u16::MAX {
            let i = Instruction::decode(raw);
            let rebuilt = (u16::from(i.family) << 12) | ((i.x as u16) << 8) | (i.nn as u16);
            assert_eq!(rebuilt, raw);
            assert_eq!(i.nnn, raw & 0x0fff);
            assert_eq!(i.n, i.nn & 0x0f);
            assert_eq!(i.y as u8, i.nn >> 4);
        }
    }

    #[test]
    fn test_classify_system_family() {
        assert_eq!(Instruction::decode(0x00e0).op(), Op::ClearScreen);
        assert_eq!(Instruction::decode(0x00ee).op(), Op::Return);
        // machine code routines are not supported
        assert_eq!(Instruction::decode(0x0123).op(), Op::Unknown(0x0123));
        assert_eq!(Instruction::decode(0x0000).op(), Op::Unknown(0x0000));
    }

    #[test]
    fn test_classify_alu_family() {
        assert_eq!(Instruction::decode(0x8124).op(), Op::AddReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8125).op(), Op::SubXY { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8127).op(), Op::SubYX { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x8126).op(), Op::ShiftRight { x: 1 });
        assert_eq!(Instruction::decode(0x812e).op(), Op::ShiftLeft { x: 1 });
        assert_eq!(Instruction::decode(0x8128).op(), Op::Unknown(0x8128));
    }

    #[test]
    fn test_classify_register_compare_needs_zero_low_nibble() {
        assert_eq!(Instruction::decode(0x5120).op(), Op::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x5121).op(), Op::Unknown(0x5121));
        assert_eq!(Instruction::decode(0x9120).op(), Op::SkipNeqReg { x: 1, y: 2 });
        assert_eq!(Instruction::decode(0x912f).op(), Op::Unknown(0x912f));
    }

    #[test]
    fn test_classify_misc_family() {
        assert_eq!(Instruction::decode(0xe39e).op(), Op::SkipKeyPressed { x: 3 });
        assert_eq!(Instruction::decode(0xe3a1).op(), Op::SkipKeyNotPressed { x: 3 });
        assert_eq!(Instruction::decode(0xe3a2).op(), Op::Unknown(0xe3a2));
        assert_eq!(Instruction::decode(0xf40a).op(), Op::WaitKey { x: 4 });
        assert_eq!(Instruction::decode(0xf433).op(), Op::StoreBcd { x: 4 });
        assert_eq!(Instruction::decode(0xf4ff).op(), Op::Unknown(0xf4ff));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x2300).op().to_string(), "CALL 300");
        assert_eq!(Instruction::decode(0xd01f).op().to_string(), "DRW V0, V1, F");
        assert_eq!(Instruction::decode(0xfa65).op().to_string(), "LD VA, [I]");
        assert_eq!(Instruction::decode(0x0abc).op().to_string(), "??? 0ABC");
    }
}
