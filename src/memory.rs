use crate::error::Chip8Error;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the flat address space the interpreter reads and writes.
/// Every access is bounds-checked; nothing wraps silently.
pub trait MemoryMap {
    /// write a chunk of bytes into RAM
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (an instruction)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    fn get_byte(&self, addr: u16) -> Result<u8, Chip8Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// addresses are 12 bits wide
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex digit glyphs live, and how tall each one is
pub const CHIP8_FONT_ADDR: u16 = 0x0000;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// The 4K CHIP-8 memory map:
///   0x0000-0x004f  font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  unused (the interpreter lived here on the COSMAC VIP)
///   0x0200-0x0fff  program
///
/// Unlike the original machine the stack, timers and display are not in
/// addressable memory; they are fields of the interpreter.
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = self.check(addr, len)?;
        Ok(&mut self.bytes[a..(a + len)])
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = self.check(addr, len)?;
        Ok(&self.bytes[a..(a + len)])
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font set baked in
    pub fn new() -> Result<Self, Chip8Error> {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_addr: CHIP8_FONT_ADDR,
        };
        mm.write(&CHIP8_FONT, mm.font_addr)?;
        Ok(mm)
    }

    /// load a raw CHIP-8 program at 0x200; no header, no checksum
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let max = CHIP8_RAM_SIZE_BYTES - self.program_addr as usize;
        if buf.len() > max {
            return Err(Chip8Error::RomTooLarge {
                len: buf.len(),
                max,
            });
        }
        self.write(&buf, self.program_addr)?;
        Ok(buf.len())
    }

    /// address of the glyph for hex digit `digit`
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        self.font_addr + u16::from(digit) * CHIP8_FONT_GLYPH_BYTES
    }

    fn check(&self, addr: u16, len: usize) -> Result<usize, Chip8Error> {
        let a = addr as usize;
        if a + len > self.bytes.len() {
            return Err(Chip8Error::MemoryOutOfBounds { addr, len });
        }
        Ok(a)
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
