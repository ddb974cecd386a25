//! # interpreter
//!
//! The architectural state of the machine and the instruction set that
//! mutates it. The COSMAC VIP kept the stack, timers and display buffer in
//! RAM; here they are plain fields:
//!
//!  * V0-VF  16 byte registers; VF is overwritten by arithmetic, shifts and
//!           draws to report carry, borrow, shifted-out bit or collision
//!  * I      index register, only ever dereferenced as a 12 bit address
//!  * PC     program counter, 0x200 at reset, kept to 12 bits
//!  * stack  return addresses, 16 deep
//!  * DT/ST  delay and sound timers, counted down at 60Hz by the scheduler
//!  * keypad 16 latches owned by whoever feeds input
//!  * 64x32 framebuffer
//!
//! `cycle()` is one fetch-decode-execute. It never blocks: the wait-for-key
//! instruction returns `Step::AwaitKey` and the scheduler suspends.
use crate::error::Chip8Error;
use crate::framebuffer::{DrawPolicy, Framebuffer};
use crate::input::Keypad;
use crate::instruction::{Instruction, Op};
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_ADDR_MASK};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

/// the flag register
const VF: usize = 0xf;

/// what the scheduler should do after an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// opcode not in the instruction set; skipped
    Unimplemented(u16),
    /// suspend until a key goes down, then store it in Vx
    AwaitKey { x: usize },
}

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    v: [u8; REGISTER_COUNT],
    i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    keypad: Keypad,
    framebuffer: Framebuffer,
    draw_policy: DrawPolicy,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// reset state; `seed` makes the random instruction repeatable
    pub fn new(draw_policy: DrawPolicy, seed: Option<u64>) -> Result<Chip8Interpreter, Chip8Error> {
        let memory = Chip8MemoryMap::new()?;
        let program_counter = memory.program_addr;
        Ok(Chip8Interpreter {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            program_counter,
            stack: Vec::with_capacity(STACK_DEPTH),
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
            draw_policy,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
        })
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        self.memory.load_program(reader)
    }

    /// the instruction at PC, without moving PC
    pub fn fetch(&self) -> Result<Instruction, Chip8Error> {
        Ok(Instruction::decode(self.memory.get_word(self.program_counter)?))
    }

    /// fetch, advance PC past the instruction, execute
    pub fn cycle(&mut self) -> Result<Step, Chip8Error> {
        let ins = self.fetch()?;
        trace!("{:03x}: {:04x}  {}", self.program_counter, ins.raw, ins.op());
        self.program_counter = (self.program_counter + 2) & CHIP8_ADDR_MASK;
        self.execute(ins)
    }

    /// Run one decoded instruction. PC must already point past it; jumps,
    /// calls, returns and skips adjust it from there.
    pub fn execute(&mut self, ins: Instruction) -> Result<Step, Chip8Error> {
        match ins.op() {
            Op::ClearScreen => self.framebuffer.clear(),
            Op::Return => {
                self.program_counter = self.stack.pop().ok_or(Chip8Error::StackUnderflow {
                    pc: self.fault_pc(),
                    opcode: ins.raw,
                })?;
            }
            Op::Jump { nnn } => self.program_counter = nnn,
            Op::Call { nnn } => {
                if self.stack.len() == STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow {
                        pc: self.fault_pc(),
                        opcode: ins.raw,
                    });
                }
                self.stack.push(self.program_counter);
                self.program_counter = nnn;
            }
            Op::SkipEqImm { x, nn } => self.skip_if(self.v[x] == nn),
            Op::SkipNeqImm { x, nn } => self.skip_if(self.v[x] != nn),
            Op::SkipEqReg { x, y } => self.skip_if(self.v[x] == self.v[y]),
            Op::SkipNeqReg { x, y } => self.skip_if(self.v[x] != self.v[y]),
            Op::LoadImm { x, nn } => self.v[x] = nn,
            Op::AddImm { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Op::LoadReg { x, y } => self.v[x] = self.v[y],
            Op::Or { x, y } => self.v[x] |= self.v[y],
            Op::And { x, y } => self.v[x] &= self.v[y],
            Op::Xor { x, y } => self.v[x] ^= self.v[y],
            // the flag is always written after the result, so VF as a
            // destination ends up holding the flag
            Op::AddReg { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry as u8);
            }
            Op::SubXY { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx >= vy) as u8);
            }
            Op::SubYX { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy >= vx) as u8);
            }
            Op::ShiftRight { x } => {
                let vx = self.v[x];
                self.set_with_flag(x, vx >> 1, vx & 0x01);
            }
            Op::ShiftLeft { x } => {
                let vx = self.v[x];
                self.set_with_flag(x, vx << 1, (vx & 0x80) >> 7);
            }
            Op::LoadIndex { nnn } => self.i = nnn,
            Op::JumpOffset { nnn } => {
                self.program_counter = (nnn + u16::from(self.v[0])) & CHIP8_ADDR_MASK
            }
            Op::RandomAnd { x, nn } => self.v[x] = self.rng.gen::<u8>() & nn,
            Op::Draw { x, y, n } => {
                let sprite = self.memory.get_ro_slice(self.index_addr(), n as usize)?;
                let (vx, vy) = (self.v[x], self.v[y]);
                let collision = self.framebuffer.draw_sprite(vx, vy, sprite, self.draw_policy);
                self.v[VF] = collision as u8;
            }
            Op::SkipKeyPressed { x } => self.skip_if(self.keypad.is_pressed(self.v[x])),
            Op::SkipKeyNotPressed { x } => self.skip_if(!self.keypad.is_pressed(self.v[x])),
            Op::WaitKey { x } => return Ok(Step::AwaitKey { x }),
            Op::LoadDelay { x } => self.v[x] = self.delay_timer,
            Op::StoreDelay { x } => self.delay_timer = self.v[x],
            Op::StoreSound { x } => self.sound_timer = self.v[x],
            Op::AddIndex { x } => self.i = (self.i + u16::from(self.v[x])) & CHIP8_ADDR_MASK,
            Op::FontAddr { x } => self.i = self.memory.glyph_addr(self.v[x]),
            Op::StoreBcd { x } => {
                let (vx, addr) = (self.v[x], self.index_addr());
                self.memory.write(&[vx / 100, (vx / 10) % 10, vx % 10], addr)?;
            }
            // both cover V0 through Vx inclusive and leave I alone
            Op::DumpRegs { x } => {
                let addr = self.index_addr();
                self.memory.write(&self.v[..=x], addr)?;
            }
            Op::LoadRegs { x } => {
                let regs = self.memory.get_ro_slice(self.index_addr(), x + 1)?;
                self.v[..=x].copy_from_slice(regs);
            }
            Op::Unknown(raw) => return Ok(Step::Unimplemented(raw)),
        }
        Ok(Step::Continue)
    }

    /// finish a wait-for-key
    pub fn resume_with_key(&mut self, x: usize, key: u8) {
        self.v[x] = key & 0x0f;
    }

    /// one 60Hz tick of both timers
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// the write side of the keypad, for the input collaborator
    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// has the screen changed since the last call
    pub fn take_frame_dirty(&mut self) -> bool {
        self.framebuffer.take_dirty()
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.program_counter = (self.program_counter + 2) & CHIP8_ADDR_MASK;
        }
    }

    fn set_with_flag(&mut self, x: usize, value: u8, flag: u8) {
        self.v[x] = value;
        self.v[VF] = flag;
    }

    fn index_addr(&self) -> u16 {
        self.i & CHIP8_ADDR_MASK
    }

    /// address of the instruction being executed
    fn fault_pc(&self) -> u16 {
        self.program_counter.wrapping_sub(2) & CHIP8_ADDR_MASK
    }
}
