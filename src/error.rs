use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. Unimplemented opcodes are not
/// in here: they are reported and skipped, see `interpreter::Step`.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("stack overflow: call {opcode:04x} at pc {pc:03x} with a full stack")]
    StackOverflow { pc: u16, opcode: u16 },

    #[error("stack underflow: return {opcode:04x} at pc {pc:03x} with an empty stack")]
    StackUnderflow { pc: u16, opcode: u16 },

    #[error("memory access out of bounds: {len} byte(s) at {addr:03x}")]
    MemoryOutOfBounds { addr: u16, len: usize },

    #[error("rom is {len} bytes; at most {max} fit in program memory")]
    RomTooLarge { len: usize, max: usize },

    #[error("bad configuration: {0}")]
    Config(String),

    #[error("sound device: {0}")]
    Sound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages_name_pc_and_opcode() {
        let e = Chip8Error::StackUnderflow {
            pc: 0x204,
            opcode: 0x00ee,
        };
        assert_eq!(
            e.to_string(),
            "stack underflow: return 00ee at pc 204 with an empty stack"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        let e: Chip8Error = io::Error::new(io::ErrorKind::NotFound, "no rom").into();
        assert!(matches!(e, Chip8Error::Io(_)));
        assert_eq!(e.to_string(), "no rom");
    }
}
