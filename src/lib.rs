//! A CHIP-8 interpreter: 4K of memory, sixteen byte registers, a 64x32
//! monochrome screen and a hex keypad.
//!
//! ## Design
//!
//! * architectural state only; no attempt at COSMAC VIP bus timing
//! * decode once into fields, dispatch with a match on the family nibble
//! * the interpreter owns all machine state; collaborators get narrow views
//!    - displays see `&Framebuffer`
//!    - inputs write the `Keypad` latches
//!    - sound just gets told on or off
//! * one thread, two cadences: instructions at the configured rate, timers
//!   and screen refresh at 60Hz
//! * wait-for-key is a scheduler state, not a blocking call, so a quit
//!   still gets through
//!
//! Model
//!
//! ```text
//! main
//!  |-- config (command line)
//!  |-- display, input, sound
//!  |-- interpreter(memory, framebuffer, keypad)
//!  `-- scheduler(interpreter, display, input, sound).run()
//!       |-- input.poll(keypad)             quit? -> Halted
//!       |-- Running:     interpreter.cycle()
//!       |   AwaitingKey: fresh key press?  -> Running
//!       |-- crossed a 1/60s boundary?      -> timers, sound, redraw
//!       `-- sleep until the next instruction is due
//! ```
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod scheduler;
pub mod sound;

pub use config::Config;
pub use error::Chip8Error;
pub use interpreter::Chip8Interpreter;
pub use scheduler::{HaltReason, Scheduler};
