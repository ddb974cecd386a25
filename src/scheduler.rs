//! # scheduler
//!
//! Two cadences on one thread: instructions at the configured clock rate,
//! and the delay/sound timers (plus screen refresh) at a fixed 60Hz.
//!
//! Timer time is kept as elapsed nanoseconds times 60, compared against one
//! second, so the decay rate is exact whatever the instruction jitter. A
//! tick decrements at most once; any surplus carries to the following ticks.
//!
//! ```text
//!            wait-for-key            key goes down
//!  Running ----------------> AwaitingKey ----------> Running
//!     |                          |
//!     | quit / fault / limit     | quit
//!     v                          v
//!  Halted <----------------------'
//! ```
use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::{Input, InputSignal, Keypad};
use crate::interpreter::{Chip8Interpreter, Step};
use crate::sound::Sound;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

pub const TIMER_HZ: u128 = 60;
const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// the host asked to stop
    Quit,
    /// the configured number of instructions ran
    CycleLimit,
    /// an instruction left the machine in an undefined state
    Fault,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// suspended on a wait-for-key into Vx; `before` is the keypad as of the
    /// previous poll, so only a fresh press resumes. A key pressed in the
    /// same poll that ran the wait-for-key counts as fresh.
    AwaitingKey { x: usize, before: Keypad },
    Halted(HaltReason),
}

pub struct Scheduler<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    state: RunState,
    cycle_period: Duration,
    timer_phase: u128,
    cycles: u64,
    cycle_limit: Option<u64>,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        config: &Config,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Result<Scheduler<'a>, Chip8Error> {
        config.validate()?;
        Ok(Scheduler {
            interpreter,
            display,
            input,
            sound,
            state: RunState::Running,
            cycle_period: Duration::from_nanos(NANOS_PER_SEC as u64 / u64::from(config.clock_hz)),
            timer_phase: 0,
            cycles: 0,
            cycle_limit: config.cycle_limit,
        })
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// instructions executed so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Tick at the clock rate until halted, sleeping between ticks. Missed
    /// deadlines are not caught up in a burst; the timers still see the real
    /// elapsed time.
    pub fn run(&mut self) -> Result<HaltReason, Chip8Error> {
        info!(
            "running at {} instructions/s",
            NANOS_PER_SEC / self.cycle_period.as_nanos().max(1)
        );
        let mut last = Instant::now();
        let mut deadline = last;
        loop {
            let now = Instant::now();
            let state = self.tick(now - last)?;
            last = now;
            if let RunState::Halted(reason) = state {
                info!("halted after {} instructions: {:?}", self.cycles, reason);
                return Ok(reason);
            }
            deadline += self.cycle_period;
            let now = Instant::now();
            if deadline > now {
                spin_sleep::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }
    }

    /// One scheduler step: service input, run at most one instruction, then
    /// account `elapsed` wall-clock time to the 60Hz cadence.
    pub fn tick(&mut self, elapsed: Duration) -> Result<RunState, Chip8Error> {
        if let RunState::Halted(_) = self.state {
            return Ok(self.state);
        }
        let before_poll = *self.interpreter.keypad();
        if self.input.poll(self.interpreter.keypad_mut())? == InputSignal::Quit {
            debug!("quit requested in state {:?}", self.state);
            self.state = RunState::Halted(HaltReason::Quit);
            return Ok(self.state);
        }

        match self.state {
            RunState::Running => self.execute_one(before_poll)?,
            RunState::AwaitingKey { x, before } => {
                let now = *self.interpreter.keypad();
                match now.newly_pressed(&before) {
                    Some(key) => {
                        debug!("key {:x} pressed, resuming into V{:X}", key, x);
                        self.interpreter.resume_with_key(x, key);
                        self.state = RunState::Running;
                    }
                    None => self.state = RunState::AwaitingKey { x, before: now },
                }
            }
            RunState::Halted(_) => {}
        }

        self.advance_timers(elapsed)?;
        self.sound.set_active(self.interpreter.sound_timer() > 0)?;
        Ok(self.state)
    }

    /// `before_poll` is the keypad as it was before this tick's input, so a
    /// key that goes down in the same tick as a wait-for-key still counts
    fn execute_one(&mut self, before_poll: Keypad) -> Result<(), Chip8Error> {
        let pc = self.interpreter.pc();
        match self.interpreter.cycle() {
            Ok(Step::Continue) => {}
            Ok(Step::Unimplemented(raw)) => {
                warn!("unimplemented instruction {:04x} at {:03x}, skipping", raw, pc)
            }
            Ok(Step::AwaitKey { x }) => {
                debug!("waiting for a key into V{:X}", x);
                self.state = RunState::AwaitingKey {
                    x,
                    before: before_poll,
                };
            }
            Err(e) => {
                error!("{}", e);
                self.state = RunState::Halted(HaltReason::Fault);
                return Err(e);
            }
        }
        self.cycles += 1;
        if self.cycle_limit.map_or(false, |limit| self.cycles >= limit) {
            self.state = RunState::Halted(HaltReason::CycleLimit);
        }
        Ok(())
    }

    fn advance_timers(&mut self, elapsed: Duration) -> Result<(), Chip8Error> {
        self.timer_phase += elapsed.as_nanos() * TIMER_HZ;
        if self.timer_phase < NANOS_PER_SEC {
            return Ok(());
        }
        self.timer_phase -= NANOS_PER_SEC;
        self.interpreter.tick_timers();
        if self.interpreter.take_frame_dirty() {
            self.display.draw(self.interpreter.framebuffer())?;
        }
        Ok(())
    }
}
