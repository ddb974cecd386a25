use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

pub const KEY_COUNT: usize = 16;

/// left-hand side of a qwerty keyboard mapped onto the COSMAC VIP hex pad
///   1 2 3 C      1 2 3 4
///   4 5 6 D  <-  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); KEY_COUNT] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses, so a press is held for this long (and
/// re-armed by auto-repeat)
const KEY_HOLD: Duration = Duration::from_millis(120);

/// the 16 key latches; written by an `Input`, read by the interpreter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// key codes past 0xf only use their low nibble
    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0x0f) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0x0f) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize]
    }

    /// lowest key that is down now but was not down in `before`
    pub fn newly_pressed(&self, before: &Keypad) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|k| self.is_pressed(*k) && !before.is_pressed(*k))
    }
}

/// what the host wants the run loop to do next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSignal {
    Continue,
    Quit,
}

/// reads key presses into the keypad latches
pub trait Input {
    /// apply everything that happened since the last poll
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputSignal, io::Error>;
}

/// Input from the controlling terminal, via crossterm in raw mode
pub struct TermInput {
    keymap: HashMap<char, u8>,
    release_at: [Option<Instant>; KEY_COUNT],
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            release_at: [None; KEY_COUNT],
        })
    }

    fn expire_held(&mut self, keypad: &mut Keypad, now: Instant) {
        for (key, deadline) in self.release_at.iter_mut().enumerate() {
            if matches!(deadline, Some(t) if *t <= now) {
                *deadline = None;
                keypad.release(key as u8);
            }
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("could not restore terminal mode: {}", e);
        }
    }
}

impl Input for TermInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputSignal, io::Error> {
        let now = Instant::now();
        self.expire_held(keypad, now);
        while poll(Duration::from_millis(0))? {
            let evt = match read()? {
                Event::Key(evt) => evt,
                _ => continue,
            };
            match evt.code {
                KeyCode::Esc => return Ok(InputSignal::Quit),
                KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(InputSignal::Quit)
                }
                KeyCode::Char(c) => match self.keymap.get(&c.to_ascii_lowercase()) {
                    Some(&key) => {
                        keypad.press(key);
                        self.release_at[key as usize] = Some(now + KEY_HOLD);
                    }
                    None => debug!("can't map {:?} to a COSMAC key", c),
                },
                other => debug!("ignoring key {:?}", other),
            }
        }
        Ok(InputSignal::Continue)
    }
}

/// one scripted host event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(u8),
    Release(u8),
    Quit,
}

/// scripted Input for tests and headless runs: each poll replays the next
/// frame of events; once the script runs out nothing changes
pub struct DummyInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl DummyInput {
    pub fn new(frames: Vec<Vec<InputEvent>>) -> Self {
        DummyInput {
            frames: VecDeque::from(frames),
        }
    }

    /// an input that never does anything
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl Input for DummyInput {
    fn poll(&mut self, keypad: &mut Keypad) -> Result<InputSignal, io::Error> {
        let frame = self.frames.pop_front().unwrap_or_default();
        for evt in frame {
            match evt {
                InputEvent::Press(key) => keypad.press(key),
                InputEvent::Release(key) => keypad.release(key),
                InputEvent::Quit => return Ok(InputSignal::Quit),
            }
        }
        Ok(InputSignal::Continue)
    }
}
