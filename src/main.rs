use clap::Parser;
use std::error::Error;
use std::fs::File;

use chip8vm::display::MonoTermDisplay;
use chip8vm::input::TermInput;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{Chip8Interpreter, Config, Scheduler};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::parse();
    config.validate()?;

    // load a program before touching the terminal, so errors stay readable
    let mut interpreter = Chip8Interpreter::new(config.draw_policy, config.seed)?;
    let mut f = File::open(&config.rom)?;
    let len = interpreter.load_program(&mut f)?;
    log::info!("loaded {} bytes from {}", len, config.rom.display());

    let mut display = MonoTermDisplay::new(config.scale)?;
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let result = {
        let mut scheduler = Scheduler::new(
            interpreter,
            &config,
            &mut display,
            &mut input,
            sound.as_mut(),
        )?;
        scheduler.run()
    };
    sound.set_active(false)?;
    drop(input);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..2 {
        println!();
    }
    let reason = result?;
    log::info!("stopped: {:?}", reason);
    Ok(())
}
