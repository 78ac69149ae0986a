//! Duo Pong entry point
//!
//! Sets up logging and configuration, takes over the terminal, then runs the
//! game loop on its own thread while the main thread pumps terminal events.

use std::error::Error;
use std::io;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use duo_pong::platform::terminal::{EventPump, TerminalSession};
use duo_pong::platform::{InputState, LoopControl, SystemClock};
use duo_pong::renderer::TerminalSurface;
use duo_pong::scheduler::LoopConfig;
use duo_pong::{GameError, Scene, Scheduler, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let settings = match Settings::resolve(std::env::args().nth(1).as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("duo-pong: {}", describe(&e));
            process::exit(0);
        }
    };

    if let Err(e) = run(settings) {
        log::error!("{}", describe(&e));
        eprintln!("duo-pong: {}", describe(&e));
        process::exit(1);
    }
}

fn run(settings: Settings) -> Result<(), GameError> {
    let session = TerminalSession::enter()?;
    log::info!("Duo Pong starting at {} ticks/s", settings.tick_rate);

    let input = Arc::new(InputState::new(settings.keys.clone()));
    let control = Arc::new(LoopControl::new());
    let key_hold = Duration::from_millis(settings.key_hold_ms);

    let loop_thread = {
        let input = Arc::clone(&input);
        let control = Arc::clone(&control);
        let config = LoopConfig::from_settings(&settings);
        let panel = settings.panel_size();

        thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || {
                let _stop = StopOnExit(Arc::clone(&control));
                let mut scene = Scene::new(&settings, input);
                let mut surface = TerminalSurface::new(io::stdout(), panel);
                Scheduler::new(config, control, SystemClock::new()).run(&mut scene, &mut surface)
            })?
    };

    let mut pump = EventPump::new(
        input,
        Arc::clone(&control),
        session.reports_key_release(),
        key_hold,
    );
    let pumped = pump.run();
    if pumped.is_err() {
        control.stop();
    }

    let joined = loop_thread.join();
    drop(session);

    let stats = joined.map_err(|_| GameError::LoopPanicked)?;
    log::info!("Final loop stats: {:?}", stats);
    pumped?;
    Ok(())
}

/// Stops the loop when the loop thread ends, panics included, so the
/// event pump on the main thread returns
struct StopOnExit(Arc<LoopControl>);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Error message with its chain of causes
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
