//! Terminal window and event source
//!
//! `TerminalSession` puts the terminal into the state the game needs and
//! restores it on drop. `EventPump` runs on the main thread, turning key and
//! focus events into input flags and loop requests.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};

use super::control::{Lifecycle, LoopControl};
use super::input::{InputState, Key};

/// How often the pump checks for a stop request between events
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Raw mode, alternate screen, hidden cursor and focus reporting
pub struct TerminalSession {
    key_release_events: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
            EnableFocusChange,
        )?;

        // Key release events need the kitty keyboard protocol
        let key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if key_release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            log::warn!("Terminal does not report key releases; holding keys for a fixed time");
        }

        Ok(Self { key_release_events })
    }

    pub fn reports_key_release(&self) -> bool {
        self.key_release_events
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.key_release_events {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            stdout,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

/// Feeds terminal events into the shared input and loop state
pub struct EventPump {
    input: Arc<InputState>,
    control: Arc<LoopControl>,
    key_release_events: bool,
    hold: Duration,
    /// When each synthetically held key lets go
    release_at: [Option<Instant>; Key::COUNT],
}

impl EventPump {
    pub fn new(
        input: Arc<InputState>,
        control: Arc<LoopControl>,
        key_release_events: bool,
        hold: Duration,
    ) -> Self {
        Self {
            input,
            control,
            key_release_events,
            hold,
            release_at: [None; Key::COUNT],
        }
    }

    /// Pump events until the game loop stops
    pub fn run(&mut self) -> io::Result<()> {
        while !self.control.is_stopped() {
            if event::poll(POLL_INTERVAL)? {
                let event = event::read()?;
                self.handle(event, Instant::now());
            }
            self.expire_held_keys(Instant::now());
        }
        Ok(())
    }

    pub fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::FocusGained => self.control.on_lifecycle(Lifecycle::Activated),
            Event::FocusLost => self.control.on_lifecycle(Lifecycle::Deactivated),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.control.on_lifecycle(Lifecycle::CloseRequested);
            return;
        }

        match key.kind {
            KeyEventKind::Release => self.input.on_key_up(key.code),
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.input.on_key_down(key.code);
                if !self.key_release_events {
                    if let Some(key) = self.input.bindings().resolve(key.code) {
                        self.release_at[key.index()] = Some(now + self.hold);
                    }
                }
            }
        }
    }

    /// Release keys whose synthetic hold ran out
    pub fn expire_held_keys(&mut self, now: Instant) {
        for key in Key::ALL {
            if let Some(deadline) = self.release_at[key.index()] {
                if now >= deadline {
                    self.input.release(key);
                    self.release_at[key.index()] = None;
                }
            }
        }
    }
}
