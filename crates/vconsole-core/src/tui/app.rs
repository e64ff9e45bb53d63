//! Terminal setup and the main event loop.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::api::VerifierApi;
use crate::session::Session;
use crate::table::PageSize;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, Routed};

/// Interactive console: owns the state and executes requests against `api`.
pub struct App {
    api: Arc<dyn VerifierApi>,
    state: AppState,
    should_quit: bool,
}

impl App {
    /// `backend` is a short label for the header (base URL or "demo").
    pub fn new(
        api: Arc<dyn VerifierApi>,
        session: Arc<Session>,
        page_size: PageSize,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            api,
            state: AppState::new(session, page_size, backend),
            should_quit: false,
        }
    }

    /// Rings the terminal bell on error notices.
    pub fn with_bell(self, enabled: bool) -> Self {
        self.state.toasts.set_bell(enabled);
        self
    }

    /// Runs until the user quits. The terminal is restored on every exit
    /// path, including panics.
    pub fn run(&mut self, tick_rate: Duration) -> io::Result<()> {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            default_hook(info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = self.main_loop(&mut terminal, tick_rate);

        restore_terminal()?;
        terminal.show_cursor()?;
        result
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);
        let sender = events.sender();

        let initial = self.state.load_current();
        self.dispatch(initial, &sender);

        while !self.should_quit {
            terminal.draw(|frame| render(frame, &mut self.state))?;
            if self.state.toasts.take_bell() {
                execute!(terminal.backend_mut(), Print('\x07'))?;
            }

            match events.next() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    match handle_key(&mut self.state, key) {
                        KeyAction::Quit => self.should_quit = true,
                        KeyAction::Send(routed) => self.dispatch(routed, &sender),
                        KeyAction::None => {}
                    }
                }
                Ok(Event::Reply(reply)) => {
                    let follow_up = self.state.apply_reply(reply);
                    self.dispatch(follow_up, &sender);
                }
                Ok(Event::Key(_) | Event::Tick | Event::Resize(..)) => {}
                Err(_) => break,
            }
        }
        info!("console closed");
        Ok(())
    }

    /// Runs each request on its own worker; replies come back as
    /// [`Event::Reply`].
    fn dispatch(&self, routed: Vec<Routed>, tx: &Sender<Event>) {
        for routed in routed {
            debug!(request = routed.request_name(), "spawning request worker");
            let api = Arc::clone(&self.api);
            let tx = tx.clone();
            thread::spawn(move || {
                let reply = routed.execute(api.as_ref());
                // The UI may already be gone.
                let _ = tx.send(Event::Reply(reply));
            });
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}
