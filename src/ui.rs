// src/ui.rs

pub mod chat;
pub mod footer;

use crate::api::HttpTransport;
use crate::config::Config;
use crate::controller::{ChatController, UiEvent};
use crate::errors::ChatResult;
use crate::key_handlers::{handle_key, KeyAction};
use crate::models::{Message, QuickReply};
use crate::status_indicator::StatusIndicator;
use crate::transcript::{NodeId, Transcript};
use crate::view::ChatView;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::sync::mpsc;

/// Everything the terminal draws, shared between the render loop and the
/// controller task.
#[derive(Debug)]
pub struct ViewState {
    pub transcript: Transcript,
    pub input: String,
    pub input_enabled: bool,
    pub submit_enabled: bool,
    pub focused: bool,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll: u16,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            input_enabled: true,
            submit_enabled: false,
            focused: true,
            scroll: 0,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `ChatView` over the shared terminal state.
#[derive(Debug, Clone)]
pub struct TerminalView {
    state: Arc<Mutex<ViewState>>,
}

impl TerminalView {
    pub fn new(state: Arc<Mutex<ViewState>>) -> Self {
        Self { state }
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, message: Message) -> NodeId {
        lock(&self.state).transcript.append(message)
    }

    fn remove_message(&mut self, id: NodeId) -> bool {
        lock(&self.state).transcript.remove(id)
    }

    fn temporary_messages(&self) -> Vec<NodeId> {
        lock(&self.state).transcript.temporary_ids()
    }

    fn scroll_to_bottom(&mut self) {
        lock(&self.state).scroll = 0;
    }

    fn input_value(&self) -> String {
        lock(&self.state).input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        lock(&self.state).input = value.to_string();
    }

    fn is_input_enabled(&self) -> bool {
        lock(&self.state).input_enabled
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        let mut state = lock(&self.state);
        state.input_enabled = enabled;
        if !enabled {
            state.focused = false;
        }
    }

    fn focus_input(&mut self) {
        lock(&self.state).focused = true;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        lock(&self.state).submit_enabled = enabled;
    }
}

/// Runs the terminal chat widget against `config.endpoint`.
pub async fn run_terminal(config: &Config) -> ChatResult<()> {
    let transport = HttpTransport::new(
        config.endpoint.as_str(),
        config.request_timeout_secs.map(Duration::from_secs),
    )?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let state = Arc::new(Mutex::new(ViewState::new()));
    let controller = ChatController::new(TerminalView::new(state.clone()), transport, config);
    let (event_tx, event_rx) = mpsc::channel::<UiEvent>(32);
    let worker = tokio::spawn(controller.run(event_rx));

    log::info!("Terminal chat started against {}", config.endpoint);
    let res = run_app(&mut terminal, &state, &event_tx, &config.quick_replies).await;

    // An in-flight request is dropped rather than awaited.
    worker.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Main loop: draws on every tick or key and forwards key actions.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &Mutex<ViewState>,
    events: &mpsc::Sender<UiEvent>,
    quick_replies: &[QuickReply],
) -> ChatResult<()> {
    let (tx, mut rx) = mpsc::channel::<CEvent>(100);

    tokio::task::spawn_blocking(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                }
                Err(_) => return,
            },
            Ok(false) if tx.is_closed() => return,
            Ok(false) => {}
            Err(_) => return,
        }
    });

    let mut indicator = StatusIndicator::new();
    let mut tick = tokio::time::interval(Duration::from_millis(120));

    loop {
        {
            let view = lock(state);
            indicator.set_thinking(!view.input_enabled);
            terminal.draw(|f| draw(f, &view, &indicator, quick_replies))?;
        }

        tokio::select! {
            _ = tick.tick() => indicator.update_spinner(),
            maybe_event = rx.recv() => {
                let key = match maybe_event {
                    Some(CEvent::Key(key)) => key,
                    Some(_) => continue,
                    None => break,
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let action = handle_key(key, &mut lock(state), quick_replies);
                match action {
                    KeyAction::Quit => break,
                    KeyAction::Send(event) => {
                        if events.send(event).await.is_err() {
                            log::warn!("Controller stopped; leaving terminal chat");
                            break;
                        }
                    }
                    KeyAction::None => {}
                }
            }
        }
    }

    Ok(())
}

/// Renders the transcript, status line, input and footer.
pub fn draw(f: &mut Frame, view: &ViewState, indicator: &StatusIndicator, quick_replies: &[QuickReply]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Transcript
            Constraint::Length(1), // Status
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    chat::draw_transcript(f, chunks[0], view);
    indicator.render(f, chunks[1]);
    chat::draw_input(f, chunks[2], view);
    footer::draw_footer(f, chunks[3], quick_replies);
}
