//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and owns the clock that drives the typewriter.
//!
//! Architecture: a key reader thread feeds a single mpsc channel. The loop
//! waits on the channel until the typewriter's next deadline, so animation
//! steps and input share one thread and no timer threads exist.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::reveal::TerminalViewport;
use crate::theme::ThemeController;
use crate::types::Portfolio;

use super::state::{Action, App, AppEvent, Effect, Transition, SECTION_REVEAL_MARGIN};
use super::update::update;
use super::view::{layout_document, render, viewport_height, wrap_width};

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::End | KeyCode::Char('G') => Some(Action::Bottom),

        // Sections
        KeyCode::Char(c @ '1'..='7') => Some(Action::NumberKey(c as u8 - b'0')),
        KeyCode::Char('m') => Some(Action::ToggleMenu),
        KeyCode::Esc => Some(Action::Back),

        // Experience tabs
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => Some(Action::NextTab),

        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that forwards key presses and resizes to the channel.
fn spawn_event_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(_) => continue, // releases, mouse, focus, paste
                Err(_) => break,
            };
            if tx.send(forwarded).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

// ============================================================================
// LAYOUT SYNC
// ============================================================================

/// Register every section with the revealer at its laid-out position.
fn register_sections(app: &mut App, width: u16, height: u16) {
    let doc = layout_document(app, wrap_width(width), viewport_height(height));
    let reveals: Vec<_> = doc
        .section_bounds()
        .map(|(section, bounds)| (section, app.revealer.observe(bounds, SECTION_REVEAL_MARGIN)))
        .collect();
    app.reveals = reveals;
    relayout(app, width, height);
}

/// Recompute geometry for the terminal size and push it to the revealer.
fn relayout(app: &mut App, width: u16, height: u16) {
    let viewport = viewport_height(height);
    let doc = layout_document(app, wrap_width(width), viewport);
    app.metrics = doc.metrics(viewport, app.portfolio.experience.len());
    app.page.scroll = app.page.scroll.min(app.metrics.max_scroll());

    {
        let mut observer = app.revealer.observer_mut();
        for (section, handle) in &app.reveals {
            if let Some(id) = handle.observation() {
                observer.set_bounds(id, doc.bounds_of(*section));
            }
        }
        observer.set_viewport(u32::from(app.page.scroll), u32::from(viewport));
    }

    let revealed = app.revealer.dispatch();
    if revealed > 0 {
        debug!(revealed, scroll = app.page.scroll, "sections revealed");
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI until the user quits.
///
/// `theme` must already be started. With `reveal` off every section is
/// shown from the first frame.
pub fn run(portfolio: Portfolio, theme: ThemeController, reveal: bool) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;
    let (mut width, mut height) = (size.width, size.height);

    let observer = if reveal {
        TerminalViewport::new(0, u32::from(viewport_height(height)))
    } else {
        TerminalViewport::disabled()
    };
    let mut app = App::new(portfolio, theme, observer);
    register_sections(&mut app, width, height);
    app.typewriter.start(Instant::now());
    info!(width, height, theme = %app.theme.current(), reveal, "tui started");

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_event_reader(tx);

    loop {
        // Render
        terminal.draw(|frame| render(&app, frame))?;

        // Check quit flag
        if app.should_quit {
            break;
        }

        // Wait for input, or until the caption is due to change
        let event = match app.typewriter.next_deadline() {
            Some(deadline) => {
                match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(e) => Some(e),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(e) => Some(e),
                Err(_) => break, // all senders dropped
            },
        };

        app.typewriter.poll(Instant::now());

        match event {
            Some(AppEvent::Key(key)) => {
                if let Some(action) = map_key(key) {
                    match update(app.page.clone(), &action, &app.metrics) {
                        Transition::Page(page) => {
                            app.page = page;
                        }
                        Transition::Quit => {
                            app.should_quit = true;
                        }
                        Transition::Effect(effect) => {
                            handle_effect(effect, &mut app);
                        }
                    }
                    relayout(&mut app, width, height);
                }
            }
            Some(AppEvent::Resize(w, h)) => {
                (width, height) = (w, h);
                relayout(&mut app, width, height);
            }
            None => {}
        }
    }

    app.typewriter.stop();
    info!(loops = app.typewriter.state().loop_count, "tui stopped");
    restore_terminal()?;
    Ok(())
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Handle a side effect requested by a pure transition.
fn handle_effect(effect: Effect, app: &mut App) {
    match effect {
        Effect::ToggleTheme => {
            let theme = app.theme.toggle();
            info!(%theme, persistent = app.theme.is_persistent(), "theme toggled");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
