//! TUI state algebra.
//!
//! `Page` is the pure navigation state and is all the transition function
//! sees. `App` adds the three behavioral units (theme, typewriter, reveal)
//! and the content; only the effects layer mutates those.
//!
//! Document geometry is recomputed from content and terminal size on every
//! relayout and summarized in [`Metrics`]; it is never edited by hand.

use crossterm::event::KeyEvent;

use crate::reveal::{RevealHandle, RootMargin, TerminalViewport, VisibilityRevealer};
use crate::theme::ThemeController;
use crate::typewriter::{Typewriter, TypewriterTiming};
use crate::types::{Portfolio, SectionId};

/// Rows of scroll after which the header switches to its elevated style.
pub const HEADER_ELEVATION_ROWS: u16 = 1;

/// Sections must scroll this far past the viewport edge before revealing.
pub const SECTION_REVEAL_MARGIN: RootMargin = RootMargin(-2);

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

// ============================================================================
// PAGE STATE
// ============================================================================

/// Navigation state of the single page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// First document row shown in the viewport.
    pub scroll: u16,
    /// Navigation menu overlay.
    pub menu_open: bool,
    /// Selected company tab in the Experience section.
    pub active_experience: usize,
}

impl Page {
    /// Whether the header uses its elevated style.
    pub fn header_elevated(&self) -> bool {
        self.scroll > HEADER_ELEVATION_ROWS
    }
}

/// Geometry of the laid-out document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metrics {
    /// First row of each section, in [`SectionId::ALL`] order.
    pub section_tops: [u16; 7],
    /// Total document rows.
    pub document_height: u16,
    /// Rows available for the document between header and help line.
    pub viewport_height: u16,
    /// Number of experience tabs.
    pub experience_count: usize,
}

impl Metrics {
    pub fn max_scroll(&self) -> u16 {
        self.document_height.saturating_sub(self.viewport_height)
    }

    pub fn top_of(&self, section: SectionId) -> u16 {
        self.section_tops[section.index()]
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Jump to a section by its 1-based navigation number.
    NumberKey(u8),
    ToggleMenu,
    /// Close overlays (Esc).
    Back,
    NextTab,
    PrevTab,
    ToggleTheme,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this page state.
    Page(Page),
    Quit,
    /// Keep the page as is and run a side effect.
    Effect(Effect),
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Flip and persist the theme.
    ToggleTheme,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
pub struct App {
    pub page: Page,
    pub portfolio: Portfolio,
    pub theme: ThemeController,
    pub typewriter: Typewriter,
    pub revealer: VisibilityRevealer<TerminalViewport>,
    /// One reveal registration per section, in page order.
    pub reveals: Vec<(SectionId, RevealHandle<TerminalViewport>)>,
    pub metrics: Metrics,
    /// Set to true when the app should exit on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Assemble the model. Sections are registered for reveal after the
    /// first layout, once their bounds are known.
    pub fn new(portfolio: Portfolio, theme: ThemeController, observer: TerminalViewport) -> Self {
        let typewriter = Typewriter::new(portfolio.phrases.clone(), TypewriterTiming::default());
        Self {
            page: Page::default(),
            metrics: Metrics {
                experience_count: portfolio.experience.len(),
                ..Metrics::default()
            },
            portfolio,
            theme,
            typewriter,
            revealer: VisibilityRevealer::new(observer),
            reveals: Vec::new(),
            should_quit: false,
        }
    }

    /// Whether a section has been revealed. Sections without a registration
    /// are always shown.
    pub fn is_revealed(&self, section: SectionId) -> bool {
        self.reveals
            .iter()
            .find(|(id, _)| *id == section)
            .is_none_or(|(_, handle)| handle.is_visible())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("page", &self.page)
            .field("theme", &self.theme)
            .field("caption", &self.typewriter.text())
            .field("metrics", &self.metrics)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
