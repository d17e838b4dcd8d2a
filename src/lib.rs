//! portfolio-tui: a single-page résumé for the terminal.
//!
//! The page has three behaviors: a light/dark theme that follows the stored
//! preference or the system, a typewriter caption cycling through roles, and
//! sections that reveal once scrolled into view.

pub mod content;
pub mod error;
pub mod logging;
pub mod platform;
pub mod report;
pub mod reveal;
pub mod telemetry;
pub mod theme;
pub mod timer;
pub mod tui;
pub mod types;
pub mod typewriter;
