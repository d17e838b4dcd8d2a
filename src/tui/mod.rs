//! Interactive terminal rendering of the portfolio page.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Page, Action, Transition, App)
//! - `update`: Pure transitions
//! - `view`: Pure layout and rendering
//! - `palette`: Light and dark color sets
//! - `run`: Effects (terminal, event loop, clock)

pub mod palette;
pub mod run;
pub mod state;
pub mod update;
pub mod view;
