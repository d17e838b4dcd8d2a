//! Color semantics for the light and dark themes.
//!
//! Pure data, consumed by the rendering layer. Both palettes share the same
//! roles:
//! - Accent: sky blue, for the caption underline, links, active tabs
//! - Heading: section titles
//! - Dim: periods, issuers, de-emphasized metadata
//! - Tag: skill and project chips
//! - Header: the fixed top bar, flat or elevated once scrolled

use ratatui::style::{Color, Modifier, Style};

use crate::types::ThemePreference;

/// Style set for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background and body text.
    pub base: Style,
    pub title: Style,
    pub heading: Style,
    pub accent: Style,
    pub text: Style,
    pub dim: Style,
    pub tag: Style,
    pub active_tab: Style,
    pub inactive_tab: Style,
    pub header: Style,
    pub header_elevated: Style,
    pub menu: Style,
    pub help: Style,
}

const SKY: Color = Color::Rgb(14, 165, 233);
const SLATE_900: Color = Color::Rgb(15, 23, 42);
const SLATE_800: Color = Color::Rgb(30, 41, 59);
const GRAY_50: Color = Color::Rgb(249, 250, 251);
const GRAY_200: Color = Color::Rgb(229, 231, 235);
const GRAY_600: Color = Color::Rgb(75, 85, 99);
const GRAY_400: Color = Color::Rgb(156, 163, 175);

pub const LIGHT: Palette = Palette {
    base: Style::new().fg(GRAY_600).bg(GRAY_50),
    title: Style::new().fg(Color::Black).add_modifier(Modifier::BOLD),
    heading: Style::new().fg(SKY).add_modifier(Modifier::BOLD),
    accent: Style::new().fg(SKY),
    text: Style::new().fg(GRAY_600),
    dim: Style::new().fg(GRAY_400),
    tag: Style::new().fg(Color::Rgb(7, 89, 133)).bg(Color::Rgb(224, 242, 254)),
    active_tab: Style::new().fg(SKY).add_modifier(Modifier::BOLD),
    inactive_tab: Style::new().fg(GRAY_400),
    header: Style::new().fg(Color::Black).bg(GRAY_50),
    header_elevated: Style::new()
        .fg(Color::Black)
        .bg(GRAY_200)
        .add_modifier(Modifier::BOLD),
    menu: Style::new().fg(GRAY_600).bg(Color::White),
    help: Style::new().fg(GRAY_400),
};

pub const DARK: Palette = Palette {
    base: Style::new().fg(Color::Rgb(209, 213, 219)).bg(SLATE_900),
    title: Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
    heading: Style::new().fg(SKY).add_modifier(Modifier::BOLD),
    accent: Style::new().fg(Color::Rgb(56, 189, 248)),
    text: Style::new().fg(Color::Rgb(209, 213, 219)),
    dim: Style::new().fg(GRAY_400),
    tag: Style::new().fg(Color::Rgb(186, 230, 253)).bg(Color::Rgb(12, 74, 110)),
    active_tab: Style::new().fg(Color::Rgb(56, 189, 248)).add_modifier(Modifier::BOLD),
    inactive_tab: Style::new().fg(GRAY_400),
    header: Style::new().fg(Color::White).bg(SLATE_900),
    header_elevated: Style::new()
        .fg(Color::White)
        .bg(SLATE_800)
        .add_modifier(Modifier::BOLD),
    menu: Style::new().fg(Color::Rgb(209, 213, 219)).bg(SLATE_800),
    help: Style::new().fg(GRAY_400),
};

/// Palette for a theme preference.
pub fn palette(theme: ThemePreference) -> &'static Palette {
    match theme {
        ThemePreference::Light => &LIGHT,
        ThemePreference::Dark => &DARK,
    }
}
