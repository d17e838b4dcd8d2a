//! Platform detection: state locations and the OS appearance setting.
//!
//! Structure:
//! - Constants: directory names and the override variable
//! - Pure functions: path construction, appearance parsing
//! - Effect functions: querying the OS

use std::path::{Path, PathBuf};

use crate::types::{ThemePreference, LOG_FILENAME};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Directory name under the platform config dir.
pub const STATE_DIR_NAME: &str = "portfolio-tui";

/// Environment variable that overrides OS appearance detection.
///
/// Accepts `dark` or `light`; anything else is ignored.
pub const COLOR_SCHEME_ENV: &str = "PORTFOLIO_COLOR_SCHEME";

// ============================================================================
// PURE FUNCTIONS (Path Construction)
// ============================================================================

/// Default state directory.
///
/// On Linux: ~/.config/portfolio-tui/
pub fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_DIR_NAME)
}

/// Default log file for a state directory.
pub fn default_log_file(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILENAME)
}

/// Interpret an appearance string reported by the OS or the override.
///
/// Pure function; returns None when the text says nothing either way.
pub fn parse_appearance(raw: &str) -> Option<ThemePreference> {
    let lower = raw.trim().to_lowercase();
    if lower.contains("dark") {
        Some(ThemePreference::Dark)
    } else if lower.contains("light") || lower.contains("default") {
        Some(ThemePreference::Light)
    } else {
        None
    }
}

// ============================================================================
// EFFECT FUNCTIONS (Detection)
// ============================================================================

/// Whether the system asks for dark mode.
///
/// `Some(true)` / `Some(false)` when a signal was found, None when nothing
/// could be determined.
pub fn detect_system_dark_mode() -> Option<bool> {
    if let Ok(value) = std::env::var(COLOR_SCHEME_ENV) {
        if let Some(pref) = parse_appearance(&value) {
            return Some(pref.is_dark());
        }
    }

    detect_os_appearance().map(ThemePreference::is_dark)
}

#[cfg(target_os = "linux")]
fn detect_os_appearance() -> Option<ThemePreference> {
    use std::process::Command;

    // color-scheme is authoritative on modern GNOME; gtk-theme is a fallback
    for key in ["color-scheme", "gtk-theme"] {
        let output = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", key])
            .output()
            .ok()?;
        if !output.status.success() {
            continue;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        if let Some(ThemePreference::Dark) = parse_appearance(&text) {
            return Some(ThemePreference::Dark);
        }
        if key == "color-scheme" && text.contains("prefer-light") {
            return Some(ThemePreference::Light);
        }
    }
    None
}

#[cfg(target_os = "macos")]
fn detect_os_appearance() -> Option<ThemePreference> {
    use std::process::Command;

    // AppleInterfaceStyle is only set in dark mode
    let output = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    if output.status.success() {
        parse_appearance(&String::from_utf8_lossy(&output.stdout))
    } else {
        Some(ThemePreference::Light)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn detect_os_appearance() -> Option<ThemePreference> {
    None
}

// ============================================================================
// TESTS
// ============================================================================
