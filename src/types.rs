//! Domain types for portfolio-tui.
//!
//! Résumé content is inert data: it is loaded once and only read afterwards.
//! The only validated piece is the hero's [`PhraseList`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

// ============================================================================
// THEME
// ============================================================================

/// Light or dark visual mode.
///
/// Persisted as the lowercase string `"light"` or `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// The persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemePreference::Dark
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PHRASES
// ============================================================================

/// Ordered, non-empty list of non-empty phrases for the hero typewriter.
///
/// Construction is the only validation point, so an engine holding a
/// `PhraseList` can always index `loop_count % len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseList(Vec<String>);

impl PhraseList {
    pub fn new<I, S>(phrases: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(ContentError::EmptyPhraseList);
        }
        if let Some(index) = phrases.iter().position(|p| p.is_empty()) {
            return Err(ContentError::EmptyPhrase { index });
        }
        Ok(PhraseList(phrases))
    }

    /// Phrase for a loop counter, wrapping around the list.
    pub fn cycled(&self, loop_count: u64) -> &str {
        let index = (loop_count % self.0.len() as u64) as usize;
        &self.0[index]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for PhraseList {
    type Error = ContentError;

    fn try_from(phrases: Vec<String>) -> Result<Self, Self::Error> {
        PhraseList::new(phrases)
    }
}

impl From<PhraseList> for Vec<String> {
    fn from(list: PhraseList) -> Self {
        list.0
    }
}

// ============================================================================
// CONTENT
// ============================================================================

/// Identity block shown in the header and hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Short mark shown at the left of the header.
    pub initials: String,
    /// Line above the name in the hero ("Hi, my name is").
    pub greeting: String,
    /// Hero paragraph under the rotating caption.
    pub summary: String,
    /// Paragraphs of the About section.
    pub about: Vec<String>,
    /// File name of the downloadable résumé, if one is published.
    #[serde(default)]
    pub resume_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub period: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub message: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Identifiers handed to the analytics collector at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub measurement_id: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// The complete static content of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    pub phrases: PhraseList,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub education: Vec<Education>,
    pub contact: Contact,
    #[serde(default)]
    pub footer_credit: Option<String>,
    #[serde(default)]
    pub analytics: Option<AnalyticsConfig>,
}

// ============================================================================
// SECTIONS
// ============================================================================

/// The navigable content sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    About,
    Skills,
    Experience,
    Projects,
    Certifications,
    Education,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::About,
        SectionId::Skills,
        SectionId::Experience,
        SectionId::Projects,
        SectionId::Certifications,
        SectionId::Education,
        SectionId::Contact,
    ];

    /// Short navigation label.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::About => "About",
            SectionId::Skills => "Skills",
            SectionId::Experience => "Experience",
            SectionId::Projects => "Projects",
            SectionId::Certifications => "Certifications",
            SectionId::Education => "Education",
            SectionId::Contact => "Contact",
        }
    }

    /// Section heading.
    pub fn title(self) -> &'static str {
        match self {
            SectionId::About => "About Me",
            SectionId::Skills => "Technical Competencies",
            SectionId::Experience => "Professional Experience",
            SectionId::Projects => "Key Initiatives",
            SectionId::Certifications => "Certifications",
            SectionId::Education => "Education",
            SectionId::Contact => "Get In Touch",
        }
    }

    /// Position in page order (0-based).
    pub fn index(self) -> usize {
        SectionId::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Section for a 1-based navigation number.
    pub fn from_number(n: u8) -> Option<SectionId> {
        (n as usize).checked_sub(1).and_then(|i| SectionId::ALL.get(i).copied())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for the `print` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable plain text.
    #[default]
    Human,
    /// The content schema as JSON (loadable with `--content`).
    Json,
}

/// Runtime configuration assembled from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON content file; built-in content when None.
    pub content_path: Option<PathBuf>,
    /// Directory holding preferences, analytics records and the log.
    pub state_dir: PathBuf,
    /// Log destination.
    pub log_file: PathBuf,
    /// Forced theme for this session (also persisted).
    pub theme_override: Option<ThemePreference>,
    /// Reveal sections on scroll; when false every section is visible.
    pub reveal: bool,
    /// Record a session start with the analytics collector.
    pub analytics: bool,
}

impl AppConfig {
    pub fn preferences_path(&self) -> PathBuf {
        self.state_dir.join(PREFERENCES_FILENAME)
    }

    pub fn analytics_path(&self) -> PathBuf {
        self.state_dir.join(ANALYTICS_FILENAME)
    }
}

/// Preference file within the state directory.
pub const PREFERENCES_FILENAME: &str = "preferences.json";

/// Analytics record file within the state directory.
pub const ANALYTICS_FILENAME: &str = "analytics.jsonl";

/// Log file within the state directory.
pub const LOG_FILENAME: &str = "portfolio.log";

// ============================================================================
// TESTS
// ============================================================================
