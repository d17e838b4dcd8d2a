//! Theme preference: resolution at startup, toggling, persistence.
//!
//! Storage and the OS appearance signal are injected so the controller can be
//! exercised without a terminal or a real config directory. Storage failures
//! never escape this module: a failed write drops the controller into an
//! in-memory session and the page keeps rendering.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::platform::detect_system_dark_mode;
use crate::types::ThemePreference;

/// Storage key holding the persisted preference.
pub const THEME_KEY: &str = "theme";

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Durable key-value storage scoped to this client.
pub trait PreferenceStore {
    /// Read the raw value for `key`. `Ok(None)` means unset.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read-only "prefers dark" signal from the environment.
pub trait AmbientSignal {
    /// None when the environment gives no answer.
    fn prefers_dark(&self) -> Option<bool>;
}

/// The operating system's appearance setting.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAppearance;

impl AmbientSignal for SystemAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        detect_system_dark_mode()
    }
}

/// A fixed answer, for tests and for `--theme`-style overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedSignal(pub Option<bool>);

impl AmbientSignal for FixedSignal {
    fn prefers_dark(&self) -> Option<bool> {
        self.0
    }
}

// ============================================================================
// STORES
// ============================================================================

/// JSON object of string values in a single file.
///
/// Writes preserve keys this crate does not know about.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Session-only storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// The opposite preference. Callers apply the result themselves.
pub fn toggle_theme(current: ThemePreference) -> ThemePreference {
    match current {
        ThemePreference::Light => ThemePreference::Dark,
        ThemePreference::Dark => ThemePreference::Light,
    }
}

/// Interpret a stored value: `"dark"` is dark, any other present value is
/// light, absence defers to the ambient signal.
fn interpret_stored(stored: Option<&str>, ambient: Option<bool>) -> ThemePreference {
    match stored {
        Some("dark") => ThemePreference::Dark,
        Some(_) => ThemePreference::Light,
        None if ambient == Some(true) => ThemePreference::Dark,
        None => ThemePreference::Light,
    }
}

/// Where the startup preference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    /// Storage could not be read and was treated as unset.
    Unreadable,
    System,
    Default,
}

impl std::fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ThemeSource::Stored => "stored",
            ThemeSource::Unreadable => "stored value unreadable, treated as unset",
            ThemeSource::System => "system",
            ThemeSource::Default => "default",
        })
    }
}

/// Resolve the startup preference from storage, then the environment.
///
/// Never fails; unreadable storage counts as unset.
pub fn resolve_initial_theme(
    store: &dyn PreferenceStore,
    ambient: &dyn AmbientSignal,
) -> ThemePreference {
    explain_initial_theme(store, ambient).0
}

/// [`resolve_initial_theme`] plus the source that decided it.
pub fn explain_initial_theme(
    store: &dyn PreferenceStore,
    ambient: &dyn AmbientSignal,
) -> (ThemePreference, ThemeSource) {
    let fallback = match store.load(THEME_KEY) {
        Ok(Some(stored)) => {
            return (interpret_stored(Some(stored.as_str()), None), ThemeSource::Stored);
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "theme preference unreadable, treating as unset");
            Some(ThemeSource::Unreadable)
        }
    };

    let dark = ambient.prefers_dark();
    let source = fallback.unwrap_or(match dark {
        Some(_) => ThemeSource::System,
        None => ThemeSource::Default,
    });
    (interpret_stored(None, dark), source)
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Owner of the rendered theme and its persisted copy.
pub struct ThemeController {
    store: Box<dyn PreferenceStore>,
    ambient: Box<dyn AmbientSignal>,
    rendered: ThemePreference,
    persistent: bool,
}

impl ThemeController {
    /// Create a controller showing the light theme; call [`start`](Self::start)
    /// to resolve the real preference.
    pub fn new(store: Box<dyn PreferenceStore>, ambient: Box<dyn AmbientSignal>) -> Self {
        Self {
            store,
            ambient,
            rendered: ThemePreference::Light,
            persistent: true,
        }
    }

    /// Resolve the startup preference and apply it (which also writes it
    /// back, so the stored value always matches what is shown).
    pub fn start(&mut self) -> ThemePreference {
        let initial = self.resolve_initial_theme();
        info!(theme = %initial, "resolved initial theme");
        self.apply_theme(initial);
        initial
    }

    pub fn resolve_initial_theme(&self) -> ThemePreference {
        resolve_initial_theme(self.store.as_ref(), self.ambient.as_ref())
    }

    /// Render `pref` and persist it. Idempotent.
    pub fn apply_theme(&mut self, pref: ThemePreference) {
        self.rendered = pref;

        if !self.persistent {
            return;
        }
        if let Err(e) = self.store.save(THEME_KEY, pref.as_str()) {
            warn!(error = %e, "theme storage unavailable, keeping preference in memory");
            self.persistent = false;
        } else {
            debug!(theme = %pref, "theme persisted");
        }
    }

    /// Flip the theme and apply the result.
    pub fn toggle(&mut self) -> ThemePreference {
        let next = toggle_theme(self.rendered);
        self.apply_theme(next);
        next
    }

    /// The currently rendered mode.
    pub fn current(&self) -> ThemePreference {
        self.rendered
    }

    /// False once storage has failed for this session.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("rendered", &self.rendered)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Store whose every operation fails, like disabled browser storage.
    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    /// Memory store shared with the test so writes can be inspected.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl PreferenceStore for SharedStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().save(key, value)
        }
    }

    fn controller(store: impl PreferenceStore + 'static, dark: Option<bool>) -> ThemeController {
        ThemeController::new(Box::new(store), Box::new(FixedSignal(dark)))
    }

    #[test]
    fn toggle_is_an_involution() {
        for p in [ThemePreference::Light, ThemePreference::Dark] {
            assert_eq!(toggle_theme(toggle_theme(p)), p);
            assert_ne!(toggle_theme(p), p);
        }
    }

    #[test]
    fn applied_theme_survives_a_fresh_load() {
        for p in [ThemePreference::Light, ThemePreference::Dark] {
            let shared = SharedStore::default();
            let mut first = controller(shared.clone(), Some(!p.is_dark()));
            first.apply_theme(p);

            // New controller over the same storage, ambient signal disagreeing
            let second = controller(shared, Some(!p.is_dark()));
            assert_eq!(second.resolve_initial_theme(), p);
        }
    }

    #[test]
    fn unset_storage_follows_ambient_signal() {
        assert_eq!(
            controller(MemoryStore::new(), Some(true)).resolve_initial_theme(),
            ThemePreference::Dark
        );
        assert_eq!(
            controller(MemoryStore::new(), Some(false)).resolve_initial_theme(),
            ThemePreference::Light
        );
    }

    #[test]
    fn defaults_to_light_without_any_signal() {
        assert_eq!(
            controller(MemoryStore::new(), None).resolve_initial_theme(),
            ThemePreference::Light
        );
    }

    #[test]
    fn unrecognized_stored_value_counts_as_light() {
        let mut store = MemoryStore::new();
        store.save(THEME_KEY, "solarized").unwrap();
        assert_eq!(
            controller(store, Some(true)).resolve_initial_theme(),
            ThemePreference::Light
        );
    }

    #[test]
    fn start_writes_resolved_value_back() {
        let shared = SharedStore::default();
        let mut theme = controller(shared.clone(), Some(true));
        assert_eq!(theme.start(), ThemePreference::Dark);
        assert_eq!(shared.load(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_keeps_rendered_and_persisted_equal() {
        let shared = SharedStore::default();
        let mut theme = controller(shared.clone(), None);
        theme.start();

        for _ in 0..3 {
            let now = theme.toggle();
            assert_eq!(theme.current(), now);
            assert_eq!(shared.load(THEME_KEY).unwrap().as_deref(), Some(now.as_str()));
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let shared = SharedStore::default();
        let mut theme = controller(shared.clone(), None);
        theme.apply_theme(ThemePreference::Dark);
        let once = (theme.current(), shared.load(THEME_KEY).unwrap());
        theme.apply_theme(ThemePreference::Dark);
        let twice = (theme.current(), shared.load(THEME_KEY).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn broken_storage_degrades_to_memory() {
        let mut theme = controller(BrokenStore, Some(true));
        assert_eq!(theme.start(), ThemePreference::Dark);
        assert!(!theme.is_persistent());

        assert_eq!(theme.toggle(), ThemePreference::Light);
        assert_eq!(theme.current(), ThemePreference::Light);
    }

    #[test]
    fn file_store_round_trips_and_keeps_other_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("preferences.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"locale":"en"}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        store.save(THEME_KEY, "dark").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.load("locale").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn file_store_missing_file_is_unset() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("preferences.json"));
        assert_eq!(store.load(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_corrupt_file_reads_as_error_but_resolves() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(THEME_KEY), Err(StorageError::Corrupt(_))));
        assert_eq!(
            resolve_initial_theme(&store, &FixedSignal(Some(true))),
            ThemePreference::Dark
        );
    }

    #[test]
    fn explain_names_each_source() {
        let mut stored = MemoryStore::new();
        stored.save(THEME_KEY, "dark").unwrap();
        assert_eq!(
            explain_initial_theme(&stored, &FixedSignal(Some(false))),
            (ThemePreference::Dark, ThemeSource::Stored)
        );

        let empty = MemoryStore::new();
        assert_eq!(
            explain_initial_theme(&empty, &FixedSignal(Some(true))),
            (ThemePreference::Dark, ThemeSource::System)
        );
        assert_eq!(
            explain_initial_theme(&empty, &FixedSignal(None)),
            (ThemePreference::Light, ThemeSource::Default)
        );
    }

    #[test]
    fn explain_corrupt_file_reports_unreadable_without_failing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let (theme, source) = explain_initial_theme(&store, &FixedSignal(None));
        assert_eq!(theme, ThemePreference::Light);
        assert_eq!(source, ThemeSource::Unreadable);
        assert!(source.to_string().contains("unreadable"));
    }

    #[test]
    fn file_store_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("preferences.json");
        let mut theme = ThemeController::new(
            Box::new(JsonFileStore::new(&path)),
            Box::new(FixedSignal(None)),
        );
        theme.apply_theme(ThemePreference::Dark);
        assert!(theme.is_persistent());
        assert!(path.exists());
    }
}
