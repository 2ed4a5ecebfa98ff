//! Client settings and the display classes they toggle.
//!
//! Settings are plain booleans held in memory. Listeners registered with
//! `on_change` run synchronously after a value actually changes.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Setting {
    /// Stream-observer layout.
    Enabled,
    /// Show cards to every participant, not just the observer.
    DisplayCards,
    /// Hide the macro bar while in stream mode.
    HideMacros,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::Enabled, Setting::DisplayCards, Setting::HideMacros];

    pub fn key(self) -> &'static str {
        match self {
            Setting::Enabled => "enabled",
            Setting::DisplayCards => "displayCards",
            Setting::HideMacros => "hideMacros",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Setting::Enabled => "Enable Stream Mode",
            Setting::DisplayCards => "Display Stream Mode Cards",
            Setting::HideMacros => "Hide Macros in Stream Mode",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Setting::Enabled => "Display contents for the stream dedicated observer.",
            Setting::DisplayCards => {
                "Display Stream Mode cards even when not the stream dedicated observer."
            }
            Setting::HideMacros => "Hide the Macro bar when in Stream Mode.",
        }
    }

    /// Display class applied while the setting is on.
    pub fn css_class(self) -> &'static str {
        match self {
            Setting::Enabled => "stream-mode",
            Setting::DisplayCards => "show-stream-mode-cards",
            Setting::HideMacros => "hide-macros",
        }
    }

    /// Look up by key, ignoring case.
    pub fn from_key(key: &str) -> Option<Setting> {
        Setting::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(key))
    }
}

type Listener = Box<dyn Fn(Setting, bool) + Send + Sync>;

/// Process-wide boolean settings with change notification.
#[derive(Default)]
pub struct SettingsStore {
    values: RwLock<HashMap<Setting, bool>>,
    listeners: Mutex<Vec<Listener>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with initial values; no listeners fire.
    pub fn with_values(values: impl IntoIterator<Item = (Setting, bool)>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().collect()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Current value; unset settings are off.
    pub fn get(&self, setting: Setting) -> bool {
        self.values.read().get(&setting).copied().unwrap_or(false)
    }

    /// Update a value. Returns whether it changed; listeners only run on change.
    pub fn set(&self, setting: Setting, value: bool) -> bool {
        let previous = self.values.write().insert(setting, value).unwrap_or(false);
        if previous == value {
            return false;
        }

        tracing::debug!(setting = setting.key(), value, "setting changed");
        for listener in self.listeners.lock().iter() {
            listener(setting, value);
        }
        true
    }

    pub fn on_change(&self, listener: impl Fn(Setting, bool) + Send + Sync + 'static) {
        self.listeners.lock().push(Box::new(listener));
    }

    pub fn snapshot(&self) -> Vec<(Setting, bool)> {
        Setting::ALL.into_iter().map(|s| (s, self.get(s))).collect()
    }
}

/// Set of display classes kept in sync with a `SettingsStore`.
#[derive(Clone, Default)]
pub struct DisplayClasses {
    active: Arc<Mutex<BTreeSet<&'static str>>>,
}

impl DisplayClasses {
    /// Apply the store's current values and follow later changes.
    pub fn attach(settings: &SettingsStore) -> Self {
        let classes = Self::default();
        for (setting, value) in settings.snapshot() {
            classes.apply(setting, value);
        }

        let tracked = classes.clone();
        settings.on_change(move |setting, value| tracked.apply(setting, value));
        classes
    }

    fn apply(&self, setting: Setting, enabled: bool) {
        let mut active = self.active.lock();
        if enabled {
            active.insert(setting.css_class());
        } else {
            active.remove(setting.css_class());
        }
    }

    /// Active classes in sorted order.
    pub fn active(&self) -> Vec<&'static str> {
        self.active.lock().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn settings_default_to_off() {
        let store = SettingsStore::new();
        for setting in Setting::ALL {
            assert!(!store.get(setting));
        }
    }

    #[test]
    fn set_reports_change_and_notifies_once() {
        let store = SettingsStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.on_change(move |setting, value| {
            assert_eq!(setting, Setting::DisplayCards);
            assert!(value);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set(Setting::DisplayCards, true));
        assert!(!store.set(Setting::DisplayCards, true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.get(Setting::DisplayCards));
    }

    #[test]
    fn setting_off_when_unset_is_not_a_change() {
        let store = SettingsStore::new();
        assert!(!store.set(Setting::HideMacros, false));
    }

    #[test]
    fn from_key_matches_registered_keys() {
        assert_eq!(Setting::from_key("displayCards"), Some(Setting::DisplayCards));
        assert_eq!(Setting::from_key("HIDEMACROS"), Some(Setting::HideMacros));
        assert_eq!(Setting::from_key("volume"), None);
    }

    #[test]
    fn display_classes_follow_settings() {
        let store = SettingsStore::with_values([(Setting::Enabled, true)]);
        let classes = DisplayClasses::attach(&store);
        assert_eq!(classes.active(), vec!["stream-mode"]);

        store.set(Setting::HideMacros, true);
        store.set(Setting::DisplayCards, true);
        assert_eq!(
            classes.active(),
            vec!["hide-macros", "show-stream-mode-cards", "stream-mode"]
        );

        store.set(Setting::Enabled, false);
        assert_eq!(classes.active(), vec!["hide-macros", "show-stream-mode-cards"]);
    }
}
