//! The persisted settings blob and the key-value stores that hold it.
//!
//! The blob is a flat JSON object of boolean toggles kept under a single
//! storage key. It is read once when a [`SettingsManager`] is created and
//! written only on an explicit [`SettingsManager::save`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{Error, Result};

pub const DEFAULT_STORAGE_KEY: &str = "chatbot-settings";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsState {
    // AI
    #[serde(rename = "enableAI")]
    pub enable_ai: bool,
    pub auto_suggestions: bool,
    pub auto_categories: bool,
    pub sentiment_analysis: bool,
    pub priority_suggestions: bool,
    pub auto_replies: bool,

    // Notifications
    pub email_notifications: bool,
    pub desktop_notifications: bool,
    pub sound_alerts: bool,
    pub new_conversation_alerts: bool,
    pub mention_alerts: bool,
    pub assignment_alerts: bool,

    // Interface
    pub compact_mode: bool,
    pub dark_mode: bool,
    pub show_avatars: bool,
    pub show_timestamps: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            enable_ai: true,
            auto_suggestions: true,
            auto_categories: true,
            sentiment_analysis: true,
            priority_suggestions: false,
            auto_replies: false,
            email_notifications: true,
            desktop_notifications: true,
            sound_alerts: false,
            new_conversation_alerts: true,
            mention_alerts: true,
            assignment_alerts: true,
            compact_mode: false,
            dark_mode: false,
            show_avatars: true,
            show_timestamps: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingGroup {
    Ai,
    Notifications,
    Interface,
}

/// Name of one toggle in the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    EnableAi,
    AutoSuggestions,
    AutoCategories,
    SentimentAnalysis,
    PrioritySuggestions,
    AutoReplies,
    EmailNotifications,
    DesktopNotifications,
    SoundAlerts,
    NewConversationAlerts,
    MentionAlerts,
    AssignmentAlerts,
    CompactMode,
    DarkMode,
    ShowAvatars,
    ShowTimestamps,
}

impl SettingKey {
    pub const ALL: [SettingKey; 16] = [
        SettingKey::EnableAi,
        SettingKey::AutoSuggestions,
        SettingKey::AutoCategories,
        SettingKey::SentimentAnalysis,
        SettingKey::PrioritySuggestions,
        SettingKey::AutoReplies,
        SettingKey::EmailNotifications,
        SettingKey::DesktopNotifications,
        SettingKey::SoundAlerts,
        SettingKey::NewConversationAlerts,
        SettingKey::MentionAlerts,
        SettingKey::AssignmentAlerts,
        SettingKey::CompactMode,
        SettingKey::DarkMode,
        SettingKey::ShowAvatars,
        SettingKey::ShowTimestamps,
    ];

    /// The key as it appears in the stored blob.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::EnableAi => "enableAI",
            SettingKey::AutoSuggestions => "autoSuggestions",
            SettingKey::AutoCategories => "autoCategories",
            SettingKey::SentimentAnalysis => "sentimentAnalysis",
            SettingKey::PrioritySuggestions => "prioritySuggestions",
            SettingKey::AutoReplies => "autoReplies",
            SettingKey::EmailNotifications => "emailNotifications",
            SettingKey::DesktopNotifications => "desktopNotifications",
            SettingKey::SoundAlerts => "soundAlerts",
            SettingKey::NewConversationAlerts => "newConversationAlerts",
            SettingKey::MentionAlerts => "mentionAlerts",
            SettingKey::AssignmentAlerts => "assignmentAlerts",
            SettingKey::CompactMode => "compactMode",
            SettingKey::DarkMode => "darkMode",
            SettingKey::ShowAvatars => "showAvatars",
            SettingKey::ShowTimestamps => "showTimestamps",
        }
    }

    pub fn group(self) -> SettingGroup {
        match self {
            SettingKey::EnableAi
            | SettingKey::AutoSuggestions
            | SettingKey::AutoCategories
            | SettingKey::SentimentAnalysis
            | SettingKey::PrioritySuggestions
            | SettingKey::AutoReplies => SettingGroup::Ai,
            SettingKey::EmailNotifications
            | SettingKey::DesktopNotifications
            | SettingKey::SoundAlerts
            | SettingKey::NewConversationAlerts
            | SettingKey::MentionAlerts
            | SettingKey::AssignmentAlerts => SettingGroup::Notifications,
            SettingKey::CompactMode
            | SettingKey::DarkMode
            | SettingKey::ShowAvatars
            | SettingKey::ShowTimestamps => SettingGroup::Interface,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::NotFound(format!("setting '{s}'")))
    }
}

impl SettingsState {
    pub fn get(&self, key: SettingKey) -> bool {
        *self.slot(key)
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        *self.slot_mut(key) = value;
    }

    /// All toggles keyed by their blob name.
    pub fn entries(&self) -> BTreeMap<&'static str, bool> {
        SettingKey::ALL.into_iter().map(|k| (k.as_str(), self.get(k))).collect()
    }

    fn slot(&self, key: SettingKey) -> &bool {
        match key {
            SettingKey::EnableAi => &self.enable_ai,
            SettingKey::AutoSuggestions => &self.auto_suggestions,
            SettingKey::AutoCategories => &self.auto_categories,
            SettingKey::SentimentAnalysis => &self.sentiment_analysis,
            SettingKey::PrioritySuggestions => &self.priority_suggestions,
            SettingKey::AutoReplies => &self.auto_replies,
            SettingKey::EmailNotifications => &self.email_notifications,
            SettingKey::DesktopNotifications => &self.desktop_notifications,
            SettingKey::SoundAlerts => &self.sound_alerts,
            SettingKey::NewConversationAlerts => &self.new_conversation_alerts,
            SettingKey::MentionAlerts => &self.mention_alerts,
            SettingKey::AssignmentAlerts => &self.assignment_alerts,
            SettingKey::CompactMode => &self.compact_mode,
            SettingKey::DarkMode => &self.dark_mode,
            SettingKey::ShowAvatars => &self.show_avatars,
            SettingKey::ShowTimestamps => &self.show_timestamps,
        }
    }

    fn slot_mut(&mut self, key: SettingKey) -> &mut bool {
        match key {
            SettingKey::EnableAi => &mut self.enable_ai,
            SettingKey::AutoSuggestions => &mut self.auto_suggestions,
            SettingKey::AutoCategories => &mut self.auto_categories,
            SettingKey::SentimentAnalysis => &mut self.sentiment_analysis,
            SettingKey::PrioritySuggestions => &mut self.priority_suggestions,
            SettingKey::AutoReplies => &mut self.auto_replies,
            SettingKey::EmailNotifications => &mut self.email_notifications,
            SettingKey::DesktopNotifications => &mut self.desktop_notifications,
            SettingKey::SoundAlerts => &mut self.sound_alerts,
            SettingKey::NewConversationAlerts => &mut self.new_conversation_alerts,
            SettingKey::MentionAlerts => &mut self.mention_alerts,
            SettingKey::AssignmentAlerts => &mut self.assignment_alerts,
            SettingKey::CompactMode => &mut self.compact_mode,
            SettingKey::DarkMode => &mut self.dark_mode,
            SettingKey::ShowAvatars => &mut self.show_avatars,
            SettingKey::ShowTimestamps => &mut self.show_timestamps,
        }
    }
}

/// A string-to-string store in the spirit of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|e| Error::Operation(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|e| Error::Operation(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // write-then-rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Owns the in-memory settings and the unsaved-changes flag.
pub struct SettingsManager<S: KeyValueStore> {
    store: S,
    storage_key: String,
    current: SettingsState,
    unsaved: bool,
}

impl<S: KeyValueStore> SettingsManager<S> {
    /// Read the blob once. A missing, unreadable or malformed blob yields the
    /// defaults.
    pub fn load(store: S, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let current = match store.get(&storage_key) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                tracing::warn!(key = %storage_key, error = %e, "stored settings are malformed; using defaults");
                SettingsState::default()
            }),
            Ok(None) => SettingsState::default(),
            Err(e) => {
                tracing::warn!(key = %storage_key, error = %e, "could not read stored settings; using defaults");
                SettingsState::default()
            }
        };
        Self { store, storage_key, current, unsaved: false }
    }

    pub fn settings(&self) -> &SettingsState {
        &self.current
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn update(&mut self, key: SettingKey, value: bool) {
        self.current.set(key, value);
        self.unsaved = true;
    }

    /// Restore defaults in memory; the store is untouched until `save`.
    pub fn reset(&mut self) {
        self.current = SettingsState::default();
        self.unsaved = true;
    }

    pub fn save(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.current)?;
        self.store.set(&self.storage_key, &blob)?;
        self.unsaved = false;
        tracing::info!(key = %self.storage_key, dark_mode = self.current.dark_mode, "settings saved");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
