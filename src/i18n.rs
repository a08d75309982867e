//! Localised user-facing messages.
//!
//! A [`Translator`] is built once at startup and handed to the HTTP layer.
//! English and French ship built in; a directory of `<lang>.json` files
//! (flat `{"key": "text"}` objects) can add languages or override entries.

use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Stable identifiers for every message the API can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ErrorListTask,
    InvalidTaskId,
    InvalidTaskPayload,
    TaskNotFound,
    CategoryNotFound,
    InvalidTaskHierarchy,
    FailListSubtasks,
    FailGetTask,
    FailCreateTask,
    FailUpdateTask,
    FailDeleteTask,
    RouteNotFound,
}

impl MessageKey {
    pub const ALL: [MessageKey; 12] = [
        MessageKey::ErrorListTask,
        MessageKey::InvalidTaskId,
        MessageKey::InvalidTaskPayload,
        MessageKey::TaskNotFound,
        MessageKey::CategoryNotFound,
        MessageKey::InvalidTaskHierarchy,
        MessageKey::FailListSubtasks,
        MessageKey::FailGetTask,
        MessageKey::FailCreateTask,
        MessageKey::FailUpdateTask,
        MessageKey::FailDeleteTask,
        MessageKey::RouteNotFound,
    ];

    /// Key as it appears in catalog files
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::ErrorListTask => "errorListTask",
            MessageKey::InvalidTaskId => "invalidTaskID",
            MessageKey::InvalidTaskPayload => "invalidTaskPayload",
            MessageKey::TaskNotFound => "taskNotFound",
            MessageKey::CategoryNotFound => "categoryNotFound",
            MessageKey::InvalidTaskHierarchy => "invalidTaskHierarchy",
            MessageKey::FailListSubtasks => "failListSubtasks",
            MessageKey::FailGetTask => "failGetTask",
            MessageKey::FailCreateTask => "failCreateTask",
            MessageKey::FailUpdateTask => "failUpdateTask",
            MessageKey::FailDeleteTask => "failDeleteTask",
            MessageKey::RouteNotFound => "routeNotFound",
        }
    }
}

const EN: [(MessageKey, &str); 12] = [
    (MessageKey::ErrorListTask, "failed to list root tasks"),
    (MessageKey::InvalidTaskId, "Invalid id"),
    (MessageKey::InvalidTaskPayload, "Invalid task payload"),
    (MessageKey::TaskNotFound, "Task not found"),
    (MessageKey::CategoryNotFound, "Category not found"),
    (
        MessageKey::InvalidTaskHierarchy,
        "A task cannot be its own ancestor",
    ),
    (MessageKey::FailListSubtasks, "failed to list subtasks"),
    (MessageKey::FailGetTask, "failed to get task"),
    (MessageKey::FailCreateTask, "failed to create task"),
    (MessageKey::FailUpdateTask, "failed to update task"),
    (MessageKey::FailDeleteTask, "failed to delete task"),
    (MessageKey::RouteNotFound, "Route not found"),
];

const FR: [(MessageKey, &str); 12] = [
    (
        MessageKey::ErrorListTask,
        "impossible de lister les tâches racines",
    ),
    (MessageKey::InvalidTaskId, "Identifiant invalide"),
    (MessageKey::InvalidTaskPayload, "Contenu de tâche invalide"),
    (MessageKey::TaskNotFound, "Tâche introuvable"),
    (MessageKey::CategoryNotFound, "Catégorie introuvable"),
    (
        MessageKey::InvalidTaskHierarchy,
        "Une tâche ne peut pas être son propre ancêtre",
    ),
    (
        MessageKey::FailListSubtasks,
        "impossible de lister les sous-tâches",
    ),
    (MessageKey::FailGetTask, "impossible de récupérer la tâche"),
    (MessageKey::FailCreateTask, "impossible de créer la tâche"),
    (
        MessageKey::FailUpdateTask,
        "impossible de mettre à jour la tâche",
    ),
    (MessageKey::FailDeleteTask, "impossible de supprimer la tâche"),
    (MessageKey::RouteNotFound, "Route introuvable"),
];

#[derive(Debug, Clone)]
pub struct Translator {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Translator with the built-in English and French catalogs.
    pub fn new() -> Self {
        let mut translator = Self {
            catalogs: HashMap::new(),
        };
        translator.insert_catalog(
            "en",
            EN.iter().map(|(k, v)| (k.as_str().to_string(), v.to_string())),
        );
        translator.insert_catalog(
            "fr",
            FR.iter().map(|(k, v)| (k.as_str().to_string(), v.to_string())),
        );
        translator
    }

    /// Merge entries into the catalog for `language`, replacing existing keys.
    pub fn insert_catalog(
        &mut self,
        language: &str,
        entries: impl IntoIterator<Item = (String, String)>,
    ) {
        self.catalogs
            .entry(language.to_lowercase())
            .or_default()
            .extend(entries);
    }

    /// Load every `<lang>.json` file in `dir`.
    ///
    /// Unreadable or malformed files are skipped with a warning. Returns the
    /// number of catalogs merged.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let parsed = std::fs::read_to_string(&path)
                .map_err(crate::error::TaskError::from)
                .and_then(|raw| {
                    serde_json::from_str::<HashMap<String, String>>(&raw).map_err(Into::into)
                });

            match parsed {
                Ok(entries) => {
                    tracing::debug!(language, entries = entries.len(), "Loaded translations");
                    self.insert_catalog(language, entries);
                    loaded += 1;
                },
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to load translation file");
                },
            }
        }

        Ok(loaded)
    }

    pub fn supports(&self, language: &str) -> bool {
        self.catalogs.contains_key(&language.to_lowercase())
    }

    /// Resolve `key` for `language`, falling back to English and then to the raw key.
    pub fn translate(&self, language: &str, key: MessageKey) -> String {
        let lookup = |lang: &str| {
            self.catalogs
                .get(lang)
                .and_then(|catalog| catalog.get(key.as_str()))
        };

        if let Some(text) = lookup(&language.to_lowercase()).or_else(|| lookup(DEFAULT_LANGUAGE)) {
            return text.clone();
        }

        tracing::warn!(language, key = key.as_str(), "Missing translation");
        key.as_str().to_string()
    }
}
