//! Token Session
//!
//! Where the access/refresh JWT pair lives between requests.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Stored JWT pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Persistence for the session tokens
pub trait TokenStore {
    fn load(&self) -> Tokens;

    fn save(&self, tokens: &Tokens);

    fn access(&self) -> Option<String> {
        self.load().access
    }

    fn refresh(&self) -> Option<String> {
        self.load().refresh
    }

    fn clear(&self) {
        self.save(&Tokens::default());
    }

    fn is_logged_in(&self) -> bool {
        self.access().is_some()
    }
}

/// In-process store, used by tests and one-shot tools
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Tokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: Option<&str>) -> Self {
        Self {
            tokens: RwLock::new(Tokens {
                access: Some(access.to_string()),
                refresh: refresh.map(str::to_string),
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Tokens {
        match self.tokens.read() {
            Ok(tokens) => tokens.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, tokens: &Tokens) {
        match self.tokens.write() {
            Ok(mut guard) => *guard = tokens.clone(),
            Err(poisoned) => *poisoned.into_inner() = tokens.clone(),
        }
    }
}

impl<S: TokenStore + ?Sized> TokenStore for std::rc::Rc<S> {
    fn load(&self) -> Tokens {
        (**self).load()
    }

    fn save(&self, tokens: &Tokens) {
        (**self).save(tokens)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::*;
    use std::path::{Path, PathBuf};

    /// Tokens persisted as JSON on disk, for the CLI
    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<data dir>/pos/session.json`
        pub fn default_path() -> PathBuf {
            dirs::data_local_dir()
                .map(|p| p.join("pos").join("session.json"))
                .unwrap_or_else(|| PathBuf::from("./pos_session.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl TokenStore for FileTokenStore {
        fn load(&self) -> Tokens {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(_) => return Tokens::default(),
            };
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                Tokens::default()
            })
        }

        fn save(&self, tokens: &Tokens) {
            if tokens == &Tokens::default() {
                if self.path.exists() {
                    if let Err(e) = std::fs::remove_file(&self.path) {
                        tracing::warn!("Failed to remove session file {:?}: {}", self.path, e);
                    }
                }
                return;
            }

            if let Some(parent) = self.path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Failed to create {:?}: {}", parent, e);
                    return;
                }
            }
            let result = serde_json::to_string_pretty(tokens)
                .map_err(|e| e.to_string())
                .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
            if let Err(e) = result {
                tracing::warn!("Failed to write session file {:?}: {}", self.path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_refresh_keeps_refresh_token() {
        let store = MemoryTokenStore::with_tokens("a1", Some("r1"));
        store.save(&Tokens {
            access: Some("a2".into()),
            ..store.load()
        });
        assert_eq!(store.access().as_deref(), Some("a2"));
        assert_eq!(store.refresh().as_deref(), Some("r1"));

        store.clear();
        assert!(!store.is_logged_in());
        assert_eq!(store.refresh(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));
        assert!(!store.is_logged_in());

        store.save(&Tokens {
            access: Some("acc".into()),
            refresh: Some("ref".into()),
        });
        let reopened = FileTokenStore::new(store.path());
        assert_eq!(reopened.access().as_deref(), Some("acc"));

        reopened.clear();
        assert!(!store.path().exists());
    }
}
