//! Durable local storage for the session token and UI preferences.
//!
//! Each value is one small file under the state directory, named by its
//! fixed key. Reads swallow errors (a missing or unreadable file is simply
//! "no value"), matching how a browser client treats blocked local storage.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// Storage key for the admin bearer token.
pub const TOKEN_KEY: &str = "adm_token";

/// Storage key for the UI theme preference.
pub const THEME_KEY: &str = "theme";

/// Light/dark preference persisted for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn from_str(s: &str) -> Self {
        match s.trim() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

/// File-backed credential and preference store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root_dir: PathBuf,
}

impl CredentialStore {
    /// Create a store rooted at the given state directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    fn read_key(&self, key: &str) -> Option<String> {
        let value = fs::read_to_string(self.path(key)).ok()?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn write_key(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root_dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn clear_key(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }

    /// Stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.read_key(TOKEN_KEY)
    }

    /// Persist a bearer token.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.write_key(TOKEN_KEY, token)
    }

    /// Drop the stored token (logout or server-side 401).
    pub fn clear_token(&self) {
        self.clear_key(TOKEN_KEY);
    }

    /// Stored theme preference, defaulting to dark.
    pub fn theme(&self) -> Theme {
        self.read_key(THEME_KEY)
            .map(|s| Theme::from_str(&s))
            .unwrap_or_default()
    }

    /// Persist the theme preference.
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.write_key(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_token_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        assert_eq!(store.token(), None);
        store.set_token("abc123").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.clear_token();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_clear_missing_token_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.clear_token();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_theme_defaults_to_dark() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        assert_eq!(store.theme(), Theme::Dark);
        store.set_theme(Theme::Light).unwrap();
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_value_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.write_key(THEME_KEY, "solarized").unwrap();
        assert_eq!(store.theme(), Theme::Dark);
    }
}
