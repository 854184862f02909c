//! Light/dark preference
//!
//! The only client state that outlives a session. Stored as a single word in
//! a file under the data directory.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {} (expected light or dark)", other)),
        }
    }
}

/// File-backed theme preference
pub struct ThemeStore {
    path: PathBuf,
    current: Theme,
}

impl ThemeStore {
    /// Read the stored preference; a missing or unreadable value means light
    pub fn load(path: PathBuf) -> Self {
        let current = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        debug!(theme = %current, "Theme loaded");
        Self { path, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip and persist
    pub fn toggle(&mut self) -> Result<Theme> {
        self.set(self.current.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Result<Theme> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::write(&self.path, theme.to_string())
            .with_context(|| format!("Failed to write theme file: {:?}", self.path))?;
        self.current = theme;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_light() {
        let temp = TempDir::new().unwrap();
        let store = ThemeStore::load(temp.path().join("theme"));
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_garbage_is_light() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("theme");
        std::fs::write(&path, "solarized").unwrap();
        assert_eq!(ThemeStore::load(path).current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("theme");

        let mut store = ThemeStore::load(path.clone());
        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(ThemeStore::load(path.clone()).current(), Theme::Dark);

        store.toggle().unwrap();
        assert_eq!(ThemeStore::load(path).current(), Theme::Light);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Dark\n".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
