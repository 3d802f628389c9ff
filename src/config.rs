//! Persisted preferences - the theme is the only thing that survives a restart

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, warn};

const APP_DIR: &str = "gymtracky";
const THEME_KEY: &str = "mygymtracky-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme '{}' (expected light or dark)", other),
        }
    }
}

/// Theme implied by `COLORFGBG` ("fg;bg" or "fg;default;bg"), the closest
/// thing a terminal has to a system color-scheme preference
pub fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if bg <= 6 || bg == 8 { Theme::Dark } else { Theme::Light })
}

/// Single-key preference file
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/gymtracky/mygymtracky-theme`
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(Self::at(dir.join(APP_DIR).join(THEME_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved theme, if any valid value was written before
    pub fn saved_theme(&self) -> Option<Theme> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!("Ignoring saved theme at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Startup theme: saved value, then the terminal's hint, then light
    pub fn load_theme(&self) -> Theme {
        self.load_theme_with_hint(std::env::var("COLORFGBG").ok().as_deref())
    }

    fn load_theme_with_hint(&self, colorfgbg: Option<&str>) -> Theme {
        self.saved_theme()
            .or_else(|| colorfgbg.and_then(theme_from_colorfgbg))
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, theme.as_str())
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!(%theme, path = %self.path.display(), "theme saved");
        Ok(())
    }
}

/// Where the TUI writes its log, so the alternate screen stays clean
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("gymtracky.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_colorfgbg_hint() {
        assert_eq!(theme_from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(theme_from_colorfgbg("0;default;15"), Some(Theme::Light));
        assert_eq!(theme_from_colorfgbg("7;8"), Some(Theme::Dark));
        assert_eq!(theme_from_colorfgbg("garbage"), None);
    }

    #[test]
    fn test_saved_theme_wins_over_hint() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::at(dir.path().join("nested").join(THEME_KEY));

        assert_eq!(prefs.saved_theme(), None);
        assert_eq!(prefs.load_theme_with_hint(None), Theme::Light);
        assert_eq!(prefs.load_theme_with_hint(Some("15;0")), Theme::Dark);

        prefs.save_theme(Theme::Light).unwrap();
        assert_eq!(prefs.saved_theme(), Some(Theme::Light));
        assert_eq!(prefs.load_theme_with_hint(Some("15;0")), Theme::Light);
    }

    #[test]
    fn test_corrupt_value_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(THEME_KEY);
        fs::write(&path, "neon").unwrap();

        let prefs = Preferences::at(&path);
        assert_eq!(prefs.saved_theme(), None);
        assert_eq!(prefs.load_theme_with_hint(Some("0;15")), Theme::Light);
    }
}
