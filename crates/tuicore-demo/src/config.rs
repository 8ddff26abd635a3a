//! `tuicore.toml` loading: raw (all-optional, `serde` + `toml`) file shape
//! plus the effective, fully-defaulted [`Config`] the rest of the binary
//! reads. Grounded on `core-config`'s `ConfigFile`/`Config` split — a
//! missing file or an unreadable one is not an error, it's the default.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// On-disk shape: every field optional so unknown/future keys never break
/// parsing and a partially-filled file just defaults the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    altscreen: Option<bool>,
    mouse: Option<bool>,
    expose_after_scroll: Option<bool>,
}

/// The effective, fully-resolved configuration the demo runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub altscreen: bool,
    pub mouse: bool,
    pub expose_after_scroll: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            altscreen: true,
            mouse: true,
            expose_after_scroll: true,
        }
    }
}

impl Config {
    /// Load from `path`, or `tuicore.toml` in the working directory if
    /// `path` is `None`. A missing default file is silently the defaults;
    /// an explicitly-named missing file, or a malformed one, is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("tuicore.toml");
        let (chosen, explicit) = match path {
            Some(p) => (p, true),
            None => (default_path, false),
        };

        let content = match std::fs::read_to_string(chosen) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(target: "config", path = %chosen.display(), "no config file found, using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading config file {}", chosen.display()));
            }
        };

        let file: ConfigFile =
            toml::from_str(&content).with_context(|| format!("parsing config file {}", chosen.display()))?;
        let defaults = Config::default();
        Ok(Config {
            altscreen: file.altscreen.unwrap_or(defaults.altscreen),
            mouse: file.mouse.unwrap_or(defaults.mouse),
            expose_after_scroll: file.expose_after_scroll.unwrap_or(defaults.expose_after_scroll),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let cfg = Config::load(None).unwrap();
        std::env::set_current_dir(cwd).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let missing = Path::new("/nonexistent/tuicore-demo-test.toml");
        assert!(Config::load(Some(missing)).is_err());
    }

    #[test]
    fn partial_file_defaults_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuicore.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "mouse = false").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert!(!cfg.mouse);
        assert_eq!(cfg.altscreen, Config::default().altscreen);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuicore.toml");
        std::fs::write(&path, "mouse = not-a-bool-or-string???").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
