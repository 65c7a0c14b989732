//! Centralised noteerr user-directory resolution.
//!
//! Priority for the user-level base directory:
//!   1. `NOTEERR_HOME` env var (if set and non-empty)
//!   2. `~/.noteerr`
//!
//! For the entry file, an additional override applies on top:
//!   1. `NOTEERR_DATA_FILE` env var (highest priority)
//!   2. `data_file` from `config.toml`
//!   3. `{user_dir}/errors.json`

use std::path::PathBuf;

use crate::config::Config;

/// File name of the JSON entry store inside the user directory.
pub const DATA_FILE_NAME: &str = "errors.json";

/// File name of the optional TOML config inside the user directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

fn non_empty_env(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the noteerr user-level base directory.
pub fn user_dir() -> Option<PathBuf> {
    non_empty_env("NOTEERR_HOME").or_else(|| dirs::home_dir().map(|h| h.join(".noteerr")))
}

/// Returns the path of the optional config file.
pub fn config_file() -> Option<PathBuf> {
    user_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Returns the path of the entry store, honouring env and config overrides.
pub fn data_file(config: &Config) -> Option<PathBuf> {
    if let Some(p) = non_empty_env("NOTEERR_DATA_FILE") {
        return Some(p);
    }
    if let Some(p) = &config.data_file {
        return Some(p.clone());
    }
    user_dir().map(|d| d.join(DATA_FILE_NAME))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn set_env(name: &str, val: &str) {
        // SAFETY: test-only env mutation; #[serial] prevents races.
        unsafe { std::env::set_var(name, val) };
    }

    fn clear_env(name: &str) {
        unsafe { std::env::remove_var(name) };
    }

    #[test]
    #[serial]
    fn user_dir_uses_noteerr_home_when_set() {
        set_env("NOTEERR_HOME", "/custom/noteerr");
        let result = user_dir();
        clear_env("NOTEERR_HOME");
        assert_eq!(result, Some(PathBuf::from("/custom/noteerr")));
    }

    #[test]
    #[serial]
    fn user_dir_ignores_empty_noteerr_home() {
        set_env("NOTEERR_HOME", "");
        let result = user_dir();
        clear_env("NOTEERR_HOME");
        assert_eq!(result, dirs::home_dir().map(|h| h.join(".noteerr")));
    }

    #[test]
    #[serial]
    fn data_file_env_wins_over_config_and_home() {
        set_env("NOTEERR_DATA_FILE", "/env/errors.json");
        set_env("NOTEERR_HOME", "/home/noteerr");
        let config = Config {
            data_file: Some(PathBuf::from("/config/errors.json")),
            ..Config::default()
        };
        let result = data_file(&config);
        clear_env("NOTEERR_DATA_FILE");
        clear_env("NOTEERR_HOME");
        assert_eq!(result, Some(PathBuf::from("/env/errors.json")));
    }

    #[test]
    #[serial]
    fn data_file_config_wins_over_home() {
        set_env("NOTEERR_HOME", "/home/noteerr");
        let config = Config {
            data_file: Some(PathBuf::from("/config/errors.json")),
            ..Config::default()
        };
        let result = data_file(&config);
        clear_env("NOTEERR_HOME");
        assert_eq!(result, Some(PathBuf::from("/config/errors.json")));
    }

    #[test]
    #[serial]
    fn data_file_defaults_under_user_dir() {
        set_env("NOTEERR_HOME", "/home/noteerr");
        let result = data_file(&Config::default());
        let cfg = config_file();
        clear_env("NOTEERR_HOME");
        assert_eq!(result, Some(PathBuf::from("/home/noteerr/errors.json")));
        assert_eq!(cfg, Some(PathBuf::from("/home/noteerr/config.toml")));
    }
}
