//! Path helpers for configuration file locations.
//!
//! Uses the `directories` crate for platform-appropriate paths.

use std::path::PathBuf;

use crate::loader::ConfigError;

/// Returns the default path to the server registry file.
///
/// - Linux: `~/.config/scope/config.json`
/// - macOS: `~/Library/Application Support/scope/config.json`
/// - Windows: `%AppData%\scope\config\config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = directories::ProjectDirs::from("", "", "scope").ok_or_else(|| {
        ConfigError::ConfigDirUnavailable("failed to determine project directories".to_string())
    })?;

    Ok(proj_dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_matches_expected_project_dirs() {
        let expected = directories::ProjectDirs::from("", "", "scope")
            .unwrap()
            .config_dir()
            .join("config.json");

        assert_eq!(default_config_path().unwrap(), expected);
    }
}
