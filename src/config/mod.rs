//! Configuration management module.
//!
//! This module handles loading, saving, and managing application
//! configuration, including the API base URL, the session token, and
//! the theme preference.

mod error;

pub use error::ConfigError;

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/dualtab-admin";
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Oversees management of configuration file.
///
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub access_token: Option<String>,
    pub theme_name: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_theme_name() -> String {
    "tokyo-night".to_string()
}

impl Config {
    /// Return a new empty instance.
    ///
    pub fn new() -> Config {
        Config {
            api_url: default_api_url(),
            access_token: None,
            theme_name: default_theme_name(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the
    /// custom path if provided. A missing file is not an error: the
    /// session token is acquired through the login screen and saved
    /// afterwards.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> AppResult<()> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.api_url = data.api_url;
            self.access_token = data.access_token;
            self.theme_name = data.theme_name;
        }

        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> AppResult<()> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        let data = FileSpec {
            api_url: self.api_url.clone(),
            access_token: self.access_token.clone(),
            theme_name: self.theme_name.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Returns the path buffer for the default path to the
    /// configuration file or an error if the home directory could not
    /// be found.
    ///
    fn default_path() -> AppResult<PathBuf> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_spec_defaults() {
        let data: FileSpec = serde_yaml::from_str("{}").unwrap();
        assert_eq!(data.api_url, DEFAULT_API_URL);
        assert_eq!(data.access_token, None);
        assert_eq!(data.theme_name, "tokyo-night");
    }

    #[test]
    fn test_file_spec_round_trip() {
        let data = FileSpec {
            api_url: "https://tabs.example.com".to_string(),
            access_token: Some("secret".to_string()),
            theme_name: "rose-pine-dawn".to_string(),
        };
        let yaml = serde_yaml::to_string(&data).unwrap();
        let parsed: FileSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.api_url, "https://tabs.example.com");
        assert_eq!(parsed.access_token.as_deref(), Some("secret"));
    }
}
