use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_file: PathBuf,
    pub prefs_file: PathBuf,
    pub sort_by: SortBy,
    pub color: bool,
    #[serde(default)]
    pub format: Option<String>,
    /// Number of upcoming events listed on the dashboard
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Semester,
    Name,
    Recency,
    Credits,
}

fn default_upcoming_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = Self::app_dir(dirs::data_dir());

        Self {
            general: GeneralConfig {
                data_file: data_dir.join("courses.json"),
                prefs_file: data_dir.join("preferences.json"),
                sort_by: SortBy::Semester,
                color: true,
                format: None,
                upcoming_limit: default_upcoming_limit(),
            },
        }
    }
}

impl Config {
    fn app_dir(base: Option<PathBuf>) -> PathBuf {
        base.unwrap_or_else(|| PathBuf::from(".")).join("studytrack")
    }

    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Parse(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.data_file.as_os_str().is_empty() {
            return Err(AppError::System("Data file cannot be empty".to_string()));
        }

        if self.general.prefs_file.as_os_str().is_empty() {
            return Err(AppError::System(
                "Preferences file cannot be empty".to_string(),
            ));
        }

        if self.general.data_file == self.general.prefs_file {
            return Err(AppError::System(
                "Data file and preferences file must differ".to_string(),
            ));
        }

        if let Some(format) = &self.general.format {
            if !["simple", "detailed", "table", "json"].contains(&format.as_str()) {
                return Err(AppError::System(format!(
                    "Unknown list format '{}', expected simple, detailed, table or json",
                    format
                )));
            }
        }

        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Parse(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        Self::app_dir(dirs::config_dir()).join("config.toml")
    }

    /// Config whose data files live in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        let mut config = Config::default();
        config.general.data_file = dir.join("courses.json");
        config.general.prefs_file = dir.join("preferences.json");
        config
    }
}
