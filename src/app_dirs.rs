use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "mousewise";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Persistent record of completed levels.
    pub fn registry_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join("progress.json"))
            .unwrap_or_else(|| PathBuf::from("mousewise_progress.json"))
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("mousewise_config.json"))
    }

    /// The terminal belongs to the UI, so logs go to $HOME/.local/state/mousewise.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("mousewise.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("mousewise.log"))
                .unwrap_or_else(|| PathBuf::from("mousewise.log"))
        }
    }
}
