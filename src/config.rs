use std::env;
use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::ConfigError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".yanti-siggs";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "yanti_siggs.sqlite";
/// Media root folder name, a sibling of the database file.
const MEDIA_DIR_NAME: &str = "media";

/// Site configuration loaded from environment variables.
///
/// Defaults put everything under `~/.yanti-siggs`, so a fresh checkout runs
/// without any setup.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Directory holding `music_uploads/`, `gallery_uploads/` and `header_photos/`.
    pub media_root: PathBuf,
    /// Password hashed into the seeded `admin` account on first start.
    pub initial_admin_password: Option<String>,
}

impl SiteConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `YANTI_DB_PATH`        | `~/.yanti-siggs/yanti_siggs.sqlite`    |
    /// | `YANTI_MEDIA_ROOT`     | `~/.yanti-siggs/media`                 |
    /// | `YANTI_ADMIN_PASSWORD` | unset (admin login stays disabled)     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = match non_empty_var("YANTI_DB_PATH")? {
            Some(path) => PathBuf::from(path),
            None => data_dir()?.join(DB_FILE_NAME),
        };

        let media_root = match non_empty_var("YANTI_MEDIA_ROOT")? {
            Some(path) => PathBuf::from(path),
            None => data_dir()?.join(MEDIA_DIR_NAME),
        };

        let initial_admin_password = env::var("YANTI_ADMIN_PASSWORD")
            .ok()
            .filter(|value| !value.is_empty());

        Ok(Self {
            db_path,
            media_root,
            initial_admin_password,
        })
    }
}

/// Read an optional variable, rejecting one that is set but blank since that
/// is almost always a typo in an `.env` file.
fn non_empty_var(var: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
