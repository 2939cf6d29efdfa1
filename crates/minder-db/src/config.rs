use std::env;
use std::path::PathBuf;

/// Database configuration.
///
/// Reads from the `MINDER_DATABASE_URL` environment variable, falling back
/// to a SQLite file under the platform data directory
/// (`~/.local/share/minder/minder.db` on Linux) when unset.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full SQLite connection URL, e.g. `sqlite:///home/me/.local/share/minder/minder.db`.
    pub database_url: String,
}

impl DbConfig {
    /// Build a config from the environment.
    ///
    /// Priority: `MINDER_DATABASE_URL` env var, then the platform default.
    pub fn from_env() -> Self {
        let database_url =
            env::var("MINDER_DATABASE_URL").unwrap_or_else(|_| Self::default_url());
        Self { database_url }
    }

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// The default connection URL: a `minder.db` file in the platform data
    /// directory, falling back to the current directory when no data
    /// directory can be determined.
    pub fn default_url() -> String {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minder");
        format!("sqlite://{}", dir.join("minder.db").display())
    }

    /// Extract the filesystem path from the URL.
    ///
    /// Returns `None` for non-file URLs such as `sqlite::memory:`.
    pub fn database_path(&self) -> Option<PathBuf> {
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        if rest.is_empty() || rest.starts_with(':') {
            return None;
        }
        Some(PathBuf::from(rest))
    }

    /// Whether this config points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_new() {
        let cfg = DbConfig::new("sqlite:///tmp/minder-test/minder.db");
        assert_eq!(cfg.database_url, "sqlite:///tmp/minder-test/minder.db");
    }

    #[test]
    fn database_path_extraction() {
        let cfg = DbConfig::new("sqlite:///tmp/minder-test/minder.db");
        assert_eq!(
            cfg.database_path(),
            Some(PathBuf::from("/tmp/minder-test/minder.db"))
        );
    }

    #[test]
    fn memory_url_has_no_path() {
        let cfg = DbConfig::new("sqlite::memory:");
        assert!(cfg.database_path().is_none());
        assert!(cfg.is_in_memory());
    }

    #[test]
    fn default_url_names_the_db_file() {
        let url = DbConfig::default_url();
        assert!(url.starts_with("sqlite://"), "unexpected url: {url}");
        assert!(url.ends_with("minder.db"), "unexpected url: {url}");
    }
}
