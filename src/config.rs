//! Configuration of the database targeted by a backup.

use std::path::Path;
use std::{fs, io};

use derive_more::{Display, Error, From};

const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Connection descriptor of the database to back up.
///
/// The descriptor is passed to the backup strategy as-is. Fields are not
/// validated up-front, the dump utility is the authority on whether a
/// combination of host, port and credentials is usable.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DbConfig {
    /// Hostname of the database server.
    pub host: String,

    /// Port of the database server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// User to connect with.
    pub user: String,

    /// Password of the user.
    ///
    /// Only ever handed to the dump utility via its environment,
    /// never on the command line.
    pub password: String,

    /// Name of the database to dump.
    ///
    /// May contain multiple comma-separated names of which only the
    /// *first* is backed up. See [`MySqlBackup`](crate::engines::mysql::MySqlBackup).
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_MYSQL_PORT
}

/// A backup job as described by the TOML config file.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct BackupConfig {
    /// Identifier of the database engine, e.g. `mysql`.
    pub engine: String,

    /// Connection descriptor of the database.
    pub database: DbConfig,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            engine: "mysql".to_string(),
            database: DbConfig::default(),
        }
    }
}

#[derive(Debug, Display, Error, From)]
/// Errors on loading a [BackupConfig] from disk.
pub enum ConfigError {
    /// Config file could not be read.
    #[display("reading the config file failed: {_0}")]
    Io(io::Error),

    /// Config file is no valid TOML description of a backup job.
    #[display("parsing the config file failed: {_0}")]
    Parse(toml::de::Error),
}

impl BackupConfig {
    /// Loads the backup job description from the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_files_are_parsed() {
        let raw = r#"
            engine = "mysql"

            [database]
            host = "db.internal"
            port = 3307
            user = "backup"
            password = "secret"
            database = "appdb,logsdb"
        "#;

        let config: BackupConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.engine, "mysql");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.database, "appdb,logsdb");
    }

    #[test]
    fn port_defaults_to_mysql() {
        let raw = r#"
            engine = "mysql"

            [database]
            host = "localhost"
            user = "root"
            password = ""
            database = "appdb"
        "#;

        let config: BackupConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.toml");

        let err = BackupConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn template_config_is_serializable() {
        let template = toml::to_string_pretty(&BackupConfig::default()).unwrap();
        let reparsed: BackupConfig = toml::from_str(&template).unwrap();
        assert_eq!(reparsed.engine, "mysql");
    }
}
