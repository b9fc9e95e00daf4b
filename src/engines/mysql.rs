//! Implements backup of MySQL/MariaDB databases using `mariadb-dump`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::DbConfig;
use crate::engines::{ensure_backup_dir, timestamp, BackupError, BackupStrategy, Engine};

const DUMP_UTILITY: &str = "mariadb-dump";

/// Backup strategy shelling out to the MariaDB dump utility.
///
/// The dump is taken with `--single-transaction`, so a consistent
/// point-in-time snapshot is produced without locking out concurrent
/// writers of the database.
#[derive(Debug)]
pub struct MySqlBackup {
    backup_root: PathBuf,
    dump_bin: PathBuf,
}

impl MySqlBackup {
    /// Creates a strategy writing its dumps below `backup_root`.
    pub fn new(backup_root: &Path) -> Self {
        Self::with_dump_binary(backup_root, Path::new(DUMP_UTILITY))
    }

    /// Like [new](Self::new) but uses the dump utility at `dump_bin`
    /// instead of resolving `mariadb-dump` from the `PATH`.
    pub fn with_dump_binary(backup_root: &Path, dump_bin: &Path) -> Self {
        Self {
            backup_root: backup_root.to_path_buf(),
            dump_bin: dump_bin.to_path_buf(),
        }
    }

    fn dump_command(&self, config: &DbConfig, result_file: &Path) -> Command {
        let mut cmd = Command::new(&self.dump_bin);
        cmd.arg(format!("--host={}", config.host))
            .arg(format!("--port={}", config.port))
            .arg(format!("--user={}", config.user))
            .arg("--single-transaction")
            .arg(format!("--result-file={}", result_file.display()))
            .arg(single_target(&config.database))
            // Never on the command line, it would leak into process listings.
            .env("MYSQL_PWD", &config.password);

        cmd
    }
}

impl BackupStrategy for MySqlBackup {
    fn engine(&self) -> Engine {
        Engine::MySql
    }

    fn backup(&self, config: &DbConfig) -> Result<PathBuf, BackupError> {
        let backup_dir = ensure_backup_dir(&self.backup_root).map_err(BackupError::Filesystem)?;

        let target_db = single_target(&config.database);
        if target_db != config.database {
            log::warn!(target: "engine::mysql", "Only the first database of '{}' is backed up", config.database);
        }

        let dump_file = backup_dir.join(format!("backup_mysql_{target_db}_{}.sql", timestamp()));
        log::debug!(target: "engine::mysql", "Save database dump at: {}", dump_file.display());

        let output = self
            .dump_command(config, &dump_file)
            .output()
            .map_err(BackupError::Launch)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            log::error!(target: "engine::mysql", "{DUMP_UTILITY} exited with {}: {stderr}", output.status);
            return Err(BackupError::Dump { stderr });
        }

        log::info!(target: "engine::mysql", "Finished dump of database '{target_db}'");

        Ok(dump_file)
    }
}

/// The single database a dump targets.
///
/// A comma separated list of names is reduced to its first entry, only
/// one database is ever backed up per call. Callers wanting more have
/// to invoke the strategy once per database.
fn single_target(database: &str) -> &str {
    match database.split_once(',') {
        Some((first, _)) => first.trim(),
        None => database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config() -> DbConfig {
        DbConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "hunter2".to_string(),
            database: "appdb".to_string(),
        }
    }

    #[cfg(unix)]
    fn fake_dump_bin(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("mariadb-dump");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        path
    }

    #[test]
    fn comma_separated_names_target_the_first_database() {
        assert_eq!(single_target("appdb,logsdb"), "appdb");
        assert_eq!(single_target(" appdb , logsdb"), "appdb");
    }

    #[test]
    fn plain_names_are_used_unchanged() {
        assert_eq!(single_target("appdb"), "appdb");
    }

    #[test]
    fn password_is_only_passed_via_the_environment() {
        let strategy = MySqlBackup::new(Path::new("backups"));
        let cmd = strategy.dump_command(&config(), Path::new("backups/dump.sql"));

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.iter().all(|a| !a.contains("hunter2")), "{args:?}");

        let password_env = cmd
            .get_envs()
            .find(|(key, _)| *key == "MYSQL_PWD")
            .and_then(|(_, value)| value);
        assert_eq!(password_env.unwrap(), "hunter2");
    }

    #[test]
    fn dump_command_requests_a_consistent_snapshot() {
        let strategy = MySqlBackup::new(Path::new("backups"));
        let cmd = strategy.dump_command(&config(), Path::new("backups/dump.sql"));

        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"--host=localhost".to_string()));
        assert!(args.contains(&"--port=3306".to_string()));
        assert!(args.contains(&"--user=root".to_string()));
        assert!(args.contains(&"--single-transaction".to_string()));
        assert!(args.contains(&"--result-file=backups/dump.sql".to_string()));
        // the database name is positional and comes last
        assert_eq!(args.last().unwrap(), "appdb");
    }

    #[cfg(unix)]
    #[test]
    fn successful_dump_reports_the_dump_file() {
        let root = tempdir().unwrap();
        let fake = fake_dump_bin(root.path(), "exit 0");
        let strategy = MySqlBackup::with_dump_binary(&root.path().join("backups"), &fake);

        let dump_file = strategy.backup(&config()).unwrap();

        let name = dump_file.file_name().unwrap().to_string_lossy();
        let stamp = name
            .strip_prefix("backup_mysql_appdb_")
            .and_then(|rest| rest.strip_suffix(".sql"))
            .unwrap();
        let (date, time) = stamp.split_once('_').unwrap();
        assert!(date.len() == 8 && date.chars().all(|c| c.is_ascii_digit()));
        assert!(time.len() == 6 && time.chars().all(|c| c.is_ascii_digit()));

        assert_eq!(dump_file.parent().unwrap().file_name().unwrap(), "backups");
        assert!(dump_file.parent().unwrap().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn failed_dump_surfaces_the_utility_stderr() {
        let root = tempdir().unwrap();
        let fake = fake_dump_bin(root.path(), "echo 'Access denied' >&2; exit 1");
        let strategy = MySqlBackup::with_dump_binary(&root.path().join("backups"), &fake);

        let err = strategy.backup(&config()).unwrap_err();
        assert!(matches!(err, BackupError::Dump { .. }));
        assert!(err.to_string().contains("Access denied"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn missing_dump_binary_fails_to_launch() {
        let root = tempdir().unwrap();
        let missing = root.path().join("no-such-dump-utility");
        let strategy = MySqlBackup::with_dump_binary(&root.path().join("backups"), &missing);

        let err = strategy.backup(&config()).unwrap_err();
        assert!(matches!(err, BackupError::Launch(_)));
    }
}
