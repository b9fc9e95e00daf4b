//! Engine specific backup strategies.
//!
//! Currently the following engines are supported:
//!
//! - [MySqlBackup]: Dump of a MySQL/MariaDB database using `mariadb-dump`.
//!
//! PostgreSQL and MongoDB are recognized by the [factory] but have no
//! strategy yet.

pub mod factory;
pub mod mysql;

pub use factory::{resolve_strategy, Engine, ResolveError};
pub use mysql::MySqlBackup;

use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::Local;
use derive_more::{Display, Error};

use crate::config::DbConfig;

/// Generic backup strategy of one database engine.
pub trait BackupStrategy: std::fmt::Debug {
    /// Engine this strategy produces dumps for.
    fn engine(&self) -> Engine;

    /// Creates a point-in-time dump of the configured database.
    ///
    /// Blocks until the dump utility exits and returns the path of the
    /// written dump file. The call places no timeout on the utility.
    fn backup(&self, config: &DbConfig) -> Result<PathBuf, BackupError>;
}

#[derive(Debug, Display, Error)]
/// Errors while executing a backup strategy.
pub enum BackupError {
    /// Backup directory could not be created or resolved.
    #[display("unable to prepare the backup directory: {_0}")]
    Filesystem(io::Error),

    /// Dump utility could not be started at all.
    #[display("unable to launch the dump utility: {_0}")]
    Launch(io::Error),

    /// Dump utility ran but exited non-zero.
    #[display("Error creating backup: {stderr}")]
    Dump {
        #[error(ignore)]
        stderr: String,
    },
}

/// Uniform outcome of one backup request.
#[derive(Debug)]
pub enum BackupOutcome {
    /// The dump file was written.
    Success {
        /// Path of the dump file.
        file: PathBuf,
        /// Human readable confirmation.
        message: String,
    },

    /// The dump utility failed, no usable dump file exists.
    Failure {
        /// Human readable failure description.
        message: String,
    },
}

impl BackupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Path of the produced dump file, [None] on failure.
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::Success { file, .. } => Some(file),
            Self::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message,
        }
    }
}

/// Backs up the database described by `config` with the strategy of `engine_id`.
///
/// Unknown or unimplemented engines are hard errors since they indicate
/// a configuration mistake. A failed dump on the other hand is an
/// expected operational event and reported as [BackupOutcome::Failure].
pub fn perform_backup(
    engine_id: &str,
    config: &DbConfig,
    backup_root: &Path,
) -> Result<BackupOutcome, ResolveError> {
    let strategy = resolve_strategy(engine_id, backup_root)?;

    log::info!(target: "backup", "Create {} backup of database '{}'", strategy.engine(), config.database);
    Ok(run_strategy(strategy.as_ref(), config))
}

fn run_strategy(strategy: &dyn BackupStrategy, config: &DbConfig) -> BackupOutcome {
    match strategy.backup(config) {
        Ok(file) => BackupOutcome::Success {
            file,
            message: "Backup created successfully.".to_string(),
        },
        Err(e) => BackupOutcome::Failure {
            message: e.to_string(),
        },
    }
}

/// Creates the backup directory if it does not exist yet.
///
/// Idempotent, repeated calls return the same absolute path.
pub fn ensure_backup_dir(root: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(root)?;

    root.canonicalize()
}

/// Sortable, filesystem-safe timestamp used to name dump files.
///
/// Second resolution, two backups within the same second share it.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}
