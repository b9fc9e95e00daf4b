//! Selection of the backup strategy matching a database engine.

use std::path::Path;
use std::str::FromStr;

use derive_more::{Display, Error, From};

use super::{BackupStrategy, MySqlBackup};

/// Database engines known to the factory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum Engine {
    #[display("mysql")]
    MySql,
    #[display("postgresql")]
    Postgres,
    #[display("mongodb")]
    Mongo,
}

/// Database engine identifier is unknown.
#[derive(Debug, Display, Error)]
#[display("Unknown database engine: {_0}")]
pub struct UnknownEngine(#[error(ignore)] String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(Self::MySql),
            "postgresql" => Ok(Self::Postgres),
            "mongodb" => Ok(Self::Mongo),
            other => Err(UnknownEngine(other.to_string())),
        }
    }
}

#[derive(Debug, Display, Error, From)]
/// Errors on resolving an engine identifier to a backup strategy.
pub enum ResolveError {
    /// Engine identifier is not recognized at all.
    #[from]
    Unknown(UnknownEngine),

    /// Engine is recognized but no backup strategy exists yet.
    #[display("Backup of {_0} databases is not implemented yet")]
    NotImplemented(#[error(ignore)] Engine),
}

/// Resolves `engine_id` to the backup strategy of that engine.
///
/// Pure selection, no I/O happens until
/// [`backup`](BackupStrategy::backup) is called on the returned
/// strategy. Matching is case-sensitive.
pub fn resolve_strategy(
    engine_id: &str,
    backup_root: &Path,
) -> Result<Box<dyn BackupStrategy>, ResolveError> {
    match engine_id.parse::<Engine>()? {
        Engine::MySql => Ok(Box::new(MySqlBackup::new(backup_root))),
        unimplemented => Err(ResolveError::NotImplemented(unimplemented)),
    }
}
