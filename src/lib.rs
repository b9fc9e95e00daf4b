//! Library to create point-in-time backups of a database.
//!
//! A backup is produced by shelling out to the dump utility of the
//! database engine, for example `mariadb-dump`.
//! The engine specific backup strategies are located in the [`engines`]
//! module and are selected by [`engines::factory::resolve_strategy`].

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod engines;

pub use config::DbConfig;
pub use engines::{perform_backup, BackupOutcome};
