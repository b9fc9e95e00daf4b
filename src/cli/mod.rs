use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbosity of the command output.
    #[arg(long)]
    pub verbose: Option<LevelFilter>,

    /// TOML file describing the database to back up.
    #[arg(
        long,
        short = 'c',
        env = "DB_BACKUP_CONFIG",
        default_value = "db-backup.toml"
    )]
    pub config: PathBuf,

    /// Folder where dump files are written.
    #[arg(long, short = 'r', env = "DB_BACKUP_ROOT")]
    pub backup_root: PathBuf,
}
