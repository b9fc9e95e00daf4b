use clap::Parser;

use db_backup_lib::cli::Cli;
use db_backup_lib::config::BackupConfig;
use db_backup_lib::engines::{perform_backup, BackupOutcome};

fn main() {
    let cli = Cli::parse();

    // init logger
    let mut env_logger = env_logger::builder();
    if let Some(level) = cli.verbose {
        env_logger.filter_level(level);
    }
    env_logger.try_init().expect("env_logger should not fail");

    let config = match BackupConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            if std::fs::exists(&cli.config).is_ok_and(|exists| !exists) {
                log::debug!(
                    "Writing a template config to {} because it doesn't exist yet",
                    cli.config.display()
                );
                let template = toml::to_string_pretty(&BackupConfig::default())
                    .expect("template config should be serializable");
                if let Err(e) = std::fs::write(&cli.config, template) {
                    log::warn!(
                        "Writing a template config to {} failed: {e}",
                        cli.config.display()
                    );
                }
                log::error!(
                    "No config found, fill in the template at {} and run again",
                    cli.config.display()
                );
            } else {
                log::error!("{e}");
            }
            std::process::exit(2);
        }
    };

    match perform_backup(&config.engine, &config.database, &cli.backup_root) {
        Ok(BackupOutcome::Success { file, message }) => {
            log::info!("{message} ({})", file.display());
        }
        Ok(BackupOutcome::Failure { message }) => {
            log::error!("{message}");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    }
}
