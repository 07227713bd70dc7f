//! MockDraft CLI entry point.

use clap::Parser;
use log::{LevelFilter, error};
use mockdraft_cli::Args;
use std::process;
use std::str::FromStr;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match mockdraft_cli::run(&args) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}
