pub mod config;
pub mod scan;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use std::sync::atomic::AtomicBool;

pub fn dispatch(cli: &Cli, interrupted: &AtomicBool) -> Result<()> {
    match &cli.command {
        Commands::Scan(args) => scan::run(args, cli.quiet, interrupted),
        Commands::Config(args) => config::run(args),
    }
}
