//! Meteor Strike entry point
//!
//! Initializes logging, seeds the run, and maps any initialization failure
//! to its distinct nonzero exit status.

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Meteor Strike starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match meteor_strike::app::run(seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
