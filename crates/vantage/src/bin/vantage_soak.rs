//! # VANTAGE Soak
//!
//! Runs the snapshot cache against a seeded scripted world with a producer
//! and an overlay consumer on separate threads.
//!
//! ```bash
//! # Defaults: 24 actors, 30 seconds at 64 ticks/s
//! vantage_soak
//!
//! # Custom run, with per-pass logging
//! RUST_LOG=vantage_snapshot=debug vantage_soak soak.toml
//! ```

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use vantage::{run, SoakConfig, SoakResult};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match soak() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "soak failed");
            ExitCode::FAILURE
        }
    }
}

fn soak() -> SoakResult<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => SoakConfig::load(path)?,
        None => SoakConfig::default(),
    };

    let report = run(&config)?;
    if report.double_releases > 0 {
        error!(count = report.double_releases, "textures released twice");
    }
    Ok(())
}
