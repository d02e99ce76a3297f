//! Command-line entry point for `sealctl`.
//!
//! Startup sequence:
//! 1. Parse arguments.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Build the keyring and run the requested command.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use common::EtmError;
use tracing::{error, info};
use zeroize::Zeroizing;

use cli::{Cli, Command};
use config::Config;

/// `EX_CONFIG` from sysexits.
const EXIT_CONFIG: u8 = 78;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: sealctl configuration invalid: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    // -----------------------------------------------------------------------
    // 3. Command
    // -----------------------------------------------------------------------
    match run(&cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "sealctl failed");
            eprintln!("ERROR: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    let keyring = cfg.keyring()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        keys = keyring.key_count(),
        "keyring loaded"
    );

    // Output is buffered and only written once the command has succeeded.
    let mut output = Zeroizing::new(Vec::new());
    let args = match &cli.command {
        Command::Seal(args) => {
            commands::seal(
                &keyring,
                args.reader()?,
                &mut *output,
                args.associated_data(),
                args.encoding,
            )?;
            args
        }
        Command::Open(args) => {
            commands::open(
                &keyring,
                args.reader()?,
                &mut *output,
                args.associated_data(),
                args.encoding,
            )?;
            args
        }
    };
    args.write_output(&output)
}

/// Cipher errors carry their own exit code; anything else is a plain failure.
fn exit_code(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<EtmError>()
        .map(EtmError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn exit_code_for_cipher_errors() {
        let e = anyhow::Error::from(EtmError::AuthenticationFailed);
        assert_eq!(exit_code(&e), 65);

        let e = Err::<(), _>(EtmError::InvalidKeyLength)
            .context("configured keys must decode to exactly 64 bytes")
            .unwrap_err();
        assert_eq!(exit_code(&e), 78);
    }

    #[test]
    fn exit_code_for_other_errors() {
        let e = anyhow::anyhow!("failed to open input");
        assert_eq!(exit_code(&e), 1);
    }
}
