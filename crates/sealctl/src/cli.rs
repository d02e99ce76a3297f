//! Command-line arguments.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Seal and open secrets with AES-256-CBC + HMAC-SHA-512.
///
/// The key is taken from `SEALCTL_KEY` (base64, 64 bytes). Records sealed
/// under older keys can still be opened by listing those keys in
/// `SEALCTL_PREVIOUS_KEYS`.
#[derive(Debug, Parser)]
#[command(name = "sealctl", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt and authenticate a payload.
    Seal(IoArgs),
    /// Verify and decrypt a sealed payload.
    Open(IoArgs),
}

/// How sealed records are framed on input/output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// Standard base64 followed by a newline.
    Base64,
    /// The record bytes unchanged.
    Raw,
}

#[derive(Debug, Args)]
pub struct IoArgs {
    /// Read from this file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Context bound into the tag; the same value is required to open.
    #[arg(short = 'a', long)]
    pub associated_data: Option<String>,

    /// Framing of the sealed record.
    #[arg(short, long, value_enum, default_value_t = Encoding::Base64)]
    pub encoding: Encoding,
}

impl IoArgs {
    pub fn reader(&self) -> Result<Box<dyn Read>> {
        match &self.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open input {}", path.display()))?;
                Ok(Box::new(file))
            }
            None => Ok(Box::new(io::stdin().lock())),
        }
    }

    /// Write the finished result to the output file or stdout.
    ///
    /// The output file is only created here, once the command has succeeded,
    /// so a failed command leaves an existing file untouched.
    pub fn write_output(&self, bytes: &[u8]) -> Result<()> {
        match &self.output {
            Some(path) => fs::write(path, bytes)
                .with_context(|| format!("failed to write output {}", path.display())),
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(bytes).context("failed to write output")?;
                stdout.flush().context("failed to flush output")
            }
        }
    }

    pub fn associated_data(&self) -> &[u8] {
        self.associated_data
            .as_deref()
            .map(str::as_bytes)
            .unwrap_or_default()
    }
}
