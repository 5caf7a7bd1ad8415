mod check;
mod generate;

use clap::{Parser, Subcommand};
use eyre::Result;

/// Generate API application code from a declarative design document.
#[derive(Parser)]
#[command(name = "trestle", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate application code from a design document
    Generate(generate::GenerateCommand),
    /// Validate a design document without generating code
    Check(check::CheckCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Generate(cmd) => cmd.run(),
            Command::Check(cmd) => cmd.run(),
        }
    }
}
