pub mod completion;
pub mod descriptor;
pub mod device;

use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use completion::generate_completion;
use descriptor::{handle_descriptor, DescriptorSource};
use device::{handle_devices, handle_rumble};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file to use
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the gamepad daemon (default)
    Run {
        /// Hidraw path of the gamepad to manage (e.g. "/dev/hidraw3")
        #[arg(long)]
        path: Option<String>,
    },
    /// List supported gamepads that are currently attached
    Devices {
        /// Print as JSON
        #[arg(long, action)]
        json: bool,
    },
    /// Show a report descriptor and the reports it declares
    Descriptor {
        /// Show the built-in fixed descriptor (default)
        #[arg(long, action, conflicts_with = "file")]
        fixed: bool,
        /// Apply the descriptor fixup to a dumped report descriptor
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print as JSON
        #[arg(long, action)]
        json: bool,
    },
    /// Set the rumble motors of a gamepad. Rumble continues until a zero
    /// magnitude is sent.
    Rumble {
        /// Weak (right) motor magnitude, 0-65535
        #[arg(long, value_parser = parse_magnitude, default_value = "0")]
        weak: u16,
        /// Strong (left) motor magnitude, 0-65535
        #[arg(long, value_parser = parse_magnitude, default_value = "0")]
        strong: u16,
        /// Hidraw path of the gamepad
        #[arg(long)]
        path: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Parse a motor magnitude in decimal or "0x" prefixed hexadecimal
fn parse_magnitude(value: &str) -> Result<u16, String> {
    let result = match value.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };
    result.map_err(|e| format!("invalid magnitude '{value}': {e}"))
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(cmd) = args.cmd else {
        return Ok(());
    };

    match cmd {
        Commands::Run { .. } => (),
        Commands::Devices { json } => handle_devices(json)?,
        Commands::Descriptor { fixed: _, file, json } => {
            let source = match file {
                Some(path) => DescriptorSource::File(path),
                None => DescriptorSource::Fixed,
            };
            handle_descriptor(source, json)?
        }
        Commands::Rumble { weak, strong, path } => {
            handle_rumble(weak, strong, path.as_deref())?
        }
        Commands::Completions { shell } => generate_completion(shell),
    }

    Ok(())
}
