//! Config command - inspect and edit the billing configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use gstbill_core::BillingConfig;

use super::{config_or_default, default_config_path};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// List every setting with its current value
    Show {
        /// Print the whole file as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default values
    Init {
        /// Where to write it (default: the user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one setting (e.g. "tax.unknown_buyer_state")
    Get { key: String },

    /// Change one setting and save the file
    Set { key: String, value: String },

    /// Print where the configuration file lives
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let target = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show { json } => {
            let config = config_or_default(&target)?;
            if !target.exists() {
                eprintln!("{} No config file at {}, showing defaults", style("ℹ").blue(), target.display());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for key in BillingConfig::KEYS {
                    let value = config.get_value(key).unwrap_or_default();
                    println!("{} = {}", style(key).cyan(), value);
                }
            }
        }
        ConfigCommand::Init { output, force } => {
            write_defaults(&output.unwrap_or(target), force)?;
        }
        ConfigCommand::Get { key } => {
            let config = config_or_default(&target)?;
            let value = config.get_value(&key).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown configuration key: {} (expected one of: {})",
                    key,
                    BillingConfig::KEYS.join(", ")
                )
            })?;
            println!("{}", value);
        }
        ConfigCommand::Set { key, value } => {
            let mut config = config_or_default(&target)?;
            config.set_value(&key, &value)?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&target)?;
            println!("{} {} = {}", style("✓").green(), key, config.get_value(&key).unwrap_or_default());
        }
        ConfigCommand::Path => {
            let state = if target.exists() {
                style("exists").green()
            } else {
                style("not created, run 'gstbill config init'").yellow()
            };
            println!("{} ({})", target.display(), state);
        }
    }

    Ok(())
}

fn write_defaults(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    BillingConfig::default().save(path)?;

    println!("{} Created configuration file at {}", style("✓").green(), path.display());
    Ok(())
}
