//! Config command - inspect and create the settings file.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docdeck_core::models::config::DocdeckConfig;

use super::ConfigSource;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the settings in effect as JSON
    Show,

    /// Write a default configuration file
    Init(InitArgs),

    /// Show which configuration file is in effect
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file (default: the `--config` path, else the user config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let source = ConfigSource::resolve(config_path);
    match args.command {
        ConfigCommand::Show => show_config(&source),
        ConfigCommand::Init(init_args) => init_config(init_args, &source),
        ConfigCommand::Path => show_path(&source),
    }
}

/// Per-user settings file, `<config dir>/docdeck/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docdeck")
        .join("config.json")
}

fn show_config(source: &ConfigSource) -> anyhow::Result<()> {
    if let ConfigSource::User(path) = source {
        if !path.exists() {
            eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
        }
    }
    let config = source.load()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs, source: &ConfigSource) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| source.path().to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    DocdeckConfig::default().save(&output_path)?;
    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );
    Ok(())
}

fn show_path(source: &ConfigSource) -> anyhow::Result<()> {
    let path = source.path();
    let origin = match source {
        ConfigSource::Explicit(_) => "--config",
        ConfigSource::User(_) => "user config",
    };
    println!("Configuration file: {} ({})", path.display(), origin);

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else if let ConfigSource::Explicit(_) = source {
        println!("Status: {}", style("missing").red());
    } else {
        println!("Status: {} (defaults in effect)", style("not created").yellow());
        println!();
        println!("Run 'docdeck config init' to create a configuration file.");
    }
    Ok(())
}
