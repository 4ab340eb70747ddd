//! @acp:module "Init Command"
//! @acp:summary "Initialize an evidence-map project config"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `evmap init` for project initialization.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::config::{Config, CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Force overwrite existing config
    pub force: bool,
    /// Snapshot file path
    pub store: Option<PathBuf>,
    /// Synthesis cache file path
    pub synthesis_cache: Option<PathBuf>,
    /// Skip interactive prompts
    pub yes: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE);

    if config_path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        std::process::exit(1);
    }

    let mut config = Config::default();

    let interactive =
        !options.yes && options.store.is_none() && options.synthesis_cache.is_none();

    if interactive {
        run_interactive_init(&mut config)?;
    } else {
        if let Some(store) = options.store {
            config.store = store;
        }
        if let Some(cache) = options.synthesis_cache {
            config.synthesis_cache = cache;
        }
    }

    config.save(&config_path)?;
    println!("{} Created {}", style("✓").green(), config_path.display());

    if !config.store.exists() {
        println!(
            "{} Snapshot {} does not exist yet; export one from your graph store first.",
            style("⚠").yellow(),
            config.store.display()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Run {} to sanity-check your snapshot",
        style("evmap validate").cyan()
    );
    println!(
        "  2. Run {} to build the problem burden map",
        style("evmap burden").cyan()
    );

    Ok(())
}

fn run_interactive_init(config: &mut Config) -> Result<()> {
    println!("{} Evidence Map Setup\n", style("→").cyan());

    let store: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Snapshot file path")
        .default(config.store.display().to_string())
        .interact_text()?;
    config.store = PathBuf::from(store.trim());

    let cache: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Synthesis cache path")
        .default(config.synthesis_cache.display().to_string())
        .interact_text()?;
    config.synthesis_cache = PathBuf::from(cache.trim());

    let tune = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Adjust priority thresholds? (defaults: 65 maturity, 70 rigor)")
        .default(false)
        .interact()?;

    if tune {
        config.scoring.maturity_threshold = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Maturity threshold")
            .default(config.scoring.maturity_threshold)
            .interact_text()?;
        config.scoring.rigor_threshold = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Rigor quality threshold")
            .default(config.scoring.rigor_threshold)
            .interact_text()?;
    }

    Ok(())
}
