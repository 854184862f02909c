//! Theme preference handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use rsvp_core::{Config, Theme, ThemeStore};

use crate::output::{Output, OutputFormat};

fn store(config_path: Option<&PathBuf>) -> Result<ThemeStore> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    Ok(ThemeStore::load(config.theme_path()))
}

fn print(theme: Theme, output: &Output) {
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "theme": theme })),
        OutputFormat::Human | OutputFormat::Quiet => println!("{}", theme),
    }
}

pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    print(store(config_path)?.current(), output);
    Ok(())
}

pub fn toggle(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let theme = store(config_path)?.toggle()?;
    print(theme, output);
    Ok(())
}

pub fn set(theme: Theme, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    store(config_path)?.set(theme)?;
    output.success(&format!("Theme set to {}", theme));
    Ok(())
}
