//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::CairnResult;
use console::style;

/// Execute the config command
pub fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> CairnResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force)?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value)?,
    }

    Ok(())
}

fn show_config(config: &Config) -> CairnResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn init_config(manager: &ConfigManager, force: bool) -> CairnResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {}",
            style("!").yellow().bold(),
            path.display()
        );
        println!("  Use --force to overwrite");
        return Ok(());
    }

    manager.save(&Config::default())?;
    println!(
        "{} Configuration written to {}",
        style("✓").green().bold(),
        path.display()
    );

    Ok(())
}

fn set_value(manager: &ConfigManager, key: &str, value: &str) -> CairnResult<()> {
    manager.set_value(key, value)?;
    println!("{} Set {} = {}", style("✓").green().bold(), key, value);
    Ok(())
}
