//! Fetch command - download an artifact into the cache

use crate::artifact::{FetchOptions, FetchOutcome, Fetcher};
use crate::cli::args::{FetchArgs, OutputFormat};
use crate::config::Config;
use crate::error::{CairnError, CairnResult};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use url::Url;

/// Execute the fetch command
pub fn execute(args: FetchArgs, config: &Config) -> CairnResult<()> {
    let url = Url::parse(&args.url).map_err(|e| CairnError::UrlInvalid {
        url: args.url.clone(),
        reason: e.to_string(),
    })?;

    // Command-line overrides win over the configuration file
    let mut config = config.clone();
    if let Some(dir) = args.cache_dir {
        config.cache.base_path = dir;
    }
    if let Some(secs) = args.timeout {
        config.download.timeout_secs = secs;
    }

    let options = FetchOptions {
        include_platform: args.platform,
        force: args.force,
        force_redirection: args.force_redirection,
    };

    let spinner = fetch_spinner(args.format, &url);
    let result = Fetcher::new(&config).fetch(&url, &options);
    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }
    let outcome = result?;

    match args.format {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Plain => print_plain(&outcome),
    }

    Ok(())
}

/// Spinner on stderr while the fetch runs, in text mode only
fn fetch_spinner(format: OutputFormat, url: &Url) -> Option<ProgressBar> {
    if !matches!(format, OutputFormat::Text) {
        return None;
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    bar.set_message(format!("Fetching {}", url));
    bar.enable_steady_tick(Duration::from_millis(120));
    Some(bar)
}

fn print_text(outcome: &FetchOutcome) {
    println!(
        "{} {}",
        style("Application:").bold(),
        outcome.application.display()
    );
    if let Some(ref platform) = outcome.platform {
        println!("{} {}", style("Platform:").bold(), platform.display());
    }
}

fn print_json(outcome: &FetchOutcome) -> CairnResult<()> {
    let json = serde_json::json!({
        "application": outcome.application,
        "platform": outcome.platform,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_plain(outcome: &FetchOutcome) {
    println!("{}", outcome.application.display());
    if let Some(ref platform) = outcome.platform {
        println!("{}", platform.display());
    }
}
