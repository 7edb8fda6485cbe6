use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use tracing_subscriber::EnvFilter;
use weather_panel_core::{
    Config, HttpBackend, KeyPress, PanelError, Units, ViewBinding, ViewController,
    backend_from_config, weather_tips,
};

use crate::terminal::{Output, TerminalView};

type Controller = ViewController<HttpBackend, TerminalView>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-panel", version, about = "Weather panel for the terminal")]
pub struct Cli {
    /// Backend base URL. Overrides the config file and WEATHER_PANEL_BACKEND_URL.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend URL and default units.
    Configure,

    /// Show weather for a location.
    Show {
        /// City name, "City, Country" or ZIP code.
        location: String,

        /// "metric" or "imperial"; defaults to the configured units.
        #[arg(long)]
        units: Option<String>,

        /// Print the panel markup instead of text.
        #[arg(long)]
        html: bool,

        /// Print advisory tips after the panel.
        #[arg(long)]
        tips: bool,
    },

    /// Detect the current location, then show its weather.
    Detect {
        #[arg(long)]
        units: Option<String>,

        #[arg(long)]
        html: bool,

        #[arg(long)]
        tips: bool,
    },

    /// Prompt for locations until an empty line.
    Interactive {
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub fn init_logging(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let Cli { backend_url, command, .. } = self;
        let backend_url = backend_url.as_deref();

        match command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { location, units, html, tips } => {
                let output = output_for(html);
                let ctl = build_controller(backend_url, units.as_deref(), output, &location)?;

                ctl.on_location_input();
                let result = ctl.handle_key(KeyPress::enter_in_location()).await.map(|_| ());

                Ok(finish(&ctl, result, output, tips))
            }
            Command::Detect { units, html, tips } => {
                let output = output_for(html);
                let ctl = build_controller(backend_url, units.as_deref(), output, "")?;

                let result = ctl.detect_location().await;

                Ok(finish(&ctl, result, output, tips))
            }
            Command::Interactive { units } => {
                let ctl = build_controller(backend_url, units.as_deref(), Output::Text, "")?;
                interactive(&ctl).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn output_for(html: bool) -> Output {
    if html { Output::Html } else { Output::Text }
}

fn build_controller(
    backend_url: Option<&str>,
    units: Option<&str>,
    output: Output,
    location: &str,
) -> anyhow::Result<Controller> {
    let units = units.map(Units::try_from).transpose()?;

    let mut config = Config::load()?;
    config.apply_backend_override(backend_url);
    if let Some(units) = units {
        config.set_units(units);
    }

    let backend = backend_from_config(&config)?;
    tracing::debug!(backend = backend.base_url(), units = %config.units, "controller ready");

    let view = Arc::new(TerminalView::new(output, location));
    Ok(ViewController::new(backend, view, config.controller_settings()))
}

/// Errors are already on screen by the time we get here.
fn finish(
    ctl: &Controller,
    result: Result<(), PanelError>,
    output: Output,
    tips: bool,
) -> ExitCode {
    if let Err(err) = result {
        return exit_code_for(&err);
    }

    if tips {
        print_tips(ctl);
    }

    if output == Output::Text
        && let Some(at) = ctl.state().updated_at
    {
        println!("   Updated {}", at.with_timezone(&Local).format("%H:%M:%S"));
    }

    ExitCode::SUCCESS
}

/// Rejected input exits with 2, like a usage error; everything else with 1.
fn exit_code_for(err: &PanelError) -> ExitCode {
    if err.is_validation() { ExitCode::from(2) } else { ExitCode::FAILURE }
}

fn print_tips(ctl: &Controller) {
    let Some(snapshot) = ctl.state().snapshot else {
        println!("No weather loaded yet.");
        return;
    };

    let tips = weather_tips(&snapshot);
    if tips.is_empty() {
        println!("No advisories for {}.", snapshot.location);
    }
    for tip in tips {
        println!("   {tip}");
    }
}

async fn interactive(ctl: &Controller) -> anyhow::Result<()> {
    println!(
        "Type a location and press Enter. :metric / :imperial switch units, :detect finds you, \
         :tips shows advisories. Empty line or Esc quits."
    );

    loop {
        let line = match Text::new("Location:").prompt_skippable() {
            Ok(Some(line)) => line,
            Ok(None) | Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };

        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let outcome = match line {
            ":metric" => ctl.switch_units(Units::Metric).await,
            ":imperial" => ctl.switch_units(Units::Imperial).await,
            ":detect" => ctl.detect_location().await,
            ":tips" => {
                print_tips(ctl);
                Ok(())
            }
            _ => {
                ctl.view().set_location_value(line);
                ctl.on_location_input();
                ctl.handle_key(KeyPress::enter_in_location()).await.map(|_| ())
            }
        };

        if let Err(err) = outcome {
            tracing::debug!(%err, "command failed");
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let url = Text::new("Backend URL:")
        .with_default(config.backend_url())
        .prompt()
        .context("Failed to read backend URL")?;
    config.set_backend_url(url.trim());

    let current = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read default units")?;
    config.set_units(units);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
