use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::classification::{forecast, Module};
use crate::error::AppError;
use crate::store::ModuleInput;

/// Honours classification forecaster CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "honours-forecast",
    version,
    about = "Forecast an honours degree classification from level 2 and level 3 modules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a JSON list of modules and print the forecast
    Classify(ClassifyArgs),
}

#[derive(Debug, Args, Default)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database URL used to persist modules
    #[arg(long)]
    pub database_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// JSON file holding an array of `{ "name", "level", "credits", "grade" }`
    #[arg(long, short)]
    pub file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// The requested command, `serve` when none was given.
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}

impl ClassifyArgs {
    /// Read the module file and render its forecast as JSON.
    pub fn run(&self) -> Result<String, AppError> {
        let raw = fs::read_to_string(&self.file)?;
        forecast_json(&raw, self.pretty)
    }
}

/// Validate a JSON module list and render the forecast as JSON.
pub fn forecast_json(raw: &str, pretty: bool) -> Result<String, AppError> {
    let inputs: Vec<ModuleInput> = serde_json::from_str(raw)?;
    let modules = inputs
        .iter()
        .map(ModuleInput::validate_module)
        .collect::<Result<Vec<Module>, _>>()?;

    let forecast = forecast(&modules);
    let rendered = if pretty {
        serde_json::to_string_pretty(&forecast)?
    } else {
        serde_json::to_string(&forecast)?
    };
    Ok(rendered)
}
