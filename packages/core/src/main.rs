use clap::Parser;
use dotenvy::dotenv;

use honours_forecast::cli::{Cli, Command};
use honours_forecast::config::Config;
use honours_forecast::error::AppError;
use honours_forecast::logging::init_logging;
use honours_forecast::server;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command() {
        Command::Serve(args) => {
            let config = Config::from_env()
                .map_err(AppError::Config)?
                .with_overrides(args.host, args.port, args.database_url);
            tracing::info!("Service starting with config: {:?}", config);
            server::serve(config).await
        }
        Command::Classify(args) => {
            println!("{}", args.run()?);
            Ok(())
        }
    }
}
