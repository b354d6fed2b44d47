use std::env;
use std::error::Error;

use clap::Parser;

use shanwan::cli::{main_cli, Args, Commands};
use shanwan::config::Config;
use shanwan::manager::Manager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    // Run the CLI command if one was given
    let device_path = match &args.cmd {
        None => None,
        Some(Commands::Run { path }) => path.clone(),
        Some(_) => return main_cli(args).await,
    };

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting shanwan v{}", VERSION);

    let mut config = Config::load(args.config.as_deref())?;
    if device_path.is_some() {
        config.device_path = device_path;
    }

    let mut manager = Manager::new(config);
    if let Err(e) = manager.run().await {
        log::error!("Error running the gamepad manager: {e}");
        return Err(e);
    }

    log::info!("shanwan stopped");

    Ok(())
}
