use clap::Parser;
use net_toolbox::cli::{run, Cli};
use net_toolbox::config::{init_logging, ToolboxConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = ToolboxConfig::from_env()?;
    init_logging(&config.log_config)?;
    //
    log::info!("#Start main()");

    let cli = Cli::parse();
    if let Err(e) = run(cli, &config) {
        log::error!("{e}");
        return Err(e);
    }

    log::info!("#End main()");
    Ok(())
}
