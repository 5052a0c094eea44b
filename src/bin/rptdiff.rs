use clap::Parser;

use rptdiff::cli::Cli;
use rptdiff::config::Config;
use rptdiff::{logging, orchestrator};

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            // Logging isn't initialized yet if the config itself failed to
            // load or validate; it may carry the log_level we'd otherwise use.
            logging::init(cli.verbose, None);
            tracing::error!(error = %err, path = %cli.config.display(), "failed to load configuration");
            std::process::exit(1);
        }
    };

    logging::init(cli.verbose, config.log_level.as_deref());

    if let Err(err) = orchestrator::run(&config) {
        tracing::error!(error = %err, "rptdiff run failed");
        std::process::exit(1);
    }
}
