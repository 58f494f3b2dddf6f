use clap::Parser;
use tracing_subscriber::EnvFilter;

use br_domain::config::LoggingConfig;

mod cli;

use cli::{Cli, Command, ConfigCommand};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let (config, config_path) = cli::load_config()?;
    init_tracing(&config.logging);

    match args.command {
        Command::Catalog => cli::catalog::run(&config),
        Command::Encode { attribute, values } => cli::codec::encode(&config, &attribute, &values),
        Command::Decode { message } => cli::codec::decode(&config, &message),
        Command::Demo { steps } => cli::demo::run(&config, steps),
        Command::Config(ConfigCommand::Validate) => {
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => cli::config::show(&config),
    }
}

/// Logs go to stderr so stdout carries nothing but protocol messages.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
