use brrtrecognizer::{cli, logging};

fn main() -> anyhow::Result<()> {
    logging::init_logging_with_config(&logging::LogConfig::from_env())?;

    let outcome = cli::run_cli()?;
    std::process::exit(outcome.exit_code());
}
