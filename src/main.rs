use clap::Parser;
use crop1080::cli::{self, Cli};
use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let stdout = std::io::stdout();
    let code = cli::run(&cli, &mut stdout.lock())?;

    std::process::exit(code);
}
