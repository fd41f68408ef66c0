use clap::Parser;

use film_absorption::cli::{run, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = cli.into_config().and_then(|cfg| run(&cfg));

    if let Err(e) = result {
        log::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
