mod args;
mod stats;

use clap::Parser;
use log::{debug, LevelFilter};

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
    debug!("args: {:?}", args);

    if let Err(e) = stats::run_report(&args) {
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
