//! Gaswatch - Main Entry Point

use cli::{init_logging, run, Args};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", Args::USAGE);
            std::process::exit(2);
        }
    };

    info!("=== Gaswatch v{} ===", env!("CARGO_PKG_VERSION"));
    run(args)
}
