use oam_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        eprintln!("oam: {:#}; falling back to plain stdout logging", err);
        logging::init_logging_plain();
    }

    if let Err(err) = Cli::run_from_args().await {
        eprintln!("oam error: {:#}", err);
        std::process::exit(1);
    }
}
