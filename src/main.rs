// src/main.rs

use fleetrun::errors::FleetrunError;
use fleetrun::{cli, logging};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("fleetrun error: {err:?}");
        std::process::exit(1);
    }

    match fleetrun::run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("fleetrun error: {err}");
            let code = match err {
                FleetrunError::GroupNotFound(_) => 2,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}
