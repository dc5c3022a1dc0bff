// src/main.rs

use questgate::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("questgate error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(summary) => {
            // The aggregate pass/fail is the one contract automation may
            // rely on.
            std::process::exit(if summary.success { 0 } else { 1 });
        }
        Err(err) => {
            eprintln!("questgate error: {err:?}");
            std::process::exit(1);
        }
    }
}
