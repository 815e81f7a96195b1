use app_token_cli::{initialize_logging, run, write_output, Cli};
use clap::Parser;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    // No subscriber yet, so report straight to stderr
    if let Err(e) = initialize_logging(&cli.log_level, cli.json_logs) {
        eprintln!("app-token: {}", e);
        std::process::exit(e.exit_code());
    }

    // Render fully before writing so a failure leaves stdout empty
    if let Err(e) = run(&cli).and_then(|output| write_output(&output)) {
        error!(exit_code = e.exit_code(), "{}", e);
        // The log filter may drop the event above, the diagnostic must not be
        eprintln!("app-token: {}", e);
        std::process::exit(e.exit_code());
    }
}
