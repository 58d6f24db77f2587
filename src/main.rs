//! awscli_bundle - relocatable AWS CLI bundle builder.
//!
//! Builds `<out>/bin/aws` and `<out>/share/awscli` from an AWS CLI source
//! release. Exit code 0 guarantees a complete bundle at the output path.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match awscli_bundle::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_argument_error() {
                eprintln!("\nRun with --help for usage.");
            } else if e.is_recoverable() {
                eprintln!("\nThis may be transient; re-running the build can succeed.");
            }
            1
        }
    };

    process::exit(exit_code);
}
