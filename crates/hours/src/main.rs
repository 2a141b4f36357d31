use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use hours::cli::{self, Cli};
use hours::domain::clock::SystemClock;

fn main() -> ExitCode {
    // The local offset can only be read while the process is single-threaded.
    let clock = Arc::new(SystemClock::from_local_offset());
    let cli = Cli::parse();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(cli::CliError::from)
        .and_then(|runtime| runtime.block_on(cli::run(cli, clock)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr().lock(), "Error: {error}");

            ExitCode::FAILURE
        }
    }
}
