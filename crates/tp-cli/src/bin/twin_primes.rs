//! `twin-primes` binary.
//!
//! Exit status is 0 on success, 1 on an invalid request or a failed run,
//! and 2 when clap rejects the arguments.

use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tp_cli::{logging, render_stats, run, Args, CliError};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_level) {
        eprintln!("{}", e);
    }

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };

    info!("sorted lists, printing");
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write!(stdout, "{}", report).and_then(|()| stdout.flush()) {
        return fail(&CliError::Output(e));
    }

    if args.stats {
        match render_stats(&report) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => return fail(&e),
        }
    }

    info!("done");
    ExitCode::SUCCESS
}

fn fail(e: &CliError) -> ExitCode {
    error!(error = %e, "twin prime search failed");
    eprintln!("Error: {}", e);
    if e.is_usage() {
        eprintln!("{}", Args::command().render_usage());
    }
    ExitCode::FAILURE
}
