use std::env;
use std::io;
use std::process;

use fiberloss::cli::{self, Action};

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let action = Action::parse(&args).unwrap_or_else(|err| {
        println!();
        cli::print_error(&err.to_string()); //print at the top, but might be lost or hard to read
        println!();
        cli::print_help();
        println!();
        cli::print_error(&err.to_string()); // print error again, for human factors
        process::exit(cli::exit_code(err.as_ref()));
    });

    match action {
        Action::Help => cli::print_help(),
        Action::Version => cli::print_version(),
        Action::Evaluate(config) => {
            let stdout = io::stdout();
            if let Err(err) = config.run(&mut stdout.lock()) {
                let code = cli::exit_code(err.as_ref());
                if code == 1 {
                    // JSON mode has already written the error object to stdout
                    if !config.json {
                        cli::print_rejected(&err.to_string());
                    }
                } else {
                    cli::print_error(&err.to_string());
                }
                process::exit(code);
            }
        }
    }
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // stdout carries the report, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(not(feature = "cli"))]
fn init_tracing() {}
