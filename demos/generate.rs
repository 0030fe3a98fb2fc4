//! # Generating Sequences from Requests
//!
//! Reads generation requests (one per line) from the command line or standard input and
//! prints each resulting sequence.
//!
//! ```text
//! cargo run --example generate -- "corners 2 4 1" "mask *10*1"
//! echo "unique 1 49 6" | cargo run --example generate -- --seed 7 --narrow
//! ```

// Allow example-specific patterns
#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::io::BufRead;

use clap::Parser;
use intvec::rng::{Pcg32, SeedableRng};
use intvec::{narrow_sequence, GenError, GenerationRequest};

#[derive(Parser, Debug)]
struct Opt {
    /// Requests such as "range 0 10 2"; read from stdin when none are given
    requests: Vec<String>,
    /// Seed for the random generators (entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,
    /// Narrow every value to i32
    #[arg(short, long)]
    narrow: bool,
    /// Log generator decisions at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn run(request: &GenerationRequest, rng: &mut Pcg32, narrow: bool) -> Result<String, GenError> {
    let values = request.generate(rng)?;
    let rendered: Vec<String> = if narrow {
        narrow_sequence(&values)?
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        values.iter().map(ToString::to_string).collect()
    };
    Ok(rendered.join(" "))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    if opt.verbose {
        tracing::subscriber::set_global_default(
            tracing_subscriber::FmtSubscriber::builder()
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(std::io::stderr)
                .finish(),
        )
        .expect("setting up tracing subscriber failed");
    }

    let mut rng = match opt.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    };

    let lines: Vec<String> = if opt.requests.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        opt.requests
    };

    let mut failures = 0;
    for line in lines.iter().filter(|line| !line.trim().is_empty()) {
        match line.parse::<GenerationRequest>() {
            Ok(request) => match run(&request, &mut rng, opt.narrow) {
                Ok(rendered) => println!("{request}: {rendered}"),
                Err(err) => {
                    failures += 1;
                    eprintln!("{request}: {err}");
                }
            },
            Err(err) => {
                failures += 1;
                eprintln!("{line:?}: {err}");
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} request(s) failed").into());
    }
    Ok(())
}
