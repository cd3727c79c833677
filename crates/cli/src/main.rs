//! Educational computer model CLI.
//!
//! This binary is the single entry point for running machine programs. It
//! performs:
//! 1. **Configuration:** Built-in defaults (32 KiB / 512 KiB / 32 MiB cache
//!    hierarchy) or a JSON config file.
//! 2. **Loading:** Parses a text program and places it at address 0.
//! 3. **Run:** Steps the machine to halt and prints the statistics report.

use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use emusim_core::config::Config;
use emusim_core::devices::StdConsole;
use emusim_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "emusim",
    author,
    version,
    about = "Educational computer model with a multi-level cache hierarchy",
    long_about = "Run a text program on a small register machine whose every memory\naccess flows through a configurable multi-level LRU cache in front of\npaged, lazily allocated backing memory.\n\nExamples:\n  emusim run -f programs/sum.asm\n  emusim run -f programs/sum.asm --config machine.json --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a text program to halt and print run statistics.
    Run {
        /// Program file to execute.
        #[arg(short, long)]
        file: String,

        /// JSON machine configuration (defaults when omitted).
        #[arg(long)]
        config: Option<String>,

        /// Dump processor state after every instruction.
        #[arg(long)]
        trace: bool,

        /// Delay between instructions, in milliseconds.
        #[arg(long)]
        pace_millis: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            config,
            trace,
            pace_millis,
        } => cmd_run(&file, config.as_deref(), trace, pace_millis),
    }
}

/// Runs one program: builds the machine, loads the file, steps to halt.
///
/// On a fault the final processor state is dumped, the statistics report is
/// still printed, and the process exits with code 1.
fn cmd_run(file: &str, config_path: Option<&str>, trace: bool, pace_millis: Option<u64>) {
    let mut config = load_config(config_path);
    if trace {
        config.general.trace_instructions = true;
    }
    if pace_millis.is_some() {
        config.general.pace_millis = pace_millis;
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {e}");
        process::exit(1);
    }

    let mut sim = match Simulator::new(&config, Box::new(StdConsole::new())) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: invalid configuration: {e}");
            process::exit(1);
        }
    };

    let loaded = match sim.load_program_file(file.as_ref()) {
        Ok(count) => count,
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            process::exit(1);
        }
    };
    println!("[*] Loaded {loaded} instructions from {file}");

    match sim.run() {
        Ok(()) => {
            sim.print_report();
        }
        Err(fault) => {
            eprintln!("\n[!] FATAL FAULT: {fault}");
            sim.processor().dump_state();
            sim.print_report();
            process::exit(1);
        }
    }
}

/// Reads the JSON config at `path`, or the built-in defaults when `path`
/// is `None`.
fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {path}: {e}");
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing config {path}: {e}");
        process::exit(1);
    })
}
