//! Anole runtime CLI.

use std::path::Path;

use anolec::{disasm_file, init_tracing, parse_run_options, run_file, RunOptions};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (options, path) = parse_run_options(&args[2..], RunOptions::from_env());
            let Some(path) = path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: anole run <file> [options]");
                std::process::exit(2);
            };
            if let Err(err) = run_file(Path::new(&path), &options) {
                eprintln!("{err}");
                std::process::exit(err.exit_code());
            }
        }
        "disasm" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: anole disasm <file>");
                std::process::exit(2);
            };
            match disasm_file(Path::new(path)) {
                Ok(listing) => print!("{listing}"),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(err.exit_code());
                }
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("anole {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("Anole runtime");
    println!();
    println!("Usage: anole <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>           Execute a compiled code image");
    println!("  disasm <file>        Print the instructions of a code image");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --max-depth=<n>      Maximum call depth (0 = unlimited)");
    println!("  --gc-threshold=<n>   Allocations between collections, or 'off'");
    println!("  --strict-keys        Missing dictionary keys raise KeyError");
    println!("  --gc-stats           Print collector statistics after the run");
    println!();
    println!("Environment:");
    println!("  ANOLE_MAX_DEPTH, ANOLE_GC_THRESHOLD, ANOLE_STRICT_KEYS");
    println!("                       Defaults for the run options above");
    println!("  RUST_LOG             Enable tracing (e.g. anole_eval=debug)");
    println!("  ANOLE_LOG_TREE       Render tracing output as a call tree");
}
