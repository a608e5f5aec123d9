//! knotwork - CLI for Celtic knot generation
//!
//! Usage:
//!   knotwork generate [options]        Random knot to SVG/JSON/PNG
//!   knotwork trace <svg> [options]     Knot from a stroke graph in SVG
//!   knotwork benchmark [options]       Time generation and tracing

mod cli;

use std::env;

use cli::{cmd_benchmark, cmd_generate, cmd_trace};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("knotwork");

    let result = match args.get(1).map(String::as_str) {
        Some("generate") => cmd_generate(&args[2..]),
        Some("trace") => cmd_trace(&args[2..]),
        Some("benchmark") => cmd_benchmark(&args[2..]),
        Some("help" | "--help" | "-h") => {
            print_usage(program);
            return;
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage(program);
            std::process::exit(1);
        }
        None => {
            print_usage(program);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("knotwork - Celtic knot generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} generate [options]       Generate a random knot", program);
    eprintln!("  {} trace <svg> [options]    Trace a stroke graph drawn in SVG", program);
    eprintln!("  {} benchmark [options]      Benchmark generation and tracing", program);
    eprintln!("  {} help                     Show this message", program);
    eprintln!();
    eprintln!("Run `{} <command> --help` for command options.", program);
    eprintln!("Set RUST_LOG=debug for tracing details.");
}
