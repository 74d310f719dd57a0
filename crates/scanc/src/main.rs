//! Token-stream device CLI.
//!
//! Drives the process-wide scanner the way a user-space client drives the
//! device: open a handle, set separators, write, read tokens back.

use scan_device::{init_tracing, Scanner};
use scanc::commands::{parse_tokens_options, run_demo, run_tokens, CommandError};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let mut stdout = std::io::stdout().lock();

    let result = match command.as_str() {
        "tokens" => parse_tokens_options(&args[2..])
            .and_then(|options| run_tokens(Scanner::global(), &options, &mut stdout)),
        "demo" => run_demo(Scanner::global(), &mut stdout),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("scan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        if matches!(e, CommandError::Usage(_)) {
            eprintln!("Usage: scan tokens [--separators=S] [--max-len=N] [FILE|-]");
        }
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("Shared token-stream scanner");
    println!();
    println!("Usage: scan <command> [options]");
    println!();
    println!("Commands:");
    println!("  tokens [FILE|-]      Print the tokens of a file (default: stdin)");
    println!("  demo                 Tokenize \"This is a test.\" on \" \\t\\n\"");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Tokens options:");
    println!("  --separators=<S>    Separator bytes; escapes \\t \\n \\r \\f \\v \\s \\\\");
    println!("  --max-len=<N>       Largest token piece per read (default: 1023)");
    println!();
    println!("Environment:");
    println!("  SCAN_SEPARATORS     Device default separators");
    println!("  SCAN_MAX_HANDLES    Open handle limit");
    println!("  SCAN_MAX_BUFFER     Largest buffer in bytes");
    println!("  RUST_LOG            Tracing filter, e.g. scan_device=debug");
}
