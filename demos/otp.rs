use std::io::{stdin, stdout, BufRead, Write};
use std::time::Duration;

use clap::Parser;
use yubikey_otp::config::Config;
use yubikey_otp::{identity_of, normalize_and_validate, Verifier};

/// Reads Yubikey OTPs from stdin and validates each of them.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Client id assigned by the verification service
    #[arg(long)]
    client_id: String,

    /// Verification server hostname, may be repeated (defaults to the Yubico cloud)
    #[arg(long = "server")]
    servers: Vec<String>,

    /// Give up on a validation after this many seconds
    #[arg(long)]
    deadline: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let servers = if args.servers.is_empty() {
        None
    } else {
        Some(args.servers)
    };
    let mut config = Config::new(args.client_id, servers);
    if let Some(seconds) = args.deadline {
        config = config.set_deadline(Duration::from_secs(seconds));
    }

    let verifier = match Verifier::new(config) {
        Ok(verifier) => verifier,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    println!("Ready!");
    let stdin = stdin();
    loop {
        print!("\nEnter OTP: ");
        let _ = stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let otp = match normalize_and_validate(line.trim_end_matches(&['\r', '\n'][..])) {
            Ok(otp) => otp,
            Err(e) => {
                println!("Invalid OTP: {}", e);
                continue;
            }
        };

        match verifier.validate(&otp) {
            Ok(()) => println!("Validated! (device {})", identity_of(&otp)),
            Err(e) => println!("Validation Error: {}", e),
        }
    }
}
