//! Strata CLI Client
//!
//! Command-line interface for interacting with a running Strata server.

use clap::{Parser, Subcommand};

use strata::network::Client;

/// Strata CLI
#[derive(Parser, Debug)]
#[command(name = "strata-cli")]
#[command(about = "CLI for the Strata key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() {
    let args = Args::parse();

    let query = match &args.command {
        Commands::Get { key } => format!("GET {key}"),
        Commands::Set { key, value } => format!("SET {key} {value}"),
        Commands::Del { key } => format!("DEL {key}"),
    };

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match client.query(&query) {
        Ok(response) => println!("{response}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
