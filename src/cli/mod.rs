//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};

/// Book catalog HTTP API
#[derive(Parser)]
#[command(name = "book-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply migrations and seed the admin user, then exit
    Migrate,

    /// Manage user credentials
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user directly in the store
    Add {
        username: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

pub use commands::*;
