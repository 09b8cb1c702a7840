//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Identity - user registration, lifecycle and bearer tokens
#[derive(Parser, Debug)]
#[command(name = "identity")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Administer users directly
    User(UserArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to, overriding SERVER_HOST
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on, overriding SERVER_PORT
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep users in process memory instead of the database
    #[arg(long)]
    pub in_memory: bool,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the user command
#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

/// User lifecycle actions
#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Register a new user
    Create {
        /// Email address
        email: String,
        /// Plain text password
        password: String,
    },
    /// Mark a user's email as validated
    Validate {
        email: String,
    },
    /// Activate a user
    Enable {
        email: String,
    },
    /// Deactivate a user
    Disable {
        email: String,
    },
    /// List users, most recently updated first
    List {
        /// Page number starting from 1
        #[arg(long)]
        page: Option<u64>,
        /// Users per page
        #[arg(long)]
        page_size: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_in_memory() {
        let cli = Cli::parse_from(["identity", "serve", "--in-memory", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert!(args.in_memory);
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_user_list_paginated() {
        let cli = Cli::parse_from(["identity", "user", "list", "--page", "2", "--page-size", "10"]);
        match cli.command {
            Commands::User(UserArgs {
                action: UserAction::List { page, page_size },
            }) => {
                assert_eq!(page, Some(2));
                assert_eq!(page_size, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
