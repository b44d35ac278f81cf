//! Command-line argument parsing for solrbuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// solrbuddy - manage product documents in an Apache Solr core
#[derive(Parser, Debug)]
#[command(name = "solrbuddy")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version = "0.1.0")]
#[command(about = "Save, fetch and search product documents in Apache Solr", long_about = None)]
pub struct Args {
    /// Solr base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Solr core name (overrides the config file)
    #[arg(long, global = true)]
    pub core: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a throwaway in-memory index instead of Solr
    #[arg(long, global = true)]
    pub memory: bool,

    /// Verbosity level: default (warnings), -v (info), -vv (debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert or overwrite a product
    Save {
        /// Product id (required unless --generate-id is given)
        #[arg(long)]
        id: Option<String>,

        /// Generate a random id
        #[arg(long, conflicts_with = "id")]
        generate_id: bool,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Fetch a product by id
    Get { id: String },

    /// Delete a product by id
    Delete { id: String },

    /// Delete every product in the core
    DeleteAll {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Find products whose name matches exactly
    FindByName { name: String },

    /// Free-text search over name, category and description
    Search {
        term: String,
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Run a named query from the config file
    NamedSearch {
        /// Positional query arguments (?0, ?1, ...)
        #[arg(required = true)]
        args: Vec<String>,

        /// Named query to run
        #[arg(long, default_value = crate::query::FIND_BY_NAMED_QUERY)]
        query: String,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Count documents in the core
    Count,

    /// Check that Solr answers
    Ping,

    /// Display current configuration
    Config,
}

/// Page selection shared by search commands
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PagingArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Page size
    #[arg(long, default_value_t = crate::types::DEFAULT_PAGE_SIZE)]
    pub size: usize,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default tracing filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "solrbuddy=info",
            Verbosity::VeryVerbose => "solrbuddy=debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_save() {
        let args = Args::parse_from([
            "solrbuddy", "save", "--id", "P0001", "--name", "Desk", "--category", "Furniture",
        ]);
        match args.command {
            Commands::Save { id, name, category, description, generate_id } => {
                assert_eq!(id.as_deref(), Some("P0001"));
                assert_eq!(name, "Desk");
                assert_eq!(category, "Furniture");
                assert!(description.is_empty());
                assert!(!generate_id);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_paging() {
        let args = Args::parse_from(["solrbuddy", "-v", "search", "Phone", "--page", "2", "--size", "5"]);
        assert_eq!(args.verbosity(), Verbosity::Verbose);
        match args.command {
            Commands::Search { term, paging } => {
                assert_eq!(term, "Phone");
                assert_eq!(paging.page, 2);
                assert_eq!(paging.size, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_named_search_defaults() {
        let args = Args::parse_from(["solrbuddy", "--memory", "named-search", "one"]);
        assert!(args.memory);
        match args.command {
            Commands::NamedSearch { args, query, paging } => {
                assert_eq!(args, vec!["one".to_string()]);
                assert_eq!(query, "Product.findByNamedQuery");
                assert_eq!(paging.size, 10);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let quiet = Args::parse_from(["solrbuddy", "-q", "count"]);
        assert_eq!(quiet.verbosity(), Verbosity::Quiet);
        assert_eq!(quiet.verbosity().filter_directive(), "error");

        let debug = Args::parse_from(["solrbuddy", "-vv", "ping"]);
        assert_eq!(debug.verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_id_conflicts_with_generate() {
        let result = Args::try_parse_from([
            "solrbuddy", "save", "--id", "P1", "--generate-id",
        ]);
        assert!(result.is_err());
    }
}
