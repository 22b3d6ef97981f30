//! Command-line argument definitions for the Linkmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every subcommand works on a vault, a directory of Markdown
//! documents whose links form the graph being drawn.

use clap::{Parser, Subcommand, ValueEnum};

use linkmap::ExpandDirection;

/// Command-line arguments for the Linkmap canvas tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a canvas of a document's link neighborhood
    Build {
        /// Path to the vault directory
        vault: String,

        /// Document to center the canvas on, as a vault-relative path or name
        document: String,

        /// Maximum number of link hops to explore (overrides configuration)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Path to the output canvas file [default: next to the document]
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Add the links of one document to an existing canvas
    Expand {
        /// Path to the vault directory
        vault: String,

        /// Path to the canvas file
        diagram: String,

        /// Document to expand [default: derived from the canvas file name]
        #[arg(long)]
        document: Option<String>,

        /// Side of the document to expand
        #[arg(long, value_enum, default_value_t = Direction::Both)]
        direction: Direction,
    },

    /// Expand every document of an existing canvas by one level
    Grow {
        /// Path to the vault directory
        vault: String,

        /// Path to the canvas file
        diagram: String,
    },
}

/// Expansion direction as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Backlinks
    Left,
    /// Forward links
    Right,
    /// Backlinks, then forward links
    Both,
}

impl Direction {
    pub fn expand_directions(self) -> &'static [ExpandDirection] {
        match self {
            Direction::Left => &[ExpandDirection::Left],
            Direction::Right => &[ExpandDirection::Right],
            Direction::Both => &ExpandDirection::ALL,
        }
    }
}
