//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::DrawStyle;
use crate::domain::{BirthYear, PersonId};

/// Genealogical family trees: validation, rendering, age gaps, succession and pruning
#[derive(Parser, Debug)]
#[command(name = "famtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Person to start from (default: root)
    #[arg(long, global = true)]
    pub from: Option<PersonId>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the family tree
    Draw {
        /// Print names only
        #[arg(long)]
        names_only: bool,
        /// Layout (default from settings)
        #[arg(long, value_enum)]
        style: Option<DrawStyle>,
    },

    /// Check the tree for broken invariants
    Validate {
        /// Check from the true root instead of the start person
        #[arg(long)]
        whole_tree: bool,
    },

    /// List ancestors, root first
    Ancestors {
        /// Person id
        pid: PersonId,
    },

    /// List people without children
    Childless,

    /// List parents by age gap to their children
    Gaps {
        /// Report parents with a child born less than N years later
        #[arg(long)]
        younger: Option<BirthYear>,
        /// Report parents with a child born more than N years later
        #[arg(long)]
        older: Option<BirthYear>,
    },

    /// Show the line of succession
    Succession {
        /// Living person ids, comma separated (default: everyone)
        #[arg(long, value_delimiter = ',')]
        alive: Option<Vec<PersonId>>,
    },

    /// Remove branches without living descendants
    Prune {
        /// Living person ids, comma separated
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        alive: Vec<PersonId>,
        /// Print names only
        #[arg(long)]
        names_only: bool,
    },

    /// Show tree statistics
    Info,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings as TOML
    Show,
    /// Print the global config file location
    Path,
}
