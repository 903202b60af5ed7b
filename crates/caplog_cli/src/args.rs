//! Command-line surface for the `caplog` binary.
//!
//! Selectors are clap subcommands, so supplying more than one is a usage
//! error rejected before the store is touched. Naked arguments (no
//! subcommand) are the entry text, matching `caplog went for a run`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "caplog",
    version,
    about = "Capture short timestamped journal entries from the terminal",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Entry text, logged at the current time. With no text at all,
    /// shows the last three entries.
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the text of the most recent entry, keeping its timestamp
    Amend {
        /// Replacement text
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Delete the most recent entry (asks for confirmation)
    Delete,

    /// Show the most recent entries
    Last {
        /// How many entries to show
        #[arg(default_value_t = 3)]
        n: u32,
    },

    /// Log an entry at a past moment ("2 hours ago", "yesterday 21:30")
    Past {
        /// When the entry happened
        #[arg(required = true)]
        when: Vec<String>,

        /// Entry text; prompted for interactively when omitted
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show entries containing a substring, oldest first
    Grep {
        /// Literal text to look for
        term: String,
    },

    /// Print the total number of entries
    Count,

    /// Show one randomly chosen entry
    Random,

    /// Import entry files from a directory (first line "YYYY-MM-DD HH:MM",
    /// rest is the entry text); imported files move into "_logged"
    Batch {
        /// Directory to scan
        dir: PathBuf,
    },

    /// Write all entries to a JSON backup file
    Backup {
        /// Output path (default: ~/Documents/caplog_backup.json)
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn naked_words_become_the_message() {
        let cli = Cli::parse_from(["caplog", "went", "for", "a", "run"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.message, vec!["went", "for", "a", "run"]);
    }

    #[test]
    fn no_arguments_means_default_tail() {
        let cli = Cli::parse_from(["caplog"]);
        assert!(cli.command.is_none());
        assert!(cli.message.is_empty());
    }

    #[test]
    fn last_defaults_to_three() {
        let cli = Cli::parse_from(["caplog", "last"]);
        match cli.command {
            Some(Command::Last { n }) => assert_eq!(n, 3),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn past_takes_expression_words_and_optional_message() {
        let cli = Cli::parse_from(["caplog", "past", "2", "hours", "ago", "-m", "lunch"]);
        match cli.command {
            Some(Command::Past { when, message }) => {
                assert_eq!(when.join(" "), "2 hours ago");
                assert_eq!(message.as_deref(), Some("lunch"));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn selectors_are_mutually_exclusive() {
        // A subcommand plus trailing message words is a usage error.
        assert!(Cli::try_parse_from(["caplog", "count", "extra"]).is_err());
    }
}
