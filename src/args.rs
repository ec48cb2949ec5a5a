use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Stock Rating Processor",
    author = "Stock Rating",
    long_about = "Maintains per-character and free-for-all ratings from reported matches"
)]
pub struct Args {
    /// Directory holding characters.json and the match logs.
    ///
    /// When unset, a hosted deployment (RENDER set) uses /var/data and
    /// everything else uses the working directory.
    #[arg(short, long, env = "DATA_DIR", global = true, help = "Data directory")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        global = true,
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    /// Commit and push the data directory after every change
    #[arg(long, env = "SYNC_ENABLED", global = true, action = clap::ArgAction::SetTrue)]
    pub sync: bool,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Record a head-to-head match
    Submit {
        #[arg(long)]
        p1: String,
        #[arg(long)]
        c1: String,
        #[arg(long)]
        p2: String,
        #[arg(long)]
        c2: String,
        /// Either "p1" or "p2"
        #[arg(long)]
        winner: String,
        /// The winner finished without losing a stock
        #[arg(long, action = clap::ArgAction::SetTrue)]
        three_stock: bool
    },

    /// Record a free-for-all session, first place first
    Placement {
        #[arg(required = true, num_args = 1..)]
        players: Vec<String>
    },

    /// Rank every player by global rating
    Leaderboard,

    /// Show one player's ratings and record
    Player { name: String },

    /// Show the record of one player against another
    HeadToHead { player_a: String, player_b: String },

    /// Recompute every rating from the logs
    Rebuild,

    /// Delete all ratings and logs
    Reset {
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Required to confirm the wipe")]
        yes: bool
    },

    /// List the character roster
    Characters
}

#[cfg(test)]
mod tests {
    use crate::args::{Args, Command};
    use clap::Parser;

    #[test]
    fn test_parse_submit() {
        let args = Args::try_parse_from([
            "stock-rating-processor",
            "submit",
            "--p1",
            "alice",
            "--c1",
            "Fox",
            "--p2",
            "bob",
            "--c2",
            "Banjo & Kazooie",
            "--winner",
            "p2",
            "--three-stock"
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Submit {
                p1: "alice".to_string(),
                c1: "Fox".to_string(),
                p2: "bob".to_string(),
                c2: "Banjo & Kazooie".to_string(),
                winner: "p2".to_string(),
                three_stock: true
            }
        );
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args =
            Args::try_parse_from(["stock-rating-processor", "leaderboard", "--data-dir", "/tmp/ratings", "-l", "debug"])
                .unwrap();

        assert_eq!(args.command, Command::Leaderboard);
        assert_eq!(args.data_dir.unwrap().to_str(), Some("/tmp/ratings"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_placement_requires_players() {
        assert!(Args::try_parse_from(["stock-rating-processor", "placement"]).is_err());

        let args = Args::try_parse_from(["stock-rating-processor", "placement", "a", "b", "c"]).unwrap();
        assert_eq!(
            args.command,
            Command::Placement {
                players: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Args::try_parse_from(["stock-rating-processor", "-l", "loud", "characters"]).is_err());
    }
}
