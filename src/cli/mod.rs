//! CLI argument definitions for Daytally.

use clap::{Args, Parser, Subcommand};

/// Daytally - daily task tracking with point-weighted completion stats.
///
/// Start with `dt system init`, add tasks with `dt task add`, then check
/// `dt week` and `dt stats`.
#[derive(Parser, Debug)]
#[command(name = "dt")]
#[command(author, version, about = "Track daily tasks and report on completion trends", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Owner to scope tasks to. Can also be set via DT_OWNER or config.kdl.
    #[arg(long, global = true, env = "DT_OWNER")]
    pub owner: Option<String>,

    /// Data directory holding daytally.db and config.kdl.
    /// Can also be set via DT_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "DT_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Show the Monday-Sunday week containing a day
    Week {
        /// Any day of the week (YYYY-MM-DD, today, yesterday, tomorrow)
        #[arg(long)]
        date: Option<String>,
    },

    /// Journal entries, one per day
    Journal {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Gratitude entries, one per day
    Gratitude {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Completion statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },

    /// Category management commands
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task
    Add {
        /// Task title
        title: String,

        /// Category (defaults to the configured default-category)
        #[arg(short, long)]
        category: Option<String>,

        /// Repeat every day from --date on instead of appearing once
        #[arg(long)]
        regular: bool,

        /// Points (1-3, defaults to the configured default-points)
        #[arg(short, long)]
        points: Option<u8>,

        /// Mark as important
        #[arg(long)]
        important: bool,

        /// Mark as urgent
        #[arg(long)]
        urgent: bool,

        /// Day the task appears on, or first day for regular tasks (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Update a task
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New points (1-3)
        #[arg(short, long)]
        points: Option<u8>,

        /// Set importance
        #[arg(long)]
        important: Option<bool>,

        /// Set urgency
        #[arg(long)]
        urgent: Option<bool>,
    },

    /// Mark a task completed on a day
    Done {
        /// Task ID
        id: String,

        /// Day to mark (default: today)
        #[arg(long)]
        day: Option<String>,
    },

    /// Mark a task not completed on a day
    Undo {
        /// Task ID
        id: String,

        /// Day to unmark (default: today)
        #[arg(long)]
        day: Option<String>,
    },

    /// Delete a task. With --context, regular tasks are archived from that
    /// day on and keep their history.
    Delete {
        /// Task ID
        id: String,

        /// Day the deletion is made from
        #[arg(long)]
        context: Option<String>,
    },

    /// List task instances for a day or range
    List {
        /// Single day (default: today)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        day: Option<String>,

        /// First day of the range
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last day of the range
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
}

/// Journal and gratitude subcommands
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Save the entry for a day, replacing any earlier one
    Set {
        /// Entry text
        text: String,

        /// Day of the entry (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show the entry for a day, or every entry in a range
    Show {
        /// Single day (default: today)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        date: Option<String>,

        /// First day of the range
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last day of the range
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
}

/// Date range selection shared by the stats views.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day of the range
    #[arg(long, requires = "to", conflicts_with = "days")]
    pub from: Option<String>,

    /// Last day of the range
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Number of days ending today (default: current week)
    #[arg(long)]
    pub days: Option<u32>,
}

/// Stats subcommands
#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Point totals and percentage for every day in the range
    Daily {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Completion rate per regular task
    Tasks {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Completion by importance/urgency quadrant
    Quadrants {
        #[command(flatten)]
        range: RangeArgs,

        /// List the instances in one quadrant
        /// (important-urgent, important-not-urgent, not-important-urgent, not-important-not-urgent)
        #[arg(long)]
        select: Option<String>,
    },

    /// Completion per category
    Categories {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Totals across the whole range
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List,

    /// Add a category (returns the existing one if the name is taken)
    Add {
        /// Category name
        name: String,

        /// Display color (e.g. "#10B981")
        #[arg(long)]
        color: Option<String>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,

    /// Set a value in the data directory's config.kdl
    Set {
        /// Configuration key (owner, output-format, default-points, default-category)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Initialize the data directory
    Init,

    /// Show version, build and database information
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_add() {
        let cli = Cli::try_parse_from([
            "dt", "task", "add", "Stretch", "-c", "Health", "--regular", "-p", "2", "--important",
        ])
        .unwrap();
        match cli.command {
            Commands::Task {
                command:
                    TaskCommands::Add {
                        title,
                        category,
                        regular,
                        points,
                        important,
                        urgent,
                        date,
                    },
            } => {
                assert_eq!(title, "Stretch");
                assert_eq!(category.as_deref(), Some("Health"));
                assert!(regular);
                assert_eq!(points, Some(2));
                assert!(important);
                assert!(!urgent);
                assert_eq!(date, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_day_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "dt",
            "task",
            "list",
            "--day",
            "2024-01-01",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-02",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_from_requires_to() {
        assert!(Cli::try_parse_from(["dt", "stats", "daily", "--from", "2024-01-01"]).is_err());
        assert!(
            Cli::try_parse_from([
                "dt", "stats", "daily", "--from", "2024-01-01", "--to", "2024-01-07"
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_parse_journal_set() {
        let cli =
            Cli::try_parse_from(["dt", "journal", "set", "Slept well", "--date", "2024-01-02"])
                .unwrap();
        match cli.command {
            Commands::Journal {
                command: NoteCommands::Set { text, date },
            } => {
                assert_eq!(text, "Slept well");
                assert_eq!(date.as_deref(), Some("2024-01-02"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(
            Cli::try_parse_from([
                "dt", "gratitude", "show", "--date", "2024-01-01", "--from", "2024-01-01"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_global_human_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["dt", "week", "-H"]).unwrap();
        assert!(cli.human_readable);
    }
}
