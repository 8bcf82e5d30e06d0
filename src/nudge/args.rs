use clap::{Parser, Subcommand, ValueEnum};
use nudge::lifecycle::ViewMode;
use nudge::model::Priority;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nudge", version)]
#[command(about = "Reminders that nag you as often as they matter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $NUDGE_HOME, then the OS data dir)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Normal,
    Urgent,
    #[value(alias = "very_urgent")]
    VeryUrgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Normal => Priority::Normal,
            PriorityArg::Urgent => Priority::Urgent,
            PriorityArg::VeryUrgent => Priority::VeryUrgent,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    All,
    Urgent,
    Sorted,
}

impl From<ModeArg> for ViewMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::All => ViewMode::All,
            ModeArg::Urgent => ViewMode::Urgent,
            ModeArg::Sorted => ViewMode::Sorted,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List reminders
    #[command(alias = "ls")]
    List {
        /// Which reminders to show, and in what order
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Add a reminder
    #[command(alias = "a")]
    Add {
        /// What to be reminded of
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// How often to be reminded: normal (48h), urgent (12h), very-urgent (1h)
        #[arg(short, long, value_enum, default_value_t = PriorityArg::Normal)]
        priority: PriorityArg,
    },

    /// Mark a reminder done (deleted after a short undo window)
    #[command(alias = "d")]
    Done {
        /// Position in the list (e.g. 2) or id prefix
        selector: String,

        /// View the position refers to (defaults to the configured view)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Delete immediately, without offering undo
        #[arg(long)]
        no_undo: bool,
    },

    /// Flip the stored done flag of a reminder
    Toggle {
        /// Position in the list (e.g. 2) or id prefix
        selector: String,

        /// View the position refers to (defaults to the configured view)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Remove all reminders
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show how often a priority repeats its notification
    Interval {
        #[arg(value_enum)]
        priority: PriorityArg,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., grace-period-ms)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
