use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pillbox",
    version,
    about = "Medication reminder and adherence tracking"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Act as this user id (defaults to the configured user)
    #[arg(long, global = true)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize config and data directory
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Manage the medicine registry
    Med {
        #[command(subcommand)]
        action: MedAction,
    },

    /// Manage reminders and record outcomes
    Reminder {
        #[command(subcommand)]
        action: ReminderAction,
    },

    /// Adherence reports
    Adherence {
        #[command(subcommand)]
        action: AdherenceAction,
    },

    /// Run scheduler ticks (meant to be invoked by cron)
    Tick {
        #[command(subcommand)]
        job: Option<TickJob>,
    },
}

#[derive(Subcommand)]
pub enum MedAction {
    /// Register a medicine
    Add {
        /// Medicine name
        name: String,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },
    /// List registered medicines
    List,
}

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Create a reminder for a medicine
    Add {
        /// Medicine name or id
        medicine: String,

        /// Time of day, HH:MM
        #[arg(long)]
        time: String,

        /// Recurrence: daily, specific_days, or interval
        #[arg(long, default_value = "daily")]
        recurrence: String,

        /// Comma-separated weekday indices for specific_days (0=Mon..6=Sun)
        #[arg(long)]
        days: Option<String>,

        /// Dose, e.g. "400mg" or "1/2 tablet"
        #[arg(long)]
        dose: Option<String>,

        /// First day the reminder applies (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day the reminder applies
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Linked prescription id
        #[arg(long)]
        prescription: Option<String>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// List reminders
    List {
        /// Only active (true) or only inactive (false) reminders
        #[arg(long)]
        active: Option<bool>,

        /// Filter by medicine id
        #[arg(long)]
        medicine: Option<String>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },

    /// Update fields of a reminder
    Update {
        /// Reminder id
        id: String,

        /// Time of day, HH:MM
        #[arg(long)]
        time: Option<String>,

        /// Recurrence: daily, specific_days, or interval
        #[arg(long)]
        recurrence: Option<String>,

        /// Comma-separated weekday indices (0=Mon..6=Sun)
        #[arg(long)]
        days: Option<String>,

        /// Dose, e.g. "400mg"
        #[arg(long)]
        dose: Option<String>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Activate or deactivate
        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a reminder and its event history
    Delete {
        /// Reminder id
        id: String,
    },

    /// Today's reminders with status
    Today,

    /// Status of one reminder for a date
    Status {
        /// Reminder id
        id: String,

        /// Date to resolve (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a dose as taken
    Take {
        /// Reminder id
        id: String,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Record a dose as skipped
    Skip {
        /// Reminder id
        id: String,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Record missed events for everything past due today
    Sweep,

    /// Event history for a date range
    History {
        /// Start date
        #[arg(long)]
        from: NaiveDate,

        /// End date
        #[arg(long)]
        to: NaiveDate,

        /// Filter by status: taken, skipped, or missed
        #[arg(long)]
        status: Option<String>,

        /// Filter by medicine id
        #[arg(long)]
        medicine: Option<String>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
}

#[derive(Subcommand)]
pub enum AdherenceAction {
    /// Counts and rate for a date range
    Stats {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Per-day stats for the trailing N days
    Daily {
        /// Number of days
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Current and longest perfect-day streak
    Streak,

    /// Adherence broken down per medicine
    ByMedicine {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum TickJob {
    /// Missed-backlog sweep for all users
    Daily,
    /// Streak and adherence observations for all users
    Weekly,
}
