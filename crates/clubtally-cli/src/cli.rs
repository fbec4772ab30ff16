//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "clubtally")]
#[command(about = "Track members, payments, and expenses for a small club")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local database file
    #[arg(long, value_name = "PATH", global = true)]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage members
    #[command(subcommand)]
    Member(MemberCommands),
    /// Record and list payments
    #[command(subcommand)]
    Payment(PaymentCommands),
    /// Record and list expenses
    #[command(subcommand)]
    Expense(ExpenseCommands),
    /// Schedule and list classes
    #[command(subcommand)]
    Session(SessionCommands),
    /// Run a sync pass against the remote store
    Sync {
        /// Only push local pending changes
        #[arg(long, conflicts_with = "pull_only")]
        push_only: bool,
        /// Only pull remote changes
        #[arg(long, conflicts_with = "push_only")]
        pull_only: bool,
    },
    /// Show sync configuration and pending-row counts
    Status,
    /// Run the periodic background sync until interrupted
    Watch {
        /// Seconds between sync passes
        #[arg(long, value_name = "SECS")]
        interval_secs: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a new member
    Add {
        /// Member name
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Join date (defaults to today)
        #[arg(long, value_name = "DATE")]
        joined_on: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List members
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a member (soft delete once synced)
    Remove {
        /// Member ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment
    Add {
        /// Paying member ID
        member_id: i64,
        /// Amount in cents
        amount_cents: i64,
        /// Payment method
        #[arg(long, default_value = "cash")]
        method: String,
        /// Payment date (defaults to today)
        #[arg(long, value_name = "DATE")]
        paid_on: Option<String>,
        /// Related subscription ID
        #[arg(long)]
        subscription_id: Option<i64>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List recent payments
    List {
        /// Number of payments to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Expense category
        category: String,
        /// Amount in cents
        amount_cents: i64,
        /// Expense date (defaults to today)
        #[arg(long, value_name = "DATE")]
        spent_on: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Schedule a class session
    Add {
        /// Class title
        title: String,
        /// Scheduled start (RFC 3339)
        scheduled_at: String,
        #[arg(long)]
        coach: Option<String>,
        /// Maximum attendance
        #[arg(long, default_value = "0")]
        capacity: i64,
        #[arg(long)]
        note: Option<String>,
    },
    /// List upcoming sessions
    List {
        /// Number of sessions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
