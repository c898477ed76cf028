//! Command line surface: one subcommand per page action.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::{EventStatus, FilterSpec, ModeFilter, PriceClass};
use crate::validation::EventMode;

#[derive(Parser)]
#[command(
    name = "event-portal",
    author,
    version,
    about = "Browse, join and manage events from the terminal"
)]
pub struct Cli {
    /// Path to the `.env` configuration file.
    #[arg(long, default_value = ".env")]
    pub env: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List events on the landing grid.
    Events(ListArgs),
    /// Show the popular carousel.
    Popular,
    /// Show one event.
    Show { id: i64 },
    /// Register for an event.
    Join {
        id: i64,
        #[command(flatten)]
        form: JoinArgs,
    },
    Login(CredentialArgs),
    Logout,
    /// Create a regular account.
    Signup(CredentialArgs),
    /// Registered events of the signed-in user.
    Profile,
    /// Rate an event you registered for, replacing an earlier rating.
    Rate {
        event_id: i64,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Remove your rating of an event.
    Unrate { event_id: i64 },
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// All events, newest first.
    Events,
    DeleteEvent {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    CreateEvent(EventArgs),
    UpdateEvent {
        id: i64,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Who registered for an event.
    Registrants { id: i64 },
    Categories,
    Locations,
    Users,
    AddUser(CredentialArgs),
    DeleteUser { id: i64 },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Case-insensitive part of the event name.
    #[arg(long)]
    pub name: Option<String>,
    /// Exact start date as stored, e.g. 2024-12-01.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value = "all")]
    pub mode: ModeFilter,
    /// `free` or `tidak free`.
    #[arg(long)]
    pub price: Option<PriceClass>,
    #[arg(long, default_value = "upcoming")]
    pub status: EventStatus,
    /// Ignore the status filter.
    #[arg(long, conflicts_with = "status")]
    pub any_status: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl ListArgs {
    pub fn filters(&self) -> FilterSpec {
        FilterSpec {
            category: self.category.clone(),
            location: self.location.clone(),
            name: self.name.clone(),
            date_start: self.date.clone(),
            mode: self.mode,
            price: self.price,
            status: (!self.any_status).then_some(self.status),
        }
    }
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub job: String,
    #[arg(long = "payment")]
    pub payment_method: String,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date_start: String,
    #[arg(long)]
    pub date_end: Option<String>,
    #[arg(long)]
    pub start_time: String,
    #[arg(long)]
    pub end_time: Option<String>,
    #[arg(long)]
    pub capacity: u32,
    #[arg(long)]
    pub category_id: i64,
    #[arg(long)]
    pub location_id: Option<i64>,
    #[arg(long, default_value = "")]
    pub address: String,
    /// `Free` or an amount; amounts are formatted as rupiah.
    #[arg(long, default_value = "Free")]
    pub price: String,
    #[arg(long, default_value = "offline")]
    pub mode: EventMode,
    #[arg(long, default_value = "")]
    pub link: String,
    #[arg(long, default_value = "")]
    pub benefits: String,
    /// Image file to upload as the event photo.
    #[arg(long)]
    pub photo: Option<PathBuf>,
    /// Agenda entry as `date|time|speaker|location`; repeatable.
    #[arg(long = "session")]
    pub sessions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_defaults_to_upcoming() {
        let cli = Cli::parse_from(["event-portal", "events", "--mode", "online"]);
        let Commands::Events(args) = cli.command else {
            panic!("expected events command");
        };
        let filters = args.filters();
        assert_eq!(filters.status, Some(EventStatus::Upcoming));
        assert_eq!(filters.mode, ModeFilter::Online);

        let cli = Cli::parse_from(["event-portal", "events", "--any-status", "--price", "free"]);
        let Commands::Events(args) = cli.command else {
            panic!("expected events command");
        };
        assert_eq!(args.filters().status, None);
        assert_eq!(args.filters().price, Some(PriceClass::Free));
    }

    #[test]
    fn rating_is_bounded() {
        assert!(Cli::try_parse_from(["event-portal", "rate", "3", "6"]).is_err());
        assert!(Cli::try_parse_from(["event-portal", "rate", "3", "5"]).is_ok());
    }
}
