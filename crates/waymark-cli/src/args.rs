//! Command-line interface definitions using clap
//!
//! Argument structs stay on the CLI side and convert into the core parameter
//! types with `From`, so `waymark-core` never depends on clap:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Registry
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use waymark_core::{
    params::TagLocation, position::DEFAULT_POLL_INTERVAL, store::remote::DEFAULT_COLLECTION,
    Category, Coordinates, LocationId,
};

/// Tag places you want to come back to, then navigate back to them
///
/// Waymark keeps tagged locations in a remote document store when one is
/// configured and reachable, and in a local SQLite database otherwise.
#[derive(Parser)]
#[command(version, about, name = "wm")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waymark/waymark.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Base URL of the remote document store. Without it only the local
    /// database is used
    #[arg(long, global = true, env = "WAYMARK_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Collection holding the location documents on the remote store
    #[arg(
        long,
        global = true,
        env = "WAYMARK_REMOTE_COLLECTION",
        default_value = DEFAULT_COLLECTION
    )]
    pub remote_collection: String,

    /// Bearer token sent to the remote store
    #[arg(long, global = true, env = "WAYMARK_REMOTE_TOKEN", hide_env_values = true)]
    pub remote_token: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. `list` runs when none is given.
#[derive(Subcommand)]
pub enum Commands {
    /// Tag a location
    #[command(alias = "t")]
    Tag(TagArgs),
    /// List tagged locations
    #[command(alias = "ls")]
    List,
    /// Show one tagged location
    Show(IdArgs),
    /// Remove a tagged location
    #[command(alias = "rm")]
    Remove(IdArgs),
    /// Remove every tagged location
    Clear(ClearArgs),
    /// Plan a straight-line route to a tagged location
    #[command(alias = "nav")]
    Navigate(NavigateArgs),
    /// Show which store is in use
    Status,
}

/// Kind of place, as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    #[value(alias = "car")]
    Vehicle,
    #[value(alias = "shop")]
    Vendor,
    Custom,
}

impl From<CategoryArg> for Category {
    fn from(val: CategoryArg) -> Self {
        match val {
            CategoryArg::Vehicle => Category::Vehicle,
            CategoryArg::Vendor => Category::Vendor,
            CategoryArg::Custom => Category::Custom,
        }
    }
}

/// Tag a location
///
/// Without a name, the category's default name is used ("My Car",
/// "Favorite Shop" or "Tagged Location").
#[derive(ClapArgs)]
pub struct TagArgs {
    /// Display name of the location
    pub name: Option<String>,

    /// What kind of place this is
    #[arg(short, long, value_enum, default_value_t = CategoryArg::Custom)]
    pub category: CategoryArg,

    /// Position to tag, as decimal degrees
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub at: Coordinates,
}

impl From<TagArgs> for TagLocation {
    fn from(val: TagArgs) -> Self {
        let category = Category::from(val.category);
        TagLocation {
            name: val
                .name
                .unwrap_or_else(|| category.default_name().to_string()),
            category: category.as_str().to_string(),
            latitude: val.at.latitude,
            longitude: val.at.longitude,
        }
    }
}

#[derive(ClapArgs)]
pub struct IdArgs {
    /// ID of the tagged location
    pub id: String,
}

impl From<IdArgs> for LocationId {
    fn from(val: IdArgs) -> Self {
        LocationId::from(val.id)
    }
}

/// Remove every tagged location
#[derive(ClapArgs)]
pub struct ClearArgs {
    /// Confirm removing every tagged location
    #[arg(long)]
    pub yes: bool,
}

/// Plan a straight-line route to a tagged location
///
/// The current position comes either from `--from` or from a file holding
/// `lat,lng` that another program keeps up to date.
#[derive(ClapArgs)]
#[command(group(
    ArgGroup::new("origin")
        .required(true)
        .args(["from", "position_file"])
))]
pub struct NavigateArgs {
    /// ID of the tagged location to navigate to
    pub id: String,

    /// Current position, as decimal degrees
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub from: Option<Coordinates>,

    /// File holding the current position as `lat,lng`
    #[arg(long, value_name = "PATH")]
    pub position_file: Option<PathBuf>,

    /// Keep updating the route as the position changes (Ctrl-C to stop)
    #[arg(long)]
    pub follow: bool,

    /// Seconds between position samples in follow mode
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,
}
