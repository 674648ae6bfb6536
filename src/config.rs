//! Command-line and environment configuration.
//!
//! Every flag has an `INFOSPHERE_*` environment fallback, and a `.env` file in
//! the working directory is loaded first, so a checkout can be configured
//! without typing flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::pagination::{PaginationMode, DEFAULT_PAGE_SIZE};
use crate::query::{QuerySpec, SortKey, SortOrder};
use crate::source::DEFAULT_API_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "infosphere")]
#[command(version, about = "Terminal dashboard for a categorized message feed")]
pub struct Config {
    /// Messages endpoint of the feed API.
    #[arg(long, env = "INFOSPHERE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Items per page.
    #[arg(long, env = "INFOSPHERE_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// `server`: the API filters and pages; `client`: fetch everything once
    /// and filter/page locally.
    #[arg(long, value_enum, env = "INFOSPHERE_MODE", default_value_t = PaginationMode::Server)]
    pub mode: PaginationMode,

    /// Initial sort key: `date`, `title`, or `priority`.  Anything else
    /// sorts by date.
    #[arg(long, env = "INFOSPHERE_SORT", default_value = "date")]
    pub sort: String,

    /// Initial sort order: `asc` or `desc`.  Anything else is descending.
    #[arg(long, env = "INFOSPHERE_ORDER", default_value = "desc")]
    pub order: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "INFOSPHERE_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Write logs here.  Nothing is logged when unset, since the terminal
    /// itself is taken over by the dashboard.
    #[arg(long, env = "INFOSPHERE_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load `.env` (if any), then parse the process arguments.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The query the dashboard starts with: no filters, configured sort.
    pub fn initial_spec(&self) -> QuerySpec {
        QuerySpec {
            sort_key: SortKey::parse(&self.sort),
            sort_order: SortOrder::parse(&self.order),
            ..Default::default()
        }
    }
}
