use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use url::Url;

use crate::esummary::DEFAULT_ENDPOINT;

/// Read search results as JSON on stdin and keep only the recently published ones.
///
/// Publication dates are looked up in PubMed for every result whose URL points at a PubMed
/// record. Results without a known date, or published before the window, are listed under
/// `filtered_out`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Keep articles published within the last DAYS days; 0 disables filtering
    #[arg(value_name = "DAYS", default_value_t = 3)]
    pub days: u32,

    /// Metadata summary endpoint queried for publication dates
    #[arg(long, env = "PUBFILTER_ESUMMARY_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Date to treat as today (YYYY-MM-DD); defaults to the local date
    #[arg(long, env = "PUBFILTER_TODAY", hide = true)]
    pub today: Option<NaiveDate>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
