//! Batched publication-date lookup against the NCBI E-utilities `esummary` endpoint.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{date::PublicationDate, identifier::Identifier, identifier::pmid::Pmid};

pub const DEFAULT_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";

const USER_AGENT: &str = concat!("pubfilter/", env!("CARGO_PKG_VERSION"));

/// Record id to resolved publication date. Ids the service did not date are absent.
pub type DateMap = HashMap<String, PublicationDate>;

/// Resolve publication dates for a batch of records.
///
/// Implementations never fail: anything that goes wrong on the way to the service is reported as
/// "no dates", so callers only ever see a (possibly empty) map.
pub trait DateLookup {
    fn lookup(&self, ids: &[Pmid<'_>]) -> DateMap;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("metadata service answered with HTTP {0}")]
    Status(u16),
    #[error("metadata request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("metadata response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("metadata response has no usable `result`: {0}")]
    Shape(String),
}

pub struct EsummaryClient {
    endpoint: Url,
    agent: ureq::Agent,
}

impl EsummaryClient {
    pub fn new(endpoint: Url) -> Self {
        EsummaryClient {
            endpoint,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    /// The full request URL for one batch: every id joined into a single `id` parameter.
    fn request_url(&self, ids: &[Pmid<'_>]) -> Url {
        let joined = ids.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(",");
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("db", "pubmed")
            .append_pair("id", &joined)
            .append_pair("retmode", "json");
        url
    }

    /// Issue the single batched request. One attempt, no retry.
    fn fetch(&self, ids: &[Pmid<'_>]) -> Result<DateMap, LookupError> {
        let url = self.request_url(ids);
        debug!(%url, count = ids.len(), "requesting publication dates");
        let body: String = self
            .agent
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => LookupError::Status(code),
                e => LookupError::Transport(e),
            })?
            .body_mut()
            .read_to_string()?;
        parse_summaries(&body, ids)
    }
}

impl DateLookup for EsummaryClient {
    fn lookup(&self, ids: &[Pmid<'_>]) -> DateMap {
        if ids.is_empty() {
            return DateMap::new();
        }
        match self.fetch(ids) {
            Ok(dates) => {
                debug!(requested = ids.len(), dated = dates.len(), "publication dates resolved");
                dates
            }
            Err(e) => {
                warn!(error = %e, "publication date lookup failed, treating every date as unknown");
                DateMap::new()
            }
        }
    }
}

/// Build a [`DateMap`] from an `esummary` JSON body, keeping only the requested ids.
fn parse_summaries(body: &str, ids: &[Pmid<'_>]) -> Result<DateMap, LookupError> {
    let payload: Value = serde_json::from_str(body)?;
    let Some(result) = payload.get("result").and_then(Value::as_object) else {
        let detail = payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("missing `result` object");
        return Err(LookupError::Shape(detail.to_string()));
    };

    let mut dates = DateMap::new();
    for pmid in ids {
        // The service echoes ids without leading zeros.
        let Some(record) = result
            .get(pmid.as_str())
            .or_else(|| pmid.unpadded().and_then(|id| result.get(id)))
        else {
            continue;
        };
        match record_date(record) {
            Some(date) => {
                dates.insert(pmid.as_str().to_string(), date);
            }
            None => debug!(pmid = pmid.as_str(), "record carries no parseable date"),
        }
    }
    Ok(dates)
}

/// Electronic (early) date first, print date otherwise. The chosen string is parsed as-is; an
/// unparseable `epubdate` does not fall back to `pubdate`.
fn record_date(record: &Value) -> Option<PublicationDate> {
    let non_empty = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    };
    let chosen = non_empty("epubdate").or_else(|| non_empty("pubdate"))?;
    PublicationDate::parse(chosen)
}
