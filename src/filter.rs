//! Classify search results into kept and removed by publication date.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    date::{Cutoff, PublicationDate},
    esummary::{DateLookup, DateMap},
    identifier::{Identifier, pmid::Pmid},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    DateUnknown,
    TooOld,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DateUnknown => "date_unknown",
            Reason::TooOld => "too_old",
        }
    }
}

/// A result dropped by the filter. Only the fields needed to identify it are carried over.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub title: Option<Value>,
    pub url: Option<Value>,
    pub pub_date: Option<PublicationDate>,
    pub reason: Reason,
}

impl Removed {
    fn new(result: &Value, pub_date: Option<PublicationDate>, reason: Reason) -> Self {
        Removed {
            title: result.get("title").cloned(),
            url: result.get("url").cloned(),
            pub_date,
            reason,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(title) = &self.title {
            out.insert("title".into(), title.clone());
        }
        if let Some(url) = &self.url {
            out.insert("url".into(), url.clone());
        }
        if let Some(date) = self.pub_date {
            out.insert("pub_date".into(), Value::String(date.to_string()));
        }
        out.insert("reason".into(), Value::String(self.reason.as_str().into()));
        Value::Object(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub window_days: u32,
    /// `None` when the window is zero and nothing was filtered.
    pub cutoff: Option<Cutoff>,
    pub total: usize,
    /// Kept results in input order. With a cutoff, each carries a `pub_date` field.
    pub kept: Vec<Value>,
    /// Removed results in input order.
    pub removed: Vec<Removed>,
}

impl ClassificationReport {
    pub fn date_range(&self) -> Option<String> {
        self.cutoff.map(|c| c.range())
    }
}

/// Look up a record identifier for `result` from its `url` field.
pub fn identifier_of(result: &Value) -> Option<Pmid<'_>> {
    result.get("url").and_then(Value::as_str).and_then(Pmid::parse)
}

/// Partition `results` by publication date against the window ending at `today`.
///
/// A zero window returns every result untouched. Otherwise the distinct identifiers are looked up
/// in one batch (skipped entirely when there are none), and every result is classified:
/// no date is `date_unknown`, a date before the cutoff is `too_old`, anything else is kept with
/// its `pub_date` attached.
pub fn resolve<L>(
    results: &[Value],
    window_days: u32,
    today: NaiveDate,
    lookup: &L,
) -> ClassificationReport
where
    L: DateLookup + ?Sized,
{
    if window_days == 0 {
        return ClassificationReport {
            window_days,
            cutoff: None,
            total: results.len(),
            kept: results.to_vec(),
            removed: Vec::new(),
        };
    }

    let ids: Vec<Option<Pmid<'_>>> = results.iter().map(identifier_of).collect();

    let mut seen = HashSet::new();
    let distinct: Vec<Pmid<'_>> = ids
        .iter()
        .flatten()
        .filter(|p| seen.insert(p.as_str()))
        .copied()
        .collect();

    let dates = if distinct.is_empty() {
        DateMap::new()
    } else {
        lookup.lookup(&distinct)
    };

    let cutoff = Cutoff::new(today, window_days);
    let mut kept = Vec::new();
    let mut removed = Vec::new();

    for (result, id) in results.iter().zip(ids.iter().copied()) {
        let Some(date) = id.and_then(|p| dates.get(p.as_str()).copied()) else {
            removed.push(Removed::new(result, None, Reason::DateUnknown));
            continue;
        };
        if !cutoff.admits(date) {
            removed.push(Removed::new(result, Some(date), Reason::TooOld));
            continue;
        }
        match result {
            Value::Object(fields) => {
                let mut fields = fields.clone();
                fields.insert("pub_date".into(), Value::String(date.to_string()));
                kept.push(Value::Object(fields));
            }
            // A dated result always has a `url`, so it is always an object.
            other => kept.push(other.clone()),
        }
    }

    info!(
        window_days,
        range = %cutoff.range(),
        kept = kept.len(),
        removed = removed.len(),
        "classified search results"
    );

    ClassificationReport {
        window_days,
        cutoff: Some(cutoff),
        total: results.len(),
        kept,
        removed,
    }
}
