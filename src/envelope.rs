//! The JSON document read from stdin and written to stdout.
//!
//! Input from the upstream search is either a success envelope
//! (`{"success": true, "results": [...], ...}`) or anything else, which is passed through
//! untouched. Top-level fields survive in their original order; computed fields are merged in.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    esummary::DateLookup,
    filter::{self, ClassificationReport},
};

pub const INVALID_INPUT: &str = "Invalid JSON from stdin";

/// What to print and how to exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub body: Value,
    /// Single-line output rather than pretty-printed.
    pub compact: bool,
    /// Whether the process should exit with status 0.
    pub success: bool,
    /// `(kept, removed)` when a filtering pass actually ran.
    pub counts: Option<(usize, usize)>,
}

impl Outcome {
    fn invalid_input() -> Self {
        Outcome {
            body: json!({ "success": false, "error": INVALID_INPUT }),
            compact: true,
            success: false,
            counts: None,
        }
    }

    fn passthrough(input: Value, success: bool) -> Self {
        Outcome {
            body: input,
            compact: false,
            success,
            counts: None,
        }
    }

    pub fn render(&self) -> serde_json::Result<String> {
        if self.compact {
            serde_json::to_string(&self.body)
        } else {
            serde_json::to_string_pretty(&self.body)
        }
    }
}

/// Run the whole transform over the raw stdin bytes.
pub fn process<L>(raw: &[u8], window_days: u32, today: NaiveDate, lookup: &L) -> Outcome
where
    L: DateLookup + ?Sized,
{
    let input: Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "stdin is not JSON");
            return Outcome::invalid_input();
        }
    };

    let success = input.get("success").is_some_and(truthy);
    let fields = match input {
        Value::Object(fields) => fields,
        other => return Outcome::passthrough(other, success),
    };
    if !success || !fields.get("results").is_some_and(Value::is_array) {
        debug!(success, "passing upstream output through unchanged");
        return Outcome::passthrough(Value::Object(fields), success);
    }

    let results = fields
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let report = filter::resolve(results, window_days, today, lookup);
    let counts = report.cutoff.map(|_| (report.kept.len(), report.removed.len()));
    Outcome {
        body: Value::Object(merge(fields, report)),
        compact: false,
        success: true,
        counts,
    }
}

/// Overlay the computed fields on the input's top-level fields.
fn merge(mut fields: Map<String, Value>, report: ClassificationReport) -> Map<String, Value> {
    fields.insert("filter_days".into(), report.window_days.into());
    let Some(range) = report.date_range() else {
        return fields;
    };
    fields.insert("date_range".into(), range.into());
    fields.insert("total_fetched".into(), report.total.into());
    fields.insert("result_count".into(), report.kept.len().into());
    fields.insert("results".into(), Value::Array(report.kept));
    fields.insert(
        "filtered_out".into(),
        report.removed.iter().map(|r| r.to_json()).collect(),
    );
    fields
}

/// Truthiness of a loosely typed `success` flag.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
