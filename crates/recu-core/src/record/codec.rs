//! Positional JSON shape <-> `TaskRecord`.

use serde_json::{Number, Value};

use super::{Checkpoint, ResumeMarker, TaskRecord, TrimSpec, COMPLETE_TAG};
use crate::error::{MalformedReason, MalformedRecordError};

/// Decodes one task file entry.
pub fn decode(raw: &Value) -> Result<TaskRecord, MalformedRecordError> {
    let fail = |reason| MalformedRecordError::new(raw, reason);

    let items = match raw {
        Value::String(url) => return record(url, None, ResumeMarker::Unset).map_err(fail),
        Value::Array(items) => items,
        _ => return Err(fail(MalformedReason::UrlNotString)),
    };

    let url = match items.first() {
        Some(Value::String(url)) => url.as_str(),
        Some(_) => return Err(fail(MalformedReason::UrlNotString)),
        None => return Err(fail(MalformedReason::BadLength(0))),
    };

    let parsed = match items.len() {
        1 => record(url, None, ResumeMarker::Unset),
        2 => decode_marker(&items[1]).and_then(|m| record(url, None, m)),
        4 => decode_trim(&items[1..4]).and_then(|t| record(url, Some(t), ResumeMarker::Unset)),
        5 => decode_trim(&items[1..4])
            .and_then(|t| decode_marker(&items[4]).and_then(|m| record(url, Some(t), m))),
        n => Err(MalformedReason::BadLength(n)),
    };
    parsed.map_err(fail)
}

/// Writes `checkpoint` into an entry and returns the new entry.
///
/// Entries without a marker slot grow by one element; entries with one have
/// it replaced. A `COMPLETE` entry is returned unchanged.
pub fn encode(raw: &Value, checkpoint: Checkpoint) -> Result<Value, MalformedRecordError> {
    let mut rec = decode(raw)?;
    rec.apply(checkpoint);
    Ok(to_value(&rec))
}

pub(super) fn to_value(rec: &TaskRecord) -> Value {
    let mut items = vec![Value::String(rec.url.clone())];
    if let Some(trim) = &rec.trim {
        items.extend(trim.raw().iter().cloned().map(Value::Number));
    }
    match rec.marker {
        ResumeMarker::Unset => {}
        ResumeMarker::SegmentIndex(n) => items.push(Value::Number(Number::from(n as u64))),
        ResumeMarker::Complete => items.push(Value::String(COMPLETE_TAG.to_string())),
    }
    Value::Array(items)
}

fn record(
    url: &str,
    trim: Option<TrimSpec>,
    marker: ResumeMarker,
) -> Result<TaskRecord, MalformedReason> {
    if url.trim().is_empty() {
        return Err(MalformedReason::EmptyUrl);
    }
    Ok(TaskRecord {
        url: url.to_string(),
        trim,
        marker,
    })
}

fn decode_marker(v: &Value) -> Result<ResumeMarker, MalformedReason> {
    match v {
        Value::String(s) if s == COMPLETE_TAG => Ok(ResumeMarker::Complete),
        Value::Number(n) => segment_index(n)
            .map(ResumeMarker::SegmentIndex)
            .ok_or(MalformedReason::BadMarker),
        _ => Err(MalformedReason::BadMarker),
    }
}

/// Non-negative integer, also accepting integral floats such as `7.0`.
fn segment_index(n: &Number) -> Option<usize> {
    if let Some(u) = n.as_u64() {
        return usize::try_from(u).ok();
    }
    let f = n.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f < usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}

fn decode_trim(values: &[Value]) -> Result<TrimSpec, MalformedReason> {
    let num = |v: &Value| match v {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(MalformedReason::TrimNotNumeric),
    };
    let raw = [num(&values[0])?, num(&values[1])?, num(&values[2])?];
    Ok(TrimSpec::from_numbers(raw)?)
}
