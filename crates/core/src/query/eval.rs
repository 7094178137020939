//! In-process evaluation of [`Query`] values over JSON documents.
//!
//! Mirrors what the hosted CMS does with the rendered GROQ closely enough for
//! the queries the dashboard issues: AND-ed filters, multi-key ordering with
//! nulls last, slicing and projection with reference dereferencing.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::model::{Direction, Field, Filter, FilterValue, Query, Selection};

/// Looks up a dotted path (`slug.current`) in a document.
///
/// Returns `None` for missing attributes and explicit nulls alike.
pub fn lookup_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Compares two non-null JSON values.
///
/// Strings that both parse as timestamps compare as instants. Values of
/// different kinds compare by kind so that sorting stays total.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => match (parse_instant(a), parse_instant(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Evaluates a query against a set of documents.
///
/// `resolve` looks up a document by id for `->` dereferences.
pub fn evaluate<R>(query: &Query, docs: &[Value], resolve: R) -> Value
where
    R: Fn(&str) -> Option<Value>,
{
    let mut matched: Vec<&Value> = docs
        .iter()
        .filter(|doc| {
            doc.get("_type").and_then(Value::as_str) == Some(query.document_type.as_str())
        })
        .filter(|doc| query.filters.iter().all(|f| filter_matches(f, doc)))
        .collect();

    // Stable sort keeps insertion order for ties.
    matched.sort_by(|a, b| {
        for order in &query.order {
            let ordering = compare_nulls_last(
                lookup_path(a, &order.field),
                lookup_path(b, &order.field),
                order.direction,
            );
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    let shape = |doc: &Value| -> Value {
        if query.projection.is_empty() {
            doc.clone()
        } else {
            project(doc, &query.projection, &resolve)
        }
    };

    match query.selection {
        Selection::Count => Value::from(matched.len()),
        Selection::First => matched.first().map(|doc| shape(*doc)).unwrap_or(Value::Null),
        Selection::All => Value::Array(matched.into_iter().map(shape).collect()),
        Selection::Slice { start, end } => {
            let len = matched.len();
            let start = start.min(len);
            let end = end.clamp(start, len);
            Value::Array(matched[start..end].iter().map(|doc| shape(*doc)).collect())
        }
    }
}

fn filter_matches(filter: &Filter, doc: &Value) -> bool {
    let (value, expected, accept): (_, _, fn(Ordering) -> bool) = match filter {
        Filter::Eq { field, value } => (lookup_path(doc, field), value, Ordering::is_eq),
        Filter::Gte { field, value } => (lookup_path(doc, field), value, Ordering::is_ge),
        Filter::Lte { field, value } => (lookup_path(doc, field), value, Ordering::is_le),
    };

    let Some(value) = value else {
        return false;
    };

    let ordering = match (value, expected) {
        (Value::String(actual), FilterValue::String(expected)) => actual.as_str().cmp(expected),
        (Value::Bool(actual), FilterValue::Bool(expected)) => actual.cmp(expected),
        (Value::String(actual), FilterValue::DateTime(expected)) => match parse_instant(actual) {
            Some(actual) => actual.cmp(expected),
            None => return false,
        },
        _ => return false,
    };

    accept(ordering)
}

fn compare_nulls_last(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            Direction::Asc => compare_values(a, b),
            Direction::Desc => compare_values(a, b).reverse(),
        },
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Parses an RFC 3339 timestamp or a bare date (taken as midnight UTC).
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn project<R>(doc: &Value, fields: &[Field], resolve: &R) -> Value
where
    R: Fn(&str) -> Option<Value>,
{
    let mut out = Map::new();

    for field in fields {
        let Some(value) = doc.get(field.name()).filter(|v| !v.is_null()) else {
            continue;
        };

        let projected = match field {
            Field::Plain(_) => Some(value.clone()),
            Field::Object { fields, .. } => Some(map_objects(value, |obj| {
                Some(project(obj, fields, resolve))
            })),
            Field::Deref { fields, .. } => {
                let deref = |obj: &Value| -> Option<Value> {
                    match obj.get("_ref").and_then(Value::as_str) {
                        Some(id) => resolve(id).map(|target| project(&target, fields, resolve)),
                        None => Some(project(obj, fields, resolve)),
                    }
                };
                match value {
                    Value::Array(_) => Some(map_objects(value, deref)),
                    _ => deref(value),
                }
            }
        };

        if let Some(projected) = projected {
            out.insert(field.name().to_string(), projected);
        }
    }

    Value::Object(out)
}

/// Applies `f` to an object, or to each object of an array. Other values
/// pass through unchanged.
fn map_objects<F>(value: &Value, f: F) -> Value
where
    F: Fn(&Value) -> Option<Value>,
{
    match value {
        Value::Object(_) => f(value).unwrap_or(Value::Null),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(_) => f(item).unwrap_or(Value::Null),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
