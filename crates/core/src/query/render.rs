//! Rendering of [`Query`] values to GROQ, the query language of the hosted CMS.

use chrono::SecondsFormat;

use super::model::{Direction, Field, Filter, FilterValue, Query, Selection};

/// Renders a query to a GROQ string.
///
/// # Examples
///
/// ```
/// use blogdash_core::query::{render_groq, Direction, Field, Filter, Query};
///
/// let query = Query::documents("post")
///     .filter(Filter::eq("status", "draft"))
///     .order_by("_updatedAt", Direction::Desc)
///     .project(vec![Field::plain("_id"), Field::plain("title")]);
///
/// assert_eq!(
///     render_groq(&query),
///     r#"*[_type == "post" && status == "draft"] | order(_updatedAt desc) { _id, title }"#
/// );
/// ```
pub fn render_groq(query: &Query) -> String {
    let mut conditions = vec![format!("_type == {}", string_literal(&query.document_type))];
    conditions.extend(query.filters.iter().map(render_filter));
    let base = format!("*[{}]", conditions.join(" && "));

    if query.selection == Selection::Count {
        return format!("count({})", base);
    }

    let mut out = base;

    if !query.order.is_empty() {
        let orders: Vec<String> = query
            .order
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Asc => "asc",
                    Direction::Desc => "desc",
                };
                format!("{} {}", o.field, dir)
            })
            .collect();
        out.push_str(&format!(" | order({})", orders.join(", ")));
    }

    match query.selection {
        Selection::First => out.push_str("[0]"),
        Selection::Slice { start, end } => out.push_str(&format!("[{}...{}]", start, end)),
        Selection::All | Selection::Count => {}
    }

    if !query.projection.is_empty() {
        out.push(' ');
        out.push_str(&render_projection(&query.projection));
    }

    out
}

fn render_filter(filter: &Filter) -> String {
    let (field, op, value) = match filter {
        Filter::Eq { field, value } => (field, "==", value),
        Filter::Gte { field, value } => (field, ">=", value),
        Filter::Lte { field, value } => (field, "<=", value),
    };

    match value {
        FilterValue::String(s) => format!("{} {} {}", field, op, string_literal(s)),
        FilterValue::Bool(b) => format!("{} {} {}", field, op, b),
        FilterValue::DateTime(dt) => format!(
            "dateTime({}) {} dateTime({})",
            field,
            op,
            string_literal(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        ),
    }
}

fn render_projection(fields: &[Field]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|field| match field {
            Field::Plain(name) => name.clone(),
            Field::Object { name, fields } => format!("{} {}", name, render_projection(fields)),
            Field::Deref { name, fields } => format!("{}->{}", name, render_projection(fields)),
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

/// GROQ string literals share JSON's escaping rules.
fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
