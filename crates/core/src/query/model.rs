use chrono::{DateTime, Utc};

/// A literal a filter compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    String(String),
    Bool(bool),
    /// Compared as an instant, not as text.
    DateTime(DateTime<Utc>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::DateTime(value)
    }
}

/// A predicate on a (dotted) field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { field: String, value: FilterValue },
    Gte { field: String, value: FilterValue },
    Lte { field: String, value: FilterValue },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the field path this filter inspects.
    pub fn field(&self) -> &str {
        match self {
            Filter::Eq { field, .. } | Filter::Gte { field, .. } | Filter::Lte { field, .. } => {
                field
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ordering criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// Which part of the ordered result set is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every matching document.
    All,
    /// The first matching document, or null.
    First,
    /// Documents in `start..end` (end exclusive).
    Slice { start: usize, end: usize },
    /// The number of matching documents.
    Count,
}

/// A projected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Copy the attribute as-is.
    Plain(String),
    /// Project the listed sub-fields of a nested object (or array of objects).
    Object { name: String, fields: Vec<Field> },
    /// Follow a `{ "_ref": id }` reference and project the referenced document.
    Deref { name: String, fields: Vec<Field> },
}

impl Field {
    pub fn plain(name: impl Into<String>) -> Self {
        Field::Plain(name.into())
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Field::Object {
            name: name.into(),
            fields,
        }
    }

    pub fn deref(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Field::Deref {
            name: name.into(),
            fields,
        }
    }

    /// Returns the attribute name this field reads.
    pub fn name(&self) -> &str {
        match self {
            Field::Plain(name) | Field::Object { name, .. } | Field::Deref { name, .. } => name,
        }
    }
}

/// A query over documents of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub document_type: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub selection: Selection,
    /// Empty means the whole document.
    pub projection: Vec<Field>,
}

impl Query {
    /// Starts a query selecting every document of the given type.
    pub fn documents(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            filters: Vec::new(),
            order: Vec::new(),
            selection: Selection::All,
            projection: Vec::new(),
        }
    }

    /// Adds a filter (filters are combined with AND).
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends an ordering criterion.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            field: field.into(),
            direction,
        });
        self
    }

    /// Selects only the first matching document.
    pub fn first(mut self) -> Self {
        self.selection = Selection::First;
        self
    }

    /// Selects `limit` documents starting at `offset`.
    pub fn slice(mut self, offset: usize, limit: usize) -> Self {
        self.selection = Selection::Slice {
            start: offset,
            end: offset.saturating_add(limit),
        };
        self
    }

    /// Counts matching documents instead of returning them.
    pub fn count(mut self) -> Self {
        self.selection = Selection::Count;
        self
    }

    /// Sets the projection.
    pub fn project(mut self, fields: Vec<Field>) -> Self {
        self.projection = fields;
        self
    }
}
