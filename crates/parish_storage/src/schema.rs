//! Table and column descriptors for the relational backend.
//!
//! The engine describes each entity kind as a [`TableSpec`] so that the
//! relational backend can create tables and bind parameters without
//! knowing any entity type. Descriptors are `const`-constructible and
//! live in static tables.

/// Storage type of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 text (also used for ISO-8601 dates and times).
    Text,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Real,
    /// Boolean, stored as 0/1.
    Bool,
}

/// Description of one kind-specific column.
///
/// The implicit columns `id`, `created_at`, and `updated_at` are part of
/// every table and are not listed in a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Wire-format field name, also used as the column name.
    pub name: &'static str,
    /// Storage type.
    pub ty: ColumnType,
    /// Whether the field is always present in the wire map.
    pub required: bool,
}

impl ColumnSpec {
    /// Creates a column descriptor.
    #[must_use]
    pub const fn new(name: &'static str, ty: ColumnType, required: bool) -> Self {
        Self { name, ty, required }
    }

    /// A required text column.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text, true)
    }

    /// An optional text column.
    #[must_use]
    pub const fn opt_text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text, false)
    }

    /// A required float column.
    #[must_use]
    pub const fn real(name: &'static str) -> Self {
        Self::new(name, ColumnType::Real, true)
    }

    /// A required boolean column.
    #[must_use]
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, ColumnType::Bool, true)
    }
}

/// Description of the table backing one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Kind tag as it appears in store keys and `type_tag` fields.
    pub kind: &'static str,
    /// Table name in the relational schema.
    pub table: &'static str,
    /// Kind-specific columns beyond id and timestamps.
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    /// Creates a table descriptor.
    #[must_use]
    pub const fn new(
        kind: &'static str,
        table: &'static str,
        columns: &'static [ColumnSpec],
    ) -> Self {
        Self {
            kind,
            table,
            columns,
        }
    }
}
