//! Field descriptors and name normalization.
//!
//! A schema is the typed accessor table for one document type: every field
//! a document may touch is declared up front, mapping its caller-facing
//! logical name to the name it is persisted under. Lookups at operation
//! time are plain map hits; nothing is resolved reflectively per call.

use crate::error::{Result, StoreError};
use std::collections::HashMap;

/// What shape a field's value takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Single value.
    Scalar,
    /// Array of values; the target of pull operations.
    Array,
}

/// Declaration of a single field.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Caller-facing name.
    pub name: String,
    /// Name the field is persisted under.
    pub db_name: String,
    /// Value shape.
    pub kind: FieldKind,
}

/// Field table for one document type, built once at definition time.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    /// Indexes into `fields`, keyed by both logical and db name.
    by_name: HashMap<String, usize>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { schema: Schema::default() }
    }

    /// Translate a logical (or already-persisted) field name into the name
    /// the store persists it under.
    ///
    /// Names absent from the schema are rejected before any mutation or
    /// network attempt is made.
    pub fn database_field_name(&self, name: &str) -> Result<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.fields[i].db_name.as_str())
            .ok_or_else(|| StoreError::UnknownField(name.to_string()))
    }

    /// Look up the descriptor for a field by either name.
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Escape/validate a persisted field name for use as a wire-level update key.
///
/// The wire format reserves `.` as the positional path separator and `$` as
/// the operator prefix, so neither may appear in a raw field name.
pub fn atomic_attribute_name(db_name: &str) -> Result<String> {
    if db_name.is_empty() || db_name.starts_with('$') || db_name.contains('.') {
        return Err(StoreError::InvalidFieldName(db_name.to_string()));
    }
    Ok(db_name.to_string())
}

/// Builder for [`Schema`].
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare an array field persisted under its logical name.
    pub fn array(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let db_name = name.clone();
        self.field(name, db_name, FieldKind::Array)
    }

    /// Declare an array field persisted under a different name.
    pub fn array_as(self, name: impl Into<String>, db_name: impl Into<String>) -> Self {
        self.field(name.into(), db_name.into(), FieldKind::Array)
    }

    /// Declare a scalar field persisted under its logical name.
    pub fn scalar(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let db_name = name.clone();
        self.field(name, db_name, FieldKind::Scalar)
    }

    fn field(mut self, name: String, db_name: String, kind: FieldKind) -> Self {
        let idx = self.schema.fields.len();
        self.schema.by_name.insert(name.clone(), idx);
        self.schema.by_name.insert(db_name.clone(), idx);
        self.schema.fields.push(FieldDescriptor { name, db_name, kind });
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        self.schema
    }
}
