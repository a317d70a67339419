//! Tantivy schema for the full-text index.
//!
//! Two fields: the document identifier (for deletes and result mapping) and
//! the searchable text itself.

use tantivy::schema::{Field, Schema, INDEXED, STORED, TEXT};

use crate::error::TextError;

/// Schema field handles for efficient access.
#[derive(Debug, Clone)]
pub struct TextSchema {
    schema: Schema,
    /// Catalog document identifier (u64, INDEXED | STORED)
    pub doc_id: Field,
    /// Searchable text content (TEXT)
    pub text: Field,
}

impl TextSchema {
    /// Get the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a TextSchema from an existing Tantivy schema.
    pub fn from_schema(schema: Schema) -> Result<Self, TextError> {
        let doc_id = schema
            .get_field("doc_id")
            .map_err(|_| TextError::SchemaMismatch("missing doc_id field".into()))?;
        let text = schema
            .get_field("text")
            .map_err(|_| TextError::SchemaMismatch("missing text field".into()))?;

        Ok(Self {
            schema,
            doc_id,
            text,
        })
    }
}

/// Build the full-text schema.
pub fn build_text_schema() -> TextSchema {
    let mut schema_builder = Schema::builder();

    // Catalog identifier, indexed for delete-by-term on update
    let doc_id = schema_builder.add_u64_field("doc_id", INDEXED | STORED);

    // Searchable content
    let text = schema_builder.add_text_field("text", TEXT);

    let schema = schema_builder.build();

    TextSchema {
        schema,
        doc_id,
        text,
    }
}
