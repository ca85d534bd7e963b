//! Column descriptors coming from a query result, and the output schema
//! derived from them.

use std::fmt;

/// Metadata of one result column as reported by the source driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Engine-specific type name, e.g. `VARCHAR` or `BIGINT`.
    pub source_type_name: String,
    pub nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: &str, source_type_name: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            source_type_name: source_type_name.to_string(),
            nullable,
        }
    }
}

/// Primitive encodings supported by the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Int32,
    Int64,
    Double,
    ByteArray,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageType::Int32 => "INT32",
            StorageType::Int64 => "INT64",
            StorageType::Double => "DOUBLE",
            StorageType::ByteArray => "BYTE_ARRAY",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Utf8,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Utf8 => f.write_str("UTF8"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingHint {
    Dictionary,
}

impl fmt::Display for EncodingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingHint::Dictionary => f.write_str("DICTIONARY"),
        }
    }
}

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub storage_type: StorageType,
    pub logical_type: Option<LogicalType>,
    pub encoding_hint: Option<EncodingHint>,
    pub nullable: bool,
}

impl FieldSchema {
    pub fn is_dictionary_encoded(&self) -> bool {
        self.encoding_hint == Some(EncodingHint::Dictionary)
    }
}

/// The ordered output schema of one file. Built once, before the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub output_name: String,
    pub fields: Vec<FieldSchema>,
}

impl SchemaDescriptor {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Renders the schema in Parquet's message-type notation.
    pub fn to_message_type(&self) -> String {
        let mut out = format!("message {} {{\n", self.output_name);
        for field in &self.fields {
            let repetition = if field.nullable { "OPTIONAL" } else { "REQUIRED" };
            out.push_str(&format!("  {} {} {}", repetition, field.storage_type, field.name));
            if let Some(logical) = field.logical_type {
                out.push_str(&format!(" ({})", logical));
            }
            out.push_str(";\n");
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SchemaDescriptor {
        SchemaDescriptor {
            output_name: "users".to_string(),
            fields: vec![
                FieldSchema {
                    name: "id".to_string(),
                    storage_type: StorageType::Int64,
                    logical_type: None,
                    encoding_hint: None,
                    nullable: false,
                },
                FieldSchema {
                    name: "name".to_string(),
                    storage_type: StorageType::ByteArray,
                    logical_type: Some(LogicalType::Utf8),
                    encoding_hint: Some(EncodingHint::Dictionary),
                    nullable: true,
                },
            ],
        }
    }

    #[test]
    fn test_message_type_rendering() {
        let expected = "message users {\n  REQUIRED INT64 id;\n  OPTIONAL BYTE_ARRAY name (UTF8);\n}";
        assert_eq!(sample().to_message_type(), expected);
    }

    #[test]
    fn test_field_names_keep_order() {
        let schema = sample();
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(schema.len(), 2);
        assert!(schema.fields[1].is_dictionary_encoded());
        assert!(!schema.fields[0].is_dictionary_encoded());
    }
}
