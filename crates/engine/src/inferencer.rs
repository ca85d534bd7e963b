//! Maps result column descriptors to output field schemas.
//!
//! The mapping is a flat lookup table matched case-sensitively on the source
//! type name; anything not in the table is stored as dictionary-encoded text.
//!
//! DECIMAL collapses to DOUBLE. Precision and scale are not carried over, so
//! values beyond f64 precision lose digits.

use sluice_common::{
    ColumnDescriptor, EncodingHint, FieldSchema, LogicalType, SchemaDescriptor, StorageType,
};

/// Storage layout chosen for one source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub storage_type: StorageType,
    pub logical_type: Option<LogicalType>,
    pub encoding_hint: Option<EncodingHint>,
}

const INT32: TypeMapping =
    TypeMapping { storage_type: StorageType::Int32, logical_type: None, encoding_hint: None };
const INT64: TypeMapping =
    TypeMapping { storage_type: StorageType::Int64, logical_type: None, encoding_hint: None };
const DOUBLE: TypeMapping =
    TypeMapping { storage_type: StorageType::Double, logical_type: None, encoding_hint: None };
const TEXT: TypeMapping = TypeMapping {
    storage_type: StorageType::ByteArray,
    logical_type: Some(LogicalType::Utf8),
    encoding_hint: None,
};

/// Fallback for every type name missing from [`TYPE_TABLE`].
pub const DEFAULT_MAPPING: TypeMapping = TypeMapping {
    storage_type: StorageType::ByteArray,
    logical_type: Some(LogicalType::Utf8),
    encoding_hint: Some(EncodingHint::Dictionary),
};

/// Source type name to storage layout. First match wins.
pub const TYPE_TABLE: &[(&str, TypeMapping)] = &[
    ("TINYINT", INT32),
    ("INT", INT32),
    ("BIGINT", INT64),
    ("DECIMAL", DOUBLE),
    ("DOUBLE", DOUBLE),
    ("DATE", TEXT),
    ("DATETIME", TEXT),
    ("TIMESTAMP", TEXT),
    ("CHAR", TEXT),
    ("VARCHAR", TEXT),
    ("TEXT", TEXT),
    // Unsigned values that still fit after widening. Wider unsigned types
    // fall through to text so no value is truncated.
    ("UNSIGNED TINYINT", INT32),
    ("UNSIGNED INT", INT64),
];

pub fn lookup(source_type_name: &str) -> TypeMapping {
    TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == source_type_name)
        .map(|(_, mapping)| *mapping)
        .unwrap_or(DEFAULT_MAPPING)
}

pub fn infer_field(column: &ColumnDescriptor) -> FieldSchema {
    let mapping = lookup(&column.source_type_name);
    FieldSchema {
        name: column.name.clone(),
        storage_type: mapping.storage_type,
        logical_type: mapping.logical_type,
        encoding_hint: mapping.encoding_hint,
        nullable: column.nullable,
    }
}

/// Builds the output schema, one field per column, in column order.
///
/// Duplicate column names are passed through unchanged; whether they are
/// acceptable is up to the output sink.
pub fn infer_schema(output_name: &str, columns: &[ColumnDescriptor]) -> SchemaDescriptor {
    SchemaDescriptor {
        output_name: output_name.to_string(),
        fields: columns.iter().map(infer_field).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, type_name: &str, nullable: bool) -> ColumnDescriptor {
        ColumnDescriptor::new(name, type_name, nullable)
    }

    #[test]
    fn test_table_entries() {
        let cases = [
            ("TINYINT", StorageType::Int32, None),
            ("INT", StorageType::Int32, None),
            ("BIGINT", StorageType::Int64, None),
            ("DECIMAL", StorageType::Double, None),
            ("DOUBLE", StorageType::Double, None),
            ("DATE", StorageType::ByteArray, Some(LogicalType::Utf8)),
            ("DATETIME", StorageType::ByteArray, Some(LogicalType::Utf8)),
            ("TIMESTAMP", StorageType::ByteArray, Some(LogicalType::Utf8)),
            ("CHAR", StorageType::ByteArray, Some(LogicalType::Utf8)),
            ("VARCHAR", StorageType::ByteArray, Some(LogicalType::Utf8)),
            ("TEXT", StorageType::ByteArray, Some(LogicalType::Utf8)),
        ];
        for (type_name, storage, logical) in cases {
            let mapping = lookup(type_name);
            assert_eq!(mapping.storage_type, storage, "storage type for {}", type_name);
            assert_eq!(mapping.logical_type, logical, "logical type for {}", type_name);
            assert_eq!(mapping.encoding_hint, None, "encoding hint for {}", type_name);
        }
    }

    #[test]
    fn test_unknown_types_use_default() {
        for type_name in ["JSON", "SMALLINT", "FLOAT", "BLOB", "ENUM", "", "UNSIGNED BIGINT"] {
            assert_eq!(lookup(type_name), DEFAULT_MAPPING, "mapping for {:?}", type_name);
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(lookup("varchar"), DEFAULT_MAPPING);
        assert_eq!(lookup("Int"), DEFAULT_MAPPING);
    }

    #[test]
    fn test_unsigned_policy() {
        assert_eq!(lookup("UNSIGNED TINYINT").storage_type, StorageType::Int32);
        assert_eq!(lookup("UNSIGNED INT").storage_type, StorageType::Int64);
        assert_eq!(lookup("UNSIGNED BIGINT").storage_type, StorageType::ByteArray);
    }

    #[test]
    fn test_nullability_is_copied() {
        assert!(infer_field(&column("a", "INT", true)).nullable);
        assert!(!infer_field(&column("a", "INT", false)).nullable);
    }

    #[test]
    fn test_schema_preserves_order_and_duplicates() {
        let columns = vec![
            column("b", "VARCHAR", true),
            column("a", "BIGINT", false),
            column("b", "GEOMETRY", true),
        ];
        let schema = infer_schema("out", &columns);

        assert_eq!(schema.output_name, "out");
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["b", "a", "b"]);
        assert!(schema.fields[2].is_dictionary_encoded());
    }

    #[test]
    fn test_empty_columns_give_empty_schema() {
        let schema = infer_schema("empty", &[]);
        assert!(schema.is_empty());
    }
}
