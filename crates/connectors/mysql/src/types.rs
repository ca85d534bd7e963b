//! Naming of MySQL result columns and rendering of their values.

use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Value};
use sluice_common::ColumnDescriptor;

/// Collation id MySQL reports for binary strings.
pub const BINARY_COLLATION_ID: u16 = 63;

/// SQL type name of a result column, as MySQL's own clients print it.
///
/// Integer columns carrying the unsigned flag are prefixed with `UNSIGNED `.
pub fn type_name(column_type: ColumnType, flags: ColumnFlags, charset: u16) -> &'static str {
    let binary = charset == BINARY_COLLATION_ID;
    let unsigned = flags.contains(ColumnFlags::UNSIGNED_FLAG);
    match column_type {
        ColumnType::MYSQL_TYPE_TINY if unsigned => "UNSIGNED TINYINT",
        ColumnType::MYSQL_TYPE_TINY => "TINYINT",
        ColumnType::MYSQL_TYPE_SHORT if unsigned => "UNSIGNED SMALLINT",
        ColumnType::MYSQL_TYPE_SHORT => "SMALLINT",
        ColumnType::MYSQL_TYPE_INT24 if unsigned => "UNSIGNED MEDIUMINT",
        ColumnType::MYSQL_TYPE_INT24 => "MEDIUMINT",
        ColumnType::MYSQL_TYPE_LONG if unsigned => "UNSIGNED INT",
        ColumnType::MYSQL_TYPE_LONG => "INT",
        ColumnType::MYSQL_TYPE_LONGLONG if unsigned => "UNSIGNED BIGINT",
        ColumnType::MYSQL_TYPE_LONGLONG => "BIGINT",
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => "DECIMAL",
        ColumnType::MYSQL_TYPE_FLOAT => "FLOAT",
        ColumnType::MYSQL_TYPE_DOUBLE => "DOUBLE",
        ColumnType::MYSQL_TYPE_BIT => "BIT",
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => "DATE",
        ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_DATETIME2 => "DATETIME",
        ColumnType::MYSQL_TYPE_TIMESTAMP | ColumnType::MYSQL_TYPE_TIMESTAMP2 => "TIMESTAMP",
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => "TIME",
        ColumnType::MYSQL_TYPE_YEAR => "YEAR",
        ColumnType::MYSQL_TYPE_JSON => "JSON",
        ColumnType::MYSQL_TYPE_ENUM => "ENUM",
        ColumnType::MYSQL_TYPE_SET => "SET",
        ColumnType::MYSQL_TYPE_GEOMETRY => "GEOMETRY",
        ColumnType::MYSQL_TYPE_NULL => "NULL",
        // ENUM and SET values arrive as fixed strings tagged by flag.
        ColumnType::MYSQL_TYPE_STRING if flags.contains(ColumnFlags::ENUM_FLAG) => "ENUM",
        ColumnType::MYSQL_TYPE_STRING if flags.contains(ColumnFlags::SET_FLAG) => "SET",
        ColumnType::MYSQL_TYPE_STRING if binary => "BINARY",
        ColumnType::MYSQL_TYPE_STRING => "CHAR",
        ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING if binary => "VARBINARY",
        ColumnType::MYSQL_TYPE_VARCHAR | ColumnType::MYSQL_TYPE_VAR_STRING => "VARCHAR",
        ColumnType::MYSQL_TYPE_TINY_BLOB if binary => "TINYBLOB",
        ColumnType::MYSQL_TYPE_TINY_BLOB => "TINYTEXT",
        ColumnType::MYSQL_TYPE_MEDIUM_BLOB if binary => "MEDIUMBLOB",
        ColumnType::MYSQL_TYPE_MEDIUM_BLOB => "MEDIUMTEXT",
        ColumnType::MYSQL_TYPE_LONG_BLOB if binary => "LONGBLOB",
        ColumnType::MYSQL_TYPE_LONG_BLOB => "LONGTEXT",
        ColumnType::MYSQL_TYPE_BLOB if binary => "BLOB",
        ColumnType::MYSQL_TYPE_BLOB => "TEXT",
        _ => "UNKNOWN",
    }
}

pub fn describe_column(column: &Column) -> ColumnDescriptor {
    let flags = column.flags();
    ColumnDescriptor {
        name: column.name_str().into_owned(),
        source_type_name: type_name(column.column_type(), flags, column.character_set()).to_string(),
        nullable: !flags.contains(ColumnFlags::NOT_NULL_FLAG),
    }
}

/// Textual bytes of a cell, `None` for SQL NULL.
///
/// The text protocol only ever yields `NULL` or `Bytes`; the other variants
/// are rendered the way the server would print them.
pub fn render_value(value: &Value) -> Option<Vec<u8>> {
    let text = match value {
        Value::NULL => return None,
        Value::Bytes(bytes) => return Some(bytes.clone()),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Date(year, month, day, 0, 0, 0, 0) => format!("{:04}-{:02}-{:02}", year, month, day),
        Value::Date(year, month, day, hour, minute, second, 0) => {
            format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", year, month, day, hour, minute, second)
        }
        Value::Date(year, month, day, hour, minute, second, micros) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
            year, month, day, hour, minute, second, micros
        ),
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = *days * 24 + u32::from(*hours);
            if *micros == 0 {
                format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
            } else {
                format!("{}{:02}:{:02}:{:02}.{:06}", sign, hours, minutes, seconds, micros)
            }
        }
    };
    Some(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF8MB4: u16 = 45;

    #[test]
    fn test_integer_names() {
        let none = ColumnFlags::empty();
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_TINY, none, BINARY_COLLATION_ID), "TINYINT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_LONG, none, BINARY_COLLATION_ID), "INT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_LONGLONG, none, BINARY_COLLATION_ID), "BIGINT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_INT24, none, BINARY_COLLATION_ID), "MEDIUMINT");
    }

    #[test]
    fn test_unsigned_prefix() {
        let unsigned = ColumnFlags::UNSIGNED_FLAG | ColumnFlags::NOT_NULL_FLAG;
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_TINY, unsigned, BINARY_COLLATION_ID), "UNSIGNED TINYINT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_LONG, unsigned, BINARY_COLLATION_ID), "UNSIGNED INT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_LONGLONG, unsigned, BINARY_COLLATION_ID), "UNSIGNED BIGINT");
        // The flag only matters for integers.
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_DOUBLE, unsigned, BINARY_COLLATION_ID), "DOUBLE");
    }

    #[test]
    fn test_strings_depend_on_charset() {
        let none = ColumnFlags::empty();
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_VAR_STRING, none, UTF8MB4), "VARCHAR");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_VAR_STRING, none, BINARY_COLLATION_ID), "VARBINARY");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_STRING, none, UTF8MB4), "CHAR");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_STRING, none, BINARY_COLLATION_ID), "BINARY");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_BLOB, none, UTF8MB4), "TEXT");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_BLOB, none, BINARY_COLLATION_ID), "BLOB");
    }

    #[test]
    fn test_enum_and_set_flags() {
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_STRING, ColumnFlags::ENUM_FLAG, UTF8MB4), "ENUM");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_STRING, ColumnFlags::SET_FLAG, UTF8MB4), "SET");
    }

    #[test]
    fn test_temporal_and_decimal_names() {
        let none = ColumnFlags::empty();
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_NEWDECIMAL, none, BINARY_COLLATION_ID), "DECIMAL");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_DATE, none, BINARY_COLLATION_ID), "DATE");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_DATETIME, none, BINARY_COLLATION_ID), "DATETIME");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_TIMESTAMP, none, BINARY_COLLATION_ID), "TIMESTAMP");
        assert_eq!(type_name(ColumnType::MYSQL_TYPE_TIME, none, BINARY_COLLATION_ID), "TIME");
    }

    #[test]
    fn test_render_text_protocol_values() {
        assert_eq!(render_value(&Value::NULL), None);
        assert_eq!(render_value(&Value::Bytes(b"Ann".to_vec())), Some(b"Ann".to_vec()));
        assert_eq!(render_value(&Value::Bytes(Vec::new())), Some(Vec::new()));
    }

    #[test]
    fn test_render_binary_values() {
        assert_eq!(render_value(&Value::Int(-5)), Some(b"-5".to_vec()));
        assert_eq!(render_value(&Value::UInt(7)), Some(b"7".to_vec()));
        assert_eq!(render_value(&Value::Date(2024, 2, 9, 0, 0, 0, 0)), Some(b"2024-02-09".to_vec()));
        assert_eq!(
            render_value(&Value::Date(2024, 2, 9, 13, 5, 0, 0)),
            Some(b"2024-02-09 13:05:00".to_vec())
        );
        assert_eq!(
            render_value(&Value::Date(2024, 2, 9, 13, 5, 0, 120)),
            Some(b"2024-02-09 13:05:00.000120".to_vec())
        );
        assert_eq!(render_value(&Value::Time(true, 1, 2, 3, 4, 0)), Some(b"-26:03:04".to_vec()));
    }
}
