//! Column type tags and the protocol name table.
//!
//! The REST endpoint announces each column as `[name, type_name, length]`.
//! `type_name` is resolved here once per response; the tag then selects the
//! decode rule for every cell of that column.

use std::fmt;

/// Column type announced in `column_meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Null,
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    UTinyInt,
    USmallInt,
    UInt,
    UBigInt,
    Float,
    Double,
    /// Fixed-length byte text (`BINARY` / `VARCHAR`).
    Binary,
    /// Variable-length wide text.
    NChar,
    Timestamp,
    /// JSON tag column; cells are kept as raw JSON bytes.
    Json,
    /// Announced by newer servers; no decode rule, cells become null.
    VarBinary,
    /// Announced by newer servers; no decode rule, cells become null.
    Geometry,
}

impl ColumnType {
    /// Resolve a protocol type name. Returns `None` for names the driver does not know.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "NULL" => Self::Null,
            "BOOL" => Self::Bool,
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "INT" => Self::Int,
            "BIGINT" => Self::BigInt,
            "TINYINT UNSIGNED" => Self::UTinyInt,
            "SMALLINT UNSIGNED" => Self::USmallInt,
            "INT UNSIGNED" => Self::UInt,
            "BIGINT UNSIGNED" => Self::UBigInt,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "BINARY" | "VARCHAR" => Self::Binary,
            "NCHAR" => Self::NChar,
            "TIMESTAMP" => Self::Timestamp,
            "JSON" => Self::Json,
            "VARBINARY" => Self::VarBinary,
            "GEOMETRY" => Self::Geometry,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical protocol name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool => "BOOL",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::UTinyInt => "TINYINT UNSIGNED",
            Self::USmallInt => "SMALLINT UNSIGNED",
            Self::UInt => "INT UNSIGNED",
            Self::UBigInt => "BIGINT UNSIGNED",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Binary => "VARCHAR",
            Self::NChar => "NCHAR",
            Self::Timestamp => "TIMESTAMP",
            Self::Json => "JSON",
            Self::VarBinary => "VARBINARY",
            Self::Geometry => "GEOMETRY",
        }
    }

    /// Numeric type code used by the native protocol.
    pub fn code(self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool => 1,
            Self::TinyInt => 2,
            Self::SmallInt => 3,
            Self::Int => 4,
            Self::BigInt => 5,
            Self::Float => 6,
            Self::Double => 7,
            Self::Binary => 8,
            Self::Timestamp => 9,
            Self::NChar => 10,
            Self::UTinyInt => 11,
            Self::USmallInt => 12,
            Self::UInt => 13,
            Self::UBigInt => 14,
            Self::Json => 15,
            Self::VarBinary => 16,
            Self::Geometry => 20,
        }
    }

    /// True if cells of this type are decoded rather than skipped.
    pub fn is_decodable(self) -> bool {
        !matches!(self, Self::VarBinary | Self::Geometry)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
