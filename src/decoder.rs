//! Streaming decoder for REST query responses.
//!
//! Decodes the response body in a single pass straight from a reader, never
//! holding the whole document in memory:
//!
//! ```json
//! {"code":0,"column_meta":[["ts","TIMESTAMP",8],["v","INT",4]],"data":[["2023-06-01T12:00:00.000+0800",1]],"rows":1}
//! ```
//!
//! Top-level keys may come in any order and unknown keys are skipped, with one
//! exception: `column_meta` must precede `data`. Cells are decoded by their
//! column's type as they are read, so a `data` key that arrives before any
//! `column_meta` is rejected instead of buffered.

use std::fmt;
use std::io::{BufReader, Read};

use chrono::{DateTime, FixedOffset};
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::TaosResult;
use crate::result::QueryResult;
use crate::types::ColumnType;
use crate::value::Value;

/// Read buffer used when the caller passes no hint.
pub const DEFAULT_BUFFER_SIZE: usize = 4 << 10;

/// Wire timestamp layout, e.g. `2023-06-01T12:00:00.123456789+0800`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Decode a response body from `reader`.
///
/// `buffer_size` sizes the read buffer; `0` selects [`DEFAULT_BUFFER_SIZE`].
/// Any error discards everything decoded so far.
pub fn decode_response<R: Read>(reader: R, buffer_size: usize) -> TaosResult<QueryResult> {
    let capacity = if buffer_size == 0 {
        DEFAULT_BUFFER_SIZE
    } else {
        buffer_size
    };
    let mut de = serde_json::Deserializer::from_reader(BufReader::with_capacity(capacity, reader));
    let result = QueryResult::deserialize(&mut de)?;
    de.end()?;
    Ok(result)
}

/// Decode a response body that is already in memory.
pub fn decode_slice(body: &[u8]) -> TaosResult<QueryResult> {
    Ok(serde_json::from_slice(body)?)
}

/// Parse a wire timestamp.
///
/// Accepts the `+hhmm` layout first and falls back to RFC 3339 (`+hh:mm` or `Z`).
/// A missing zone offset is an error.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|e| DateTime::parse_from_rfc3339(raw).map_err(|_| e))
}

// ============================================================================
// Top-level object
// ============================================================================

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "snake_case")]
enum Field {
    Code,
    Desc,
    ColumnMeta,
    Data,
    Rows,
    #[serde(other)]
    Other,
}

impl<'de> Deserialize<'de> for QueryResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResponseVisitor)
    }
}

struct ResponseVisitor;

impl<'de> Visitor<'de> for ResponseVisitor {
    type Value = QueryResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a REST query response object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<QueryResult, A::Error> {
        let mut result = QueryResult::default();
        let mut seen_meta = false;

        while let Some(field) = map.next_key::<Field>()? {
            match field {
                Field::Code => result.code = map.next_value()?,
                Field::Desc => result.desc = map.next_value::<Option<String>>()?.unwrap_or_default(),
                Field::ColumnMeta => {
                    for meta in map.next_value::<Vec<ColumnMeta>>()? {
                        result.column_names.push(meta.name);
                        result.column_types.push(meta.ty);
                        result.column_lengths.push(meta.length);
                    }
                    seen_meta = true;
                }
                Field::Data => {
                    if !seen_meta {
                        return Err(de::Error::custom("data arrived before column_meta"));
                    }
                    map.next_value_seed(DataSeed {
                        types: &result.column_types,
                        rows: &mut result.data,
                    })?;
                }
                Field::Rows => result.rows = map.next_value()?,
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(result)
    }
}

// ============================================================================
// column_meta
// ============================================================================

/// One `[name, type_name, length]` entry.
struct ColumnMeta {
    name: String,
    ty: ColumnType,
    length: i64,
}

impl<'de> Deserialize<'de> for ColumnMeta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ColumnMetaVisitor)
    }
}

struct ColumnMetaVisitor;

impl<'de> Visitor<'de> for ColumnMetaVisitor {
    type Value = ColumnMeta;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a [name, type, length] column description")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ColumnMeta, A::Error> {
        let name: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let type_name: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let ty = ColumnType::from_name(&type_name).ok_or_else(|| {
            de::Error::custom(format_args!("unsupported type in column_meta: {type_name:?}"))
        })?;
        let length: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        Ok(ColumnMeta { name, ty, length })
    }
}

// ============================================================================
// data
// ============================================================================

/// Appends every row of the `data` array to `rows`.
struct DataSeed<'a> {
    types: &'a [ColumnType],
    rows: &'a mut Vec<Vec<Value>>,
}

impl<'de> DeserializeSeed<'de> for DataSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for DataSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of rows")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(row) = seq.next_element_seed(RowSeed { types: self.types })? {
            self.rows.push(row);
        }
        Ok(())
    }
}

struct RowSeed<'a> {
    types: &'a [ColumnType],
}

impl<'de> DeserializeSeed<'de> for RowSeed<'_> {
    type Value = Vec<Value>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<Value>, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for RowSeed<'_> {
    type Value = Vec<Value>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a row of {} cells", self.types.len())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<Value>, A::Error> {
        let mut row = Vec::with_capacity(self.types.len());
        for (i, &ty) in self.types.iter().enumerate() {
            match seq.next_element_seed(CellSeed(ty))? {
                Some(cell) => row.push(cell),
                None => return Err(de::Error::invalid_length(i, &self)),
            }
        }
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(format_args!(
                "row has more than {} cells",
                self.types.len()
            )));
        }
        Ok(row)
    }
}

// ============================================================================
// Cells
// ============================================================================

/// Decodes one cell according to its column type.
struct CellSeed(ColumnType);

impl<'de> DeserializeSeed<'de> for CellSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        match self.0 {
            // Raw capture, including a literal `null`.
            ColumnType::Json => decode_typed(ColumnType::Json, deserializer),
            ty => deserializer.deserialize_option(CellVisitor(ty)),
        }
    }
}

struct CellVisitor(ColumnType);

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} value or null", self.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        decode_typed(self.0, deserializer)
    }
}

/// `true`/`false`, or an integer where non-zero is true.
struct BoolVisitor;

impl Visitor<'_> for BoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean or an integer")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }
}

fn decode_typed<'de, D: Deserializer<'de>>(ty: ColumnType, d: D) -> Result<Value, D::Error> {
    let value = match ty {
        ColumnType::Null | ColumnType::VarBinary | ColumnType::Geometry => {
            IgnoredAny::deserialize(d)?;
            Value::Null
        }
        ColumnType::Bool => Value::Bool(d.deserialize_any(BoolVisitor)?),
        ColumnType::TinyInt => Value::TinyInt(i8::deserialize(d)?),
        ColumnType::SmallInt => Value::SmallInt(i16::deserialize(d)?),
        ColumnType::Int => Value::Int(i32::deserialize(d)?),
        ColumnType::BigInt => Value::BigInt(i64::deserialize(d)?),
        ColumnType::UTinyInt => Value::UTinyInt(u8::deserialize(d)?),
        ColumnType::USmallInt => Value::USmallInt(u16::deserialize(d)?),
        ColumnType::UInt => Value::UInt(u32::deserialize(d)?),
        ColumnType::UBigInt => Value::UBigInt(u64::deserialize(d)?),
        ColumnType::Float => Value::Float(f32::deserialize(d)?),
        ColumnType::Double => Value::Double(f64::deserialize(d)?),
        ColumnType::Binary => Value::Binary(String::deserialize(d)?),
        ColumnType::NChar => Value::NChar(String::deserialize(d)?),
        ColumnType::Timestamp => {
            let raw = String::deserialize(d)?;
            let ts = parse_timestamp(&raw)
                .map_err(|e| de::Error::custom(format_args!("parse time {raw:?}: {e}")))?;
            Value::Timestamp(ts)
        }
        ColumnType::Json => {
            let raw = Box::<RawValue>::deserialize(d)?;
            Value::Json(raw.get().as_bytes().to_vec())
        }
    };
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================
