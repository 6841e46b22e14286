//! # Canonical Data Types
//!
//! This module provides the canonical `DataType` enum used across schema
//! definitions, value coercion, and query evaluation.
//!
//! ## Design Principles
//!
//! 1. **Single source of truth**: one DataType enum used everywhere
//! 2. **Metadata-free**: VARCHAR length is accepted by the parser but not
//!    tracked; all character types collapse to `Text`
//! 3. **PostgreSQL spellings**: every SQL name the dialect accepts maps onto
//!    one canonical variant
//!
//! ## Type Mapping
//!
//! | SQL spelling | Canonical type |
//! |--------------|----------------|
//! | `int`, `integer`, `int4`, `smallint` | Int |
//! | `bigint`, `int8` | BigInt |
//! | `serial`, `bigserial`, `serial8` | BigSerial (BigInt + auto-increment) |
//! | `float`, `real`, `double`, `decimal`, `numeric`, `float8` | Float |
//! | `text`, `varchar`, `char`, `character` | Text |
//! | `bool`, `boolean` | Bool |
//! | `timestamp`, `timestamptz`, `datetime` | Timestamp |
//! | `date` | Date |

use eyre::{bail, Result};

/// Canonical column type.
///
/// `BigSerial` behaves as `BigInt` for storage and comparison but implies
/// auto-increment at the schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    BigInt,
    BigSerial,
    Float,
    Text,
    Bool,
    Timestamp,
    Date,
}

impl DataType {
    /// Maps a SQL type spelling (case-insensitive) to its canonical type.
    pub fn from_name(name: &str) -> Result<DataType> {
        let lower = name.to_ascii_lowercase();
        let ty = match lower.as_str() {
            "int" | "integer" | "int4" | "smallint" | "int2" => DataType::Int,
            "bigint" | "int8" => DataType::BigInt,
            "serial" | "bigserial" | "serial8" => DataType::BigSerial,
            "float" | "float4" | "float8" | "real" | "double" | "decimal" | "numeric" => {
                DataType::Float
            }
            "text" | "varchar" | "char" | "character" => DataType::Text,
            "bool" | "boolean" => DataType::Bool,
            "timestamp" | "timestamptz" | "datetime" => DataType::Timestamp,
            "date" => DataType::Date,
            _ => bail!("unknown type name: {}", name),
        };
        Ok(ty)
    }

    /// True for the auto-increment pseudo type.
    pub fn is_serial(self) -> bool {
        matches!(self, DataType::BigSerial)
    }

    /// Canonical lowercase name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::BigInt => "bigint",
            DataType::BigSerial => "bigserial",
            DataType::Float => "float",
            DataType::Text => "text",
            DataType::Bool => "bool",
            DataType::Timestamp => "timestamp",
            DataType::Date => "date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_maps_aliases() {
        assert_eq!(DataType::from_name("INTEGER").unwrap(), DataType::Int);
        assert_eq!(DataType::from_name("int8").unwrap(), DataType::BigInt);
        assert_eq!(DataType::from_name("BIGSERIAL").unwrap(), DataType::BigSerial);
        assert_eq!(DataType::from_name("varchar").unwrap(), DataType::Text);
        assert_eq!(DataType::from_name("numeric").unwrap(), DataType::Float);
        assert_eq!(DataType::from_name("boolean").unwrap(), DataType::Bool);
        assert_eq!(DataType::from_name("timestamptz").unwrap(), DataType::Timestamp);
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert!(DataType::from_name("geometry").is_err());
    }

    #[test]
    fn bigserial_is_serial() {
        assert!(DataType::BigSerial.is_serial());
        assert!(!DataType::BigInt.is_serial());
    }
}
