//! Integer deserialization that tolerates integral floats.
//!
//! JSON producers frequently write `50.0` where `50` is meant. The validator
//! accepts any number without a fractional part, so typed deserialization
//! must too or a validated document could fail to narrow.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};

struct IntegralVisitor;

impl<'de> Visitor<'de> for IntegralVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= 0.0 && v <= u64::MAX as f64 {
            Ok(v as u64)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }
}

/// Deserialize a non-negative integer, accepting `1.0`-style floats.
pub(crate) fn deserialize_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    deserializer.deserialize_any(IntegralVisitor)
}

/// Same as [`deserialize_u64`], narrowed to `u32`.
pub(crate) fn deserialize_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = deserialize_u64(deserializer)?;
    u32::try_from(v).map_err(|_| de::Error::custom(format!("{v} does not fit in u32")))
}
