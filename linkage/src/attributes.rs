//! Attribute-pair adapters for persisted figure parts.
//!
//! Each persisted field is declared once as a [`Field`] carrying its name and
//! default. Writing omits a value equal to the default; reading substitutes the
//! default for a missing name. The same rule applies to every locator.

use crate::error::AttrError;
use crate::geometry::limits;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Anything else a document may hold (null, arrays, objects). Never a
    /// valid scalar, so it reads as the default or fails a strict read.
    Other(serde_json::Value),
}

pub type AttributeMap = BTreeMap<String, AttrValue>;

/// Name and declared default of one persisted attribute.
#[derive(Clone, Copy, Debug)]
pub struct Field<T> {
    pub name: &'static str,
    pub default: T,
}

/// Scalar types a [`Field`] may hold.
pub trait AttrScalar: Copy + PartialEq {
    const EXPECTED: &'static str;
    fn to_value(self) -> AttrValue;
    fn from_value(name: &'static str, v: &AttrValue) -> Result<Self, AttrError>;
    /// Whether the value survives a JSON round trip.
    fn persistable(self) -> bool {
        true
    }
}

impl AttrScalar for i32 {
    const EXPECTED: &'static str = "an integer";
    fn to_value(self) -> AttrValue {
        AttrValue::Int(self as i64)
    }
    fn from_value(name: &'static str, v: &AttrValue) -> Result<Self, AttrError> {
        let n = match v {
            AttrValue::Int(n) => *n,
            // integral floats come back from JSON numbers written by other tools
            AttrValue::Float(f) if f.fract() == 0.0 && f.is_finite() => *f as i64,
            _ => return Err(AttrError::WrongType { name, expected: Self::EXPECTED }),
        };
        if !(limits::MIN_LOCATOR_INDEX..=limits::MAX_LOCATOR_INDEX).contains(&n) {
            return Err(AttrError::OutOfBounds { name, got: n as f64 });
        }
        Ok(n as i32)
    }
}

impl AttrScalar for f32 {
    const EXPECTED: &'static str = "a number";
    fn to_value(self) -> AttrValue {
        AttrValue::Float(self as f64)
    }
    fn from_value(name: &'static str, v: &AttrValue) -> Result<Self, AttrError> {
        let f = match v {
            AttrValue::Float(f) => *f as f32,
            AttrValue::Int(n) => *n as f32,
            _ => return Err(AttrError::WrongType { name, expected: Self::EXPECTED }),
        };
        if !limits::in_coord_bounds(f) {
            return Err(AttrError::OutOfBounds { name, got: f as f64 });
        }
        Ok(f)
    }
    fn persistable(self) -> bool {
        self.is_finite()
    }
}

impl AttrScalar for bool {
    const EXPECTED: &'static str = "a boolean";
    fn to_value(self) -> AttrValue {
        AttrValue::Bool(self)
    }
    fn from_value(name: &'static str, v: &AttrValue) -> Result<Self, AttrError> {
        match v {
            AttrValue::Bool(b) => Ok(*b),
            _ => Err(AttrError::WrongType { name, expected: Self::EXPECTED }),
        }
    }
}

impl<T: AttrScalar> Field<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Field { name, default }
    }

    /// Append `value` unless it equals the declared default. Values JSON
    /// cannot hold are left out and read back as the default.
    pub fn write(&self, out: &mut Vec<(String, AttrValue)>, value: T) {
        if value != self.default && value.persistable() {
            out.push((self.name.to_string(), value.to_value()));
        }
    }

    /// Missing reads as the default; a present but malformed value is an error.
    pub fn read_strict(&self, map: &AttributeMap) -> Result<T, AttrError> {
        match map.get(self.name) {
            None => Ok(self.default),
            Some(v) => T::from_value(self.name, v),
        }
    }

    /// Missing or malformed both read as the default.
    pub fn read(&self, map: &AttributeMap) -> T {
        self.read_strict(map).unwrap_or(self.default)
    }
}

pub fn to_map(pairs: Vec<(String, AttrValue)>) -> AttributeMap {
    pairs.into_iter().collect()
}
