//! Media Type Module
//!
//! Structured media types with the wildcard compatibility rules used for
//! content negotiation. A media type serializes as a map with `type`,
//! `subtype`, and `parameters` fields; decoding fails if any of the three
//! is missing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Wildcard token for types and subtypes.
pub const WILDCARD: &str = "*";

// == Media Type ==
/// A structured media type: type, subtype, and optional parameters.
///
/// Parameter order is irrelevant; two media types with the same type,
/// subtype, and parameter set compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    /// Primary type, e.g. "text"
    #[serde(rename = "type")]
    pub type_: String,
    /// Subtype, e.g. "html"
    pub subtype: String,
    /// Media type parameters, e.g. charset
    pub parameters: BTreeMap<String, String>,
}

impl MediaType {
    // == Constructor ==
    /// Creates a media type with no parameters.
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// Creates the full wildcard media type `*/*`.
    pub fn wildcard() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Adds a parameter, consuming and returning self for chaining.
    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns true if the primary type is the wildcard.
    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    /// Returns true if the subtype is the wildcard.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD
    }

    // == Compatibility ==
    /// Checks whether this media type is compatible with another.
    ///
    /// Standard content-negotiation matching: a wildcard on either side
    /// matches anything at that position, otherwise types and subtypes
    /// must match ASCII case-insensitively. Parameters are ignored.
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        let type_matches = self.is_wildcard_type()
            || other.is_wildcard_type()
            || self.type_.eq_ignore_ascii_case(&other.type_);
        let subtype_matches = self.is_wildcard_subtype()
            || other.is_wildcard_subtype()
            || self.subtype.eq_ignore_ascii_case(&other.subtype);

        type_matches && subtype_matches
    }
}

// == String Form ==
/// Canonical string form: `type/subtype` followed by `;key=value` for each
/// parameter. This form is embedded in entry keys, so it must be
/// deterministic for a given media type.
impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (key, value) in &self.parameters {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = CacheError;

    /// Parses a media type string such as `text/html; charset=utf-8`.
    fn from_str(s: &str) -> Result<Self> {
        let mut segments = s.split(';');

        let full_type = segments
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CacheError::InvalidMediaType(s.to_string()))?;

        let (type_, subtype) = full_type
            .split_once('/')
            .ok_or_else(|| CacheError::InvalidMediaType(s.to_string()))?;
        if type_.is_empty() || subtype.is_empty() {
            return Err(CacheError::InvalidMediaType(s.to_string()));
        }

        let mut parameters = BTreeMap::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| CacheError::InvalidMediaType(s.to_string()))?;
            parameters.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self {
            type_: type_.trim().to_string(),
            subtype: subtype.trim().to_string(),
            parameters,
        })
    }
}
