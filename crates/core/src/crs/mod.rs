//! Coordinate Reference System tagging
//!
//! Structura never reprojects. A [`CRS`] only records which frame the
//! coordinates are expressed in, so the writer can tag its output and the
//! CLI can report it. Distances are computed in whatever linear unit the
//! input frame uses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// Name as it appeared in the source document, if not an EPSG code
    name: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            name: None,
        }
    }

    /// Parse a CRS name as found in a GeoJSON `crs` member.
    ///
    /// Recognizes `EPSG:<code>` and `urn:ogc:def:crs:EPSG:<version>:<code>`.
    /// Anything else is kept verbatim as an opaque name.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        let upper = trimmed.to_ascii_uppercase();

        let code = if let Some(rest) = upper.strip_prefix("EPSG:") {
            rest.parse::<u32>().ok()
        } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            upper.rsplit(':').next().and_then(|c| c.parse::<u32>().ok())
        } else {
            None
        };

        match code {
            Some(code) => Self::from_epsg(code),
            None => Self {
                epsg: None,
                name: Some(trimmed.to_string()),
            },
        }
    }

    /// WGS 84 / UTM zone 36N (EPSG:32636), the frame merged outputs are tagged with by default
    pub fn utm_36n() -> Self {
        Self::from_epsg(32636)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// OGC URN used in the legacy GeoJSON `crs` member
    pub fn urn(&self) -> String {
        match (self.epsg, &self.name) {
            (Some(code), _) => format!("urn:ogc:def:crs:EPSG::{}", code),
            (None, Some(name)) => name.clone(),
            (None, None) => "unknown".to_string(),
        }
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.name, &other.name) {
            return a.eq_ignore_ascii_case(b);
        }
        false
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(name) = &self.name {
            return name.clone();
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::utm_36n()
    }
}
