//! GeoJSON reading/writing
//!
//! Lightweight serde models for the subset of RFC 7946 used here: a
//! FeatureCollection of Point features with scalar properties, plus the
//! legacy `crs` member (GeoJSON 2008) used to tag projected frames.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::structure::{records_to_features, ClusterRecord, LoadOptions, StructureSet};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{Geometry, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// File extensions accepted by the reader and the writer
pub const SUPPORTED_EXTENSIONS: &[&str] = &["geojson", "json"];

const IN_MEMORY: &str = "<memory>";

/// Options for writing merged clusters
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Frame to tag the output with (no reprojection is performed)
    pub crs: CRS,
    /// Indent the JSON document
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            crs: CRS::utm_36n(),
            pretty: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize)]
struct RawCollection {
    #[serde(rename = "type")]
    type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<Value>,

    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawFeature {
    #[serde(rename = "type")]
    type_: String,

    #[serde(default)]
    geometry: Option<RawGeometry>,

    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    type_: String,

    #[serde(default)]
    coordinates: Value,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reject paths whose extension is not a supported GeoJSON extension.
pub fn check_format(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(Error::InputFormat {
            path: path.to_path_buf(),
            reason: format!(
                "'.{}' files are not supported, expected one of: {}",
                ext,
                SUPPORTED_EXTENSIONS.join(", ")
            ),
        }),
        None => Err(Error::InputFormat {
            path: path.to_path_buf(),
            reason: "missing file extension".to_string(),
        }),
    }
}

/// Read a GeoJSON file and convert its Point features into structures.
pub fn read_structures<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<StructureSet> {
    let collection = read_features(path)?;
    StructureSet::from_features(collection, options)
}

/// Read a GeoJSON FeatureCollection from disk.
pub fn read_features<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    check_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    let raw: RawCollection = serde_json::from_reader(reader)?;
    decode_collection(raw, path)
}

/// Parse a GeoJSON FeatureCollection from an in-memory string.
pub fn features_from_str(json: &str) -> Result<FeatureCollection> {
    let raw: RawCollection = serde_json::from_str(json)?;
    decode_collection(raw, Path::new(IN_MEMORY))
}

fn decode_collection(raw: RawCollection, source: &Path) -> Result<FeatureCollection> {
    if raw.type_ != "FeatureCollection" {
        return Err(Error::InputFormat {
            path: source.to_path_buf(),
            reason: format!("expected a FeatureCollection, got '{}'", raw.type_),
        });
    }

    let crs = raw.crs.as_ref().and_then(decode_crs);
    let mut collection = FeatureCollection {
        features: Vec::with_capacity(raw.features.len()),
        crs,
    };

    for (index, feature) in raw.features.into_iter().enumerate() {
        let geometry = match feature.geometry {
            Some(geom) => Some(decode_geometry(geom, index, source)?),
            None => None,
        };
        let properties = feature
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, value_to_attribute(v)))
            .collect();

        collection.push(Feature {
            geometry,
            properties,
        });
    }

    Ok(collection)
}

fn decode_geometry(raw: RawGeometry, index: usize, source: &Path) -> Result<Geometry<f64>> {
    if raw.type_ != "Point" {
        return Err(Error::GeometryType {
            index,
            found: raw.type_,
        });
    }

    // Every position entry must be numeric; altitude is allowed and ignored
    let coords: Option<Vec<f64>> = match &raw.coordinates {
        Value::Array(items) if items.len() >= 2 => items.iter().map(Value::as_f64).collect(),
        _ => None,
    };
    let Some(coords) = coords else {
        return Err(Error::InputFormat {
            path: source.to_path_buf(),
            reason: format!(
                "feature {} has malformed Point coordinates: {}",
                index, raw.coordinates
            ),
        });
    };

    Ok(Geometry::Point(Point::new(coords[0], coords[1])))
}

/// Accepts `"EPSG:32636"` or `{"type": "name", "properties": {"name": ...}}`
fn decode_crs(value: &Value) -> Option<CRS> {
    match value {
        Value::String(name) => Some(CRS::parse(name)),
        Value::Object(obj) => obj
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(CRS::parse),
        _ => None,
    }
}

fn value_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => n.as_f64().map(AttributeValue::Float).unwrap_or_default(),
        },
        Value::String(s) => AttributeValue::String(s),
        Value::Array(items) => {
            AttributeValue::List(items.into_iter().map(value_to_attribute).collect())
        }
        Value::Object(obj) => AttributeValue::String(Value::Object(obj).to_string()),
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write cluster records as Point features, tagged with `options.crs`.
///
/// Missing parent directories are created.
pub fn write_clusters<P: AsRef<Path>>(
    records: &[ClusterRecord],
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let collection = records_to_features(records, Some(options.crs.clone()));
    write_features(&collection, path, options.pretty)
}

/// Write a feature collection to disk as GeoJSON.
pub fn write_features<P: AsRef<Path>>(
    collection: &FeatureCollection,
    path: P,
    pretty: bool,
) -> Result<()> {
    let path = path.as_ref();
    let output_err = |reason: String| Error::Output {
        path: path.to_path_buf(),
        reason,
    };

    check_format(path).map_err(|e| output_err(e.to_string()))?;
    let raw = encode_collection(collection).map_err(|e| output_err(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| output_err(e.to_string()))?;
    }

    let file = File::create(path).map_err(|e| output_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, &raw)
    } else {
        serde_json::to_writer(&mut writer, &raw)
    };
    written.map_err(|e| output_err(e.to_string()))?;
    writer.flush().map_err(|e| output_err(e.to_string()))?;
    Ok(())
}

/// Serialize a feature collection to a GeoJSON string.
pub fn features_to_string(collection: &FeatureCollection, pretty: bool) -> Result<String> {
    let raw = encode_collection(collection)?;
    let json = if pretty {
        serde_json::to_string_pretty(&raw)?
    } else {
        serde_json::to_string(&raw)?
    };
    Ok(json)
}

fn encode_collection(collection: &FeatureCollection) -> Result<RawCollection> {
    let crs = collection.crs.as_ref().map(|crs| {
        serde_json::json!({
            "type": "name",
            "properties": { "name": crs.urn() }
        })
    });

    let features = collection
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let geometry = match &feature.geometry {
                Some(Geometry::Point(p)) => Some(RawGeometry {
                    type_: "Point".to_string(),
                    coordinates: serde_json::json!([p.x(), p.y()]),
                }),
                Some(other) => {
                    return Err(Error::GeometryType {
                        index,
                        found: crate::structure::geometry_type_name(other).to_string(),
                    })
                }
                None => None,
            };
            let properties = feature
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), attribute_to_value(v)))
                .collect();

            Ok(RawFeature {
                type_: "Feature".to_string(),
                geometry,
                properties: Some(properties),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawCollection {
        type_: "FeatureCollection".to_string(),
        crs,
        features,
    })
}

fn attribute_to_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::from(*i),
        AttributeValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AttributeValue::String(s) => Value::String(s.clone()),
        AttributeValue::List(items) => Value::Array(items.iter().map(attribute_to_value).collect()),
    }
}
