//! Structures (input points) and cluster records (merged output)
//!
//! A [`Structure`] is one building footprint reduced to a point in a
//! projected frame. A [`ClusterRecord`] is one output row: either a single
//! untouched structure or a group of structures collapsed onto the
//! location of one representative member.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{Coord, Geometry, Point};

/// Output property names, matching the columns downstream tools expect
pub mod fields {
    pub const DISTRICT: &str = "district";
    pub const ORIGIN_ID: &str = "origin_id";
    pub const STRUCTURE_COUNT: &str = "str_no";
    pub const AGGREGATED_AREA: &str = "AggArea_m2";
    pub const MEMBERS: &str = "members";
}

/// One input structure. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// Dense index assigned at load time (0..N-1)
    pub id: usize,
    /// Location in a projected, linear-unit frame
    pub location: Coord<f64>,
    /// Footprint area, non-negative
    pub area: f64,
    /// Opaque categorical attribute carried through unchanged
    pub region: AttributeValue,
}

impl Structure {
    pub fn new(id: usize, x: f64, y: f64, area: f64) -> Self {
        Self {
            id,
            location: Coord { x, y },
            area,
            region: AttributeValue::Null,
        }
    }

    pub fn with_region(mut self, region: impl Into<AttributeValue>) -> Self {
        self.region = region.into();
        self
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.location.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.location.y
    }

    /// Squared Euclidean distance to another structure
    #[inline]
    pub fn dist_sq(&self, other: &Structure) -> f64 {
        let dx = self.location.x - other.location.x;
        let dy = self.location.y - other.location.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another structure
    #[inline]
    pub fn dist(&self, other: &Structure) -> f64 {
        self.dist_sq(other).sqrt()
    }

    pub fn has_finite_location(&self) -> bool {
        self.location.x.is_finite() && self.location.y.is_finite()
    }
}

/// One output record: a merged group or an untouched singleton
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    /// Id of the member whose location and region represent the group
    pub representative_id: usize,
    /// Number of structures collapsed into this record (>= 1)
    pub member_count: usize,
    /// Sum of member areas; the member's own area for singletons
    pub aggregated_area: f64,
    /// Region of the representative
    pub region: AttributeValue,
    /// Location of the representative
    pub location: Coord<f64>,
    /// Ids of every member, ascending
    pub members: Vec<usize>,
}

impl ClusterRecord {
    pub fn is_singleton(&self) -> bool {
        self.member_count == 1
    }

    /// Convert to a Point feature using the output property names
    pub fn to_feature(&self) -> Feature {
        let members = self
            .members
            .iter()
            .map(|&id| AttributeValue::Int(id as i64))
            .collect();

        Feature::new(Geometry::Point(Point::from(self.location)))
            .with_property(fields::DISTRICT, self.region.clone())
            .with_property(fields::ORIGIN_ID, AttributeValue::Int(self.representative_id as i64))
            .with_property(fields::STRUCTURE_COUNT, AttributeValue::Int(self.member_count as i64))
            .with_property(fields::AGGREGATED_AREA, AttributeValue::Float(self.aggregated_area))
            .with_property(fields::MEMBERS, AttributeValue::List(members))
    }
}

/// Which input properties hold the area and the region
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Numeric footprint area property
    pub area_field: String,
    /// Categorical region property (optional per feature)
    pub region_field: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            area_field: "area_in_meters".to_string(),
            region_field: "d".to_string(),
        }
    }
}

/// The loaded point set plus the frame its coordinates live in
#[derive(Debug, Clone, Default)]
pub struct StructureSet {
    structures: Vec<Structure>,
    crs: Option<CRS>,
}

impl StructureSet {
    /// Build a set from structures whose ids are already dense and ordered.
    pub fn new(structures: Vec<Structure>, crs: Option<CRS>) -> Result<Self> {
        if let Some((pos, s)) = structures.iter().enumerate().find(|(i, s)| s.id != *i) {
            return Err(Error::InvalidParameter {
                name: "structure id",
                value: s.id.to_string(),
                reason: format!("expected dense id {} at position {}", pos, pos),
            });
        }
        Ok(Self { structures, crs })
    }

    /// Convenience constructor from `(x, y, area)` triples; ids follow input order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let structures = points
            .into_iter()
            .enumerate()
            .map(|(id, (x, y, area))| Structure::new(id, x, y, area))
            .collect();
        Self {
            structures,
            crs: None,
        }
    }

    /// Convert Point features into structures.
    ///
    /// Ids are assigned densely in feature order. Fails on the first
    /// non-point geometry, missing area, or negative / non-finite area.
    pub fn from_features(collection: FeatureCollection, options: &LoadOptions) -> Result<Self> {
        let crs = collection.crs.clone();
        let mut structures = Vec::with_capacity(collection.len());

        for (index, feature) in collection.into_iter().enumerate() {
            let point = match &feature.geometry {
                Some(Geometry::Point(p)) => *p,
                Some(other) => {
                    return Err(Error::GeometryType {
                        index,
                        found: geometry_type_name(other).to_string(),
                    })
                }
                None => {
                    return Err(Error::GeometryType {
                        index,
                        found: "null".to_string(),
                    })
                }
            };

            let area_value = feature.get_property(&options.area_field).ok_or_else(|| {
                Error::MissingAttribute {
                    index,
                    field: options.area_field.clone(),
                }
            })?;
            let area = area_value.as_f64().ok_or_else(|| Error::InvalidAttribute {
                index,
                field: options.area_field.clone(),
                reason: format!("expected a number, got {}", area_value.type_name()),
            })?;
            if !area.is_finite() || area < 0.0 {
                return Err(Error::InvalidAttribute {
                    index,
                    field: options.area_field.clone(),
                    reason: format!("area must be finite and non-negative, got {}", area),
                });
            }

            let region = feature
                .get_property(&options.region_field)
                .cloned()
                .unwrap_or_default();

            structures.push(Structure {
                id: index,
                location: point.0,
                area,
                region,
            });
        }

        Ok(Self { structures, crs })
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

/// Convert cluster records into a feature collection tagged with `crs`
pub fn records_to_features(records: &[ClusterRecord], crs: Option<CRS>) -> FeatureCollection {
    FeatureCollection {
        features: records.iter().map(ClusterRecord::to_feature).collect(),
        crs,
    }
}

pub(crate) fn geometry_type_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
