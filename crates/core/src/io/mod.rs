//! I/O for reading structures and writing merged clusters
//!
//! GeoJSON FeatureCollections of Point features are the single supported
//! format, on both sides of the pipeline.

mod geojson;

pub use geojson::{
    check_format, features_from_str, features_to_string, read_features, read_structures,
    write_clusters, write_features, WriteOptions, SUPPORTED_EXTENSIONS,
};
