//! # Structura Core
//!
//! Core types, CRS tagging and I/O for the Structura structure-merging tool.
//!
//! This crate provides:
//! - `Structure` / `StructureSet`: the immutable input point set
//! - `ClusterRecord`: one merged (or singleton) output row
//! - `CRS`: reference frame tag carried from input to output
//! - `Feature` / `FeatureCollection`: the vector model behind the GeoJSON I/O
//! - I/O for GeoJSON Point collections

pub mod crs;
pub mod error;
pub mod io;
pub mod structure;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result, Stage};
pub use structure::{ClusterRecord, LoadOptions, Structure, StructureSet};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result, Stage};
    pub use crate::structure::{ClusterRecord, LoadOptions, Structure, StructureSet};
    pub use crate::vector::AttributeValue;
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in Structura.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
