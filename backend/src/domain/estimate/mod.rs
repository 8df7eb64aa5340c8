//! Estimate schema and reply parsing.
pub mod parser;
pub mod schema;

pub use parser::{parse_estimate, ParsedEstimate};
pub use schema::{EstimateSchema, EstimateSchemaVersion};
