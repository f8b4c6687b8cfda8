// Pipeline processing: batch normalization, dedup, embedding, and validation

pub mod normalize;
pub mod profile;
pub mod clean;
pub mod enrich;
pub mod quality_gate;
