// Data processing pipeline: cleaning, embedding, and validation stages

pub mod processing;
