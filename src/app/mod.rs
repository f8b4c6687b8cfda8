pub mod ports;
pub mod clean_use_case;
pub mod enrich_use_case;
pub mod quality_gate_use_case;
