pub mod aggregator;
pub mod analysis_model;
pub mod assessment;
