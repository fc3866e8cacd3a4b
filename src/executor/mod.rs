pub mod executor;
pub mod result_model;
