pub mod generator;
pub mod scenario_model;
pub mod test_data;
