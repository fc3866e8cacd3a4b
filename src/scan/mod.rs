pub mod element_model;
pub mod scanner;
pub mod selector;
