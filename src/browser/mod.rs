pub mod browser_config;
pub mod driver;
pub mod session;
