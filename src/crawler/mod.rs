pub mod crawl_config;
pub mod crawler;
pub mod operator;
pub mod run_context;
pub mod url_scope;
