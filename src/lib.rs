pub mod catalog;
pub mod config;
pub mod date_window;
pub mod fake_source;
pub mod fetcher;
pub mod form;
pub mod http_client;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod team_names;
pub mod ttl_cache;
pub mod upstream;
