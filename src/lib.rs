pub mod api;
pub mod config;
pub mod correlator;
pub mod enrich;
pub mod models;
pub mod store;
pub mod sweeper;
pub mod track;
