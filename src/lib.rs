pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod lpsn;
pub mod output;
pub mod registry;
pub mod store;
pub mod table;
pub mod update;
