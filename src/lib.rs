pub mod app;
pub mod assets;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod output;
pub mod sheet;
pub mod store;
