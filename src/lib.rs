pub mod app;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod encounter;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod output;
pub mod providers;
pub mod session;
pub mod store;
