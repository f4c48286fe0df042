//! CLI library for testing purposes

pub mod check;
pub mod config;
pub mod convert;
pub mod formats;
pub mod view;

pub use config::Config;
