//! Download historical price series from Yahoo Finance into CSV files,
//! driven by an interactive menu.

pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod screen;
pub mod service;
pub mod types;
pub mod validate;

pub use error::Error;
