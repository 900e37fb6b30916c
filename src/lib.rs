#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod metadata;
pub mod util;
