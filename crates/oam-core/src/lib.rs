pub mod config;
pub mod logging;

pub mod cache;
pub mod fetch;
pub mod job;
pub mod manifest;
pub mod pipeline;
pub mod sink;
