//! Data models shared across the pipeline.

pub mod chunk;
pub mod config;
pub mod element;
