// src/memory/recall/mod.rs

pub mod pipeline;

pub use pipeline::{RecallConfig, RecallPipeline};
