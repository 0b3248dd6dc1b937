pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{PipelineError, PipelineResult, Stage};
pub use pipeline::{run_pipeline, PipelineParams, RunReport};
