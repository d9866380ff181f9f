//! HTTP service exposing the pipeline stages.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
