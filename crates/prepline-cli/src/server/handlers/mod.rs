//! API request handlers.

mod pipeline;
mod status;
mod tables;

pub use pipeline::*;
pub use status::*;
pub use tables::*;
