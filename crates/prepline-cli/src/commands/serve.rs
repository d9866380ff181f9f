//! Serve command - start the HTTP service.

use std::path::Path;

use colored::Colorize;

use super::load_pipeline;
use crate::server::{app, state::AppState};

pub fn run(
    host: String,
    port: u16,
    config: Option<&Path>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(config)?;
    let state = AppState::new(pipeline);

    let url = format!("http://{}:{}", host, port);
    println!();
    println!(
        "{} {}",
        "Starting prepline service at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  POST {}/api/pipeline  {{\"file_path\": ...}}", url);
    println!("  POST {}/api/clean     {{\"table\": ...}}", url);
    println!("  POST {}/api/transform {{\"table\": ...}}", url);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, &host, port))
}
