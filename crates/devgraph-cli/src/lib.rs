//! Devgraph CLI library
//!
//! Replays a recorded gesture session against a fresh diagram and reports
//! the resulting state.

pub mod error_adapter;

mod args;
mod config;
mod report;
mod session;
mod view;

pub use args::Args;
pub use report::Report;
pub use session::{ReplaySummary, Session};
pub use view::LogView;

use std::fs;

use log::{info, trace};

use devgraph::{DevgraphError, Diagram};

/// Run the devgraph CLI application
///
/// Loads the configuration, replays the session file and writes the report
/// to the output path, or to stdout when no output path is given.
///
/// # Errors
///
/// Returns `DevgraphError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Malformed sessions and gestures naming unknown devices or arrows
pub fn run(args: &Args) -> Result<(), DevgraphError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Replaying session"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let session = Session::parse(&source)?;

    let mut diagram = Diagram::with_view(app_config, LogView);
    let device_types: Vec<String> = diagram
        .config()
        .palette()
        .entries()
        .iter()
        .map(|entry| entry.device_type().to_string())
        .collect();
    for device_type in &device_types {
        diagram
            .registry_mut()
            .register_update(device_type, |device, range, value| {
                trace!(
                    device_id:% = device,
                    min:? = range.min(),
                    max:? = range.max(),
                    value = value;
                    "Device redrawn"
                );
            });
    }

    let summary = session.replay(&mut diagram)?;
    let report = Report::new(&diagram, summary).to_string();

    match &args.output {
        Some(path) => {
            fs::write(path, report)?;
            info!(output_file = path; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
