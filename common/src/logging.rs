//! Common logging initializer
//!

use std::path::PathBuf;

use eyre::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_tree::HierarchicalLayer;

/// Install the global subscriber.
///
/// - `use_tree` selects the hierarchical output from `tracing-tree`
/// - `use_file` adds an hourly rolling file in that directory
///
/// Without either, a compact format goes to stderr.
///
pub fn init_logging(name: &'static str, use_tree: bool, use_file: Option<PathBuf>) -> Result<()> {
    // Load filters from environment
    //
    let filter = EnvFilter::from_default_env();

    // Do we want hierarchical output?
    //
    let tree = if use_tree {
        Some(
            HierarchicalLayer::new(2)
                .with_ansi(true)
                .with_span_retrace(true)
                .with_span_modes(true)
                .with_targets(true)
                .with_verbose_entry(true)
                .with_verbose_exit(true)
                .with_bracketed_fields(true),
        )
    } else {
        None
    };

    // Log to file?
    //
    let file = use_file.map(|dir| {
        // Basic append-only rolling file for all traces.
        //
        let file_appender = tracing_appender::rolling::hourly(dir, name);
        fmt::layer().with_ansi(false).with_writer(file_appender)
    });

    // Plain stderr output when nothing else is asked for.
    //
    let plain = if tree.is_none() && file.is_none() {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
    } else {
        None
    };

    // Combine filters & exporters
    //
    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .with(file)
        .with(plain)
        .try_init()?;

    Ok(())
}
