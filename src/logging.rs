use anyhow::{Context, Result};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Map the number of `-v` flags to a level. Warnings are always shown.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log to stderr so stdout stays a clean report (or JSON document).
pub fn init(verbosity: u8) -> Result<()> {
    let level = level_for(verbosity);

    let mut builder = ConfigBuilder::new();
    builder.set_time_level(LevelFilter::Off);
    // Dependency chatter only at the most verbose level.
    if level < LevelFilter::Trace {
        builder.add_filter_allow_str(env!("CARGO_CRATE_NAME"));
    }

    TermLogger::init(
        level,
        builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}
