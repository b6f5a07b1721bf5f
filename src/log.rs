use log::LevelFilter;
use std::io::Write;

/// Sets up a global logger printing to STDERR. The level can be overwritten via the `RUST_LOG`
/// environment variable. Calling this function more than once has no effect.
pub fn build_logger_for_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}

/// Raises `default` by one level per occurrence of the verbosity flag (-l, -ll, ...)
pub fn build_logger_for_verbosity(default: LevelFilter, verbosity: usize) {
    build_logger_for_level(level_for_verbosity(default, verbosity));
}

fn level_for_verbosity(default: LevelFilter, verbosity: usize) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base = LEVELS.iter().position(|&l| l == default).unwrap_or(2);
    LEVELS[(base + verbosity).min(LEVELS.len() - 1)]
}
