//! Console logging: one `[timestamp] message` line per event on stdout.

use std::io::Write;

use env_logger::{Builder, Env, Target};
use log::Level;

/// Timestamp resolution for log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precision {
    Seconds,
    Micros,
}

/// Logger writing to stdout with an `info` default filter; `RUST_LOG`
/// overrides the filter.
pub fn builder(precision: Precision) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stdout).format(move |buf, record| {
        let timestamp = match precision {
            Precision::Seconds => buf.timestamp_seconds(),
            Precision::Micros => buf.timestamp_micros(),
        };
        if record.level() == Level::Info {
            writeln!(buf, "[{}] {}", timestamp, record.args())
        } else {
            writeln!(buf, "[{}] {}: {}", timestamp, record.level(), record.args())
        }
    });
    builder
}

pub fn init(precision: Precision) {
    builder(precision).init();
}
