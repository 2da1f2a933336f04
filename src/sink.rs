//! Diagnostics sink
//!
//! Devices pass an injected [log::Log] to the `logger:` form of the `log` macros instead of
//! using the process-wide logger. [GlobalLogger] forwards to the facade for hosts that install
//! one. Records are still filtered by `log::max_level()`.
use log::{Log, Metadata, Record};

/// Forwards records to the logger installed with `log::set_logger()`.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}
