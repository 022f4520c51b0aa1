use std::io;
use tracing::{debug, error, info};

use env_log_layer::init::init;

/// Try it with different settings, e.g.
///
///     LOG_FORMAT=simple LOG_COLORS=yes cargo run --example basic
///     LOG_LEVEL=debug cargo run --example basic
fn main() {
    if let Err(e) = init() {
        eprintln!("logger init failed: {e}");
        return;
    }

    info!(port = 8080, "starting service");
    debug!("only visible with LOG_LEVEL=debug");

    let not_found = io::Error::new(io::ErrorKind::NotFound, "config.toml missing");
    let denied = io::Error::new(io::ErrorKind::PermissionDenied, "cannot open /var/run");
    error!(
        first = &not_found as &(dyn std::error::Error + 'static),
        second = &denied as &(dyn std::error::Error + 'static),
        "startup failed"
    );
}
