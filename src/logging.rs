// src/logging.rs

use crate::models::ApiCallLog;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Records an outbound API call through the `api` log target.
pub fn log_api_call(log: &ApiCallLog) {
    log::info!(
        target: "api",
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}

/// Initialises `env_logger`. Falls back to `level` when `RUST_LOG` is unset.
///
/// With `log_file` set, output goes to that file instead of stderr so a
/// full-screen terminal UI is not overwritten.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    if let Some(path) = log_file {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] {:<5} {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialised: {}", e);
    }
    Ok(())
}
