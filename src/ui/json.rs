//! JSON-lines event printer

use crate::progress::ProgressReceiver;
use std::io::Write;
use std::thread;

/// Write every event as one JSON line to stdout until the run ends
pub fn spawn_json_printer(mut rx: ProgressReceiver) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdout = std::io::stdout();
        while let Some(event) = rx.blocking_recv() {
            let line = match event.to_json() {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("failed to encode progress event: {}", e);
                    continue;
                }
            };
            let mut out = stdout.lock();
            if writeln!(out, "{}", line).is_err() {
                break; // stdout closed
            }
        }
    })
}
