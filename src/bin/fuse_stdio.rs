//! fusor stdio boundary adapter
//!
//! A standalone binary implementing the process-per-request contract: read
//! one JSON request from stdin, write one JSON response to stdout. On
//! failure it writes a structured error body (never a fabricated fused
//! value) and exits nonzero. Validation and fusion semantics live entirely
//! in the `fusor` library; this adapter only moves bytes.

use std::io::Read;
use std::process::ExitCode;

use fusor::{error_body, FusionEngine, FusorError};

fn run() -> Result<String, FusorError> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| FusorError::internal(format!("read stdin: {e}")))?;

    let engine = FusionEngine::with_defaults();
    let outcome = engine.fuse_json(&raw)?;
    outcome.to_json()
}

fn main() -> ExitCode {
    match run() {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", error_body(&err));
            ExitCode::FAILURE
        }
    }
}
