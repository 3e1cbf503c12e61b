//! Getting a parsed document in the first place.
//!
//! Failures here are fatal faults: they still go through the configured error
//! handler (so it can record them) but no handler can turn them into success.

use std::path::Path as FsPath;

use serde_json::Value;

use crate::error::{ErrorCode, Result};
use crate::report::{Config, Detail, Fault};

pub fn read_str(text: &str, config: &Config) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(source) => {
            let message = format!("could not parse JSON ({source})");
            let fault = Fault {
                code: ErrorCode::JsonParse,
                reason: ErrorCode::JsonParse.reason(),
                message: &message,
                detail: Detail::Json { source: &source },
            };
            Err(fatal(config, &fault).with_source(source))
        }
    }
}

pub fn read_file(path: impl AsRef<FsPath>, config: &Config) -> Result<Value> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => read_str(&text, config),
        Err(source) => {
            let message = format!("error opening input file {} ({source})", path.display());
            let fault = Fault {
                code: ErrorCode::FileOpen,
                reason: ErrorCode::FileOpen.reason(),
                message: &message,
                detail: Detail::File { path, source: &source },
            };
            Err(fatal(config, &fault).with_source(source))
        }
    }
}

fn fatal(config: &Config, fault: &Fault<'_>) -> crate::Error {
    debug_assert!(fault.code.is_fatal());
    match config.raise(fault) {
        Err(err) => err,
        // fatal codes never come back Ok
        Ok(()) => crate::Error::new(fault.code, fault.message),
    }
}
