// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! SignServer worker processing (POST /signserver/rest/v1/workers/{worker}/process).

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{ClientError, Result};
use crate::types::paths;

/// Bytes escaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path of the `process` endpoint for a worker name or numeric id.
pub fn process_path(worker: &str) -> String {
    format!(
        "{}/{}/process",
        paths::SIGNSERVER_WORKERS,
        utf8_percent_encode(worker, PATH_SEGMENT)
    )
}

/// Parse a `KEY=VALUE` metadata argument.
pub fn parse_metadata(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ClientError::config(format!(
            "Invalid metadata '{entry}', expected KEY=VALUE"
        ))),
    }
}
