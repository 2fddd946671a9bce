// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration export (GET /ejbca-rest-api/v1/configdump).
//!
//! Item filters are sent as `type:name` patterns. This client only filters
//! by type, so every pattern it sends has the form `TYPE:*`. An inclusion
//! list is expressed as "exclude everything, then include these", because the
//! server applies includes over excludes.

use std::path::Path;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::types::{ExportRequest, ItemFilter};

/// Pattern matching every item of every type.
const MATCH_ALL: &str = "*:*";

/// Query parameters of a configdump export.
///
/// Parameters keep their insertion order: the three flags first, then the
/// filter patterns.
///
/// # Example
///
/// ```
/// use ejbca_admin_client::operations::ConfigdumpQuery;
/// use ejbca_admin_client::types::{ExportFormat, ExportRequest};
///
/// let request = ExportRequest::new(ExportFormat::Json).include(["CA"]);
/// let query = ConfigdumpQuery::from_request(&request);
///
/// assert_eq!(
///     query.to_query_string(),
///     "ignoreerrors=false&defaults=false&externalcas=false&exclude=%2A%3A%2A&include=CA%3A%2A"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigdumpQuery {
    pairs: Vec<(&'static str, String)>,
}

impl ConfigdumpQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the query for an export request.
    pub fn from_request(request: &ExportRequest) -> Self {
        let mut query = Self::new()
            .flag("ignoreerrors", request.ignore_errors)
            .flag("defaults", request.include_defaults)
            .flag("externalcas", request.include_external_cas);

        match request.filter() {
            ItemFilter::All => {}
            ItemFilter::Include(items) => {
                query = query.param("exclude", MATCH_ALL);
                for item in items {
                    query = query.param("include", type_pattern(item));
                }
            }
            ItemFilter::Exclude(items) => {
                for item in items {
                    query = query.param("exclude", type_pattern(item));
                }
            }
        }

        query
    }

    /// Append a boolean parameter as `true` or `false`.
    pub fn flag(self, name: &'static str, value: bool) -> Self {
        self.param(name, value.to_string())
    }

    /// Append a parameter.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((name, value.into()));
        self
    }

    /// The unencoded parameters in order.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Values of every parameter called `name`.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Serialize as `name=value&...` with every non-alphanumeric byte of
    /// each value percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{name}={}", utf8_percent_encode(value, NON_ALPHANUMERIC)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn type_pattern(item_type: &str) -> String {
    format!("{item_type}:*")
}

/// Stream a response body into `path`.
///
/// A failure to create the file is returned as-is and leaves any existing
/// entry at `path` untouched. If reading the body or writing fails after the
/// file was created, the partial file is removed. Returns the number of bytes
/// written.
pub async fn save_response(response: reqwest::Response, path: &Path) -> Result<u64> {
    let file = tokio::fs::File::create(path).await?;

    let result = stream_to_file(response, file).await;
    if result.is_err() {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!("Removed partial file {}", path.display()),
            Err(e) => tracing::warn!("Could not remove partial file {}: {}", path.display(), e),
        }
    }

    result
}

async fn stream_to_file(mut response: reqwest::Response, mut file: tokio::fs::File) -> Result<u64> {
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
