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

//! Configuration export request types.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::paths;
use crate::error::ClientError;

/// Base name used for the export file when none is given.
pub const DEFAULT_OUTFILE: &str = "configdump";

/// Output format of a configuration export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// A single JSON document.
    #[default]
    Json,
    /// A ZIP archive of YAML files, one per exported item.
    Zip,
}

impl ExportFormat {
    /// File extension appended to the output base path.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Zip => "zip",
        }
    }

    /// Server path the export is fetched from.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Json => paths::CONFIGDUMP,
            Self::Zip => paths::CONFIGDUMP_ZIP,
        }
    }

    /// Append this format's extension to `base`.
    ///
    /// The extension is added, never substituted: `dump.v2` becomes
    /// `dump.v2.json`.
    pub fn output_path(&self, base: &Path) -> PathBuf {
        let mut name = OsString::from(base.as_os_str());
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "zip" => Ok(Self::Zip),
            other => Err(ClientError::config(format!(
                "Unknown export format '{other}' (expected json or zip)"
            ))),
        }
    }
}

/// Which configuration items an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFilter<'a> {
    /// Everything the server exports by default.
    All,
    /// Only items of the listed types.
    Include(&'a [String]),
    /// Everything except items of the listed types.
    Exclude(&'a [String]),
}

/// Parameters of one configuration export.
///
/// The target server comes from the client configuration; this only
/// describes what to export and where to write it.
///
/// # Example
///
/// ```
/// use ejbca_admin_client::types::{ExportFormat, ExportRequest};
///
/// let request = ExportRequest::new(ExportFormat::Zip)
///     .ignore_errors(true)
///     .include(["CA", "CERTIFICATEPROFILE"])
///     .outfile("backup/ejbca");
///
/// assert_eq!(request.output_path().to_str(), Some("backup/ejbca.zip"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// Output format.
    pub format: ExportFormat,
    /// Ask the server to export what it can instead of failing on the first error.
    pub ignore_errors: bool,
    /// Include fields that still hold their default values.
    pub include_defaults: bool,
    /// Include external CAs.
    pub include_external_cas: bool,
    /// Item types to export exclusively. Takes precedence over `exclude`.
    pub include: Vec<String>,
    /// Item types to leave out.
    pub exclude: Vec<String>,
    /// Output base path without extension.
    pub outfile: Option<PathBuf>,
}

impl ExportRequest {
    /// Create a request for the given format with every flag off.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set the `ignoreerrors` flag.
    pub fn ignore_errors(mut self, value: bool) -> Self {
        self.ignore_errors = value;
        self
    }

    /// Set the `defaults` flag.
    pub fn include_defaults(mut self, value: bool) -> Self {
        self.include_defaults = value;
        self
    }

    /// Set the `externalcas` flag.
    pub fn include_external_cas(mut self, value: bool) -> Self {
        self.include_external_cas = value;
        self
    }

    /// Export only these item types.
    pub fn include<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = items.into_iter().map(Into::into).collect();
        self
    }

    /// Leave out these item types.
    pub fn exclude<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = items.into_iter().map(Into::into).collect();
        self
    }

    /// Write the export to `path` plus the format extension.
    pub fn outfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.outfile = Some(path.into());
        self
    }

    /// The effective item filter.
    ///
    /// An empty list counts as not supplied. When both lists are present the
    /// inclusion list wins.
    pub fn filter(&self) -> ItemFilter<'_> {
        if !self.include.is_empty() {
            ItemFilter::Include(&self.include)
        } else if !self.exclude.is_empty() {
            ItemFilter::Exclude(&self.exclude)
        } else {
            ItemFilter::All
        }
    }

    /// True when an exclusion list was given but is overridden by the inclusion list.
    pub fn exclusion_ignored(&self) -> bool {
        !self.include.is_empty() && !self.exclude.is_empty()
    }

    /// Path the export will be written to.
    pub fn output_path(&self) -> PathBuf {
        let base = self
            .outfile
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTFILE));
        self.format.output_path(base)
    }
}
