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

//! Console logging setup.
//!
//! The library reports progress through `tracing`; this module installs the
//! subscriber used by the command-line tool. Levels are coloured on terminals
//! so informational, warning and error messages stand apart.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};

/// Log level for filtering messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose - all messages.
    Trace,
    /// Debug information, including request URLs.
    Debug,
    /// Informational messages.
    #[default]
    Info,
    /// Warnings.
    #[serde(alias = "warning")]
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Get the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Pick the level for the command-line verbosity flags.
    ///
    /// `quiet` wins over `verbose`; with neither, `configured` is used.
    pub fn from_flags(verbose: bool, quiet: bool, configured: Option<Self>) -> Self {
        if quiet {
            Self::Error
        } else if verbose {
            Self::Debug
        } else {
            configured.unwrap_or_default()
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Install the global console subscriber.
///
/// Log lines go to standard error so that command output on standard output
/// stays clean. Calling this more than once is harmless; later calls are ignored.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(LogLevel::from_flags(true, true, None), LogLevel::Error);
        assert_eq!(LogLevel::from_flags(true, false, None), LogLevel::Debug);
        assert_eq!(
            LogLevel::from_flags(false, false, Some(LogLevel::Warn)),
            LogLevel::Warn
        );
        assert_eq!(LogLevel::from_flags(false, false, None), LogLevel::Info);
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: LogLevel,
        }
        let w: Wrapper = toml::from_str("level = \"warning\"").unwrap();
        assert_eq!(w.level, LogLevel::Warn);
    }
}
