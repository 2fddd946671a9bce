// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Profile file data structures.
//!
//! This module defines the Rust structures that map to the TOML profile
//! format. All types implement serde's `Deserialize` and `Serialize` traits.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::certstore::PemDirectoryStore;
use crate::config::ClientConfigBuilder;
use crate::error::{ClientError, Result};
use crate::logging::LogLevel;
use crate::types::{ExportFormat, ExportRequest};

/// Root profile structure.
///
/// Every section is optional; command-line arguments fill in or override
/// whatever the file leaves out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminProfile {
    /// EJBCA server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// TLS trust settings.
    #[serde(default)]
    pub trust: TrustConfig,

    /// Client certificate settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Defaults for `configdump`.
    #[serde(default)]
    pub configdump: ConfigdumpConfig,

    /// Defaults for `enroll`.
    #[serde(default)]
    pub enroll: EnrollConfig,

    /// SignServer settings.
    #[serde(default)]
    pub signserver: SignServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdminProfile {
    /// Parse a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ClientError::config(format!("Invalid TOML: {e}")))
    }

    /// Serialize the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::config(format!("TOML serialize: {e}")))
    }

    /// Check the profile for inconsistent settings.
    ///
    /// All problems are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for (key, value) in [
            ("server.url", self.server.url.as_deref()),
            ("signserver.url", self.signserver.url.as_deref()),
        ] {
            if let Some(url) = value
                && let Err(e) = url::Url::parse(url)
            {
                errors.push(format!("{key} is not a valid URL: {e}"));
            }
        }

        if self.server.timeout_seconds == 0 {
            errors.push("server.timeout_seconds must be greater than zero".to_string());
        }

        if self.trust.mode == TrustMode::Explicit && self.trust.ca_bundle_path.is_none() {
            errors.push("trust.ca_bundle_path is required when trust.mode is \"explicit\"".to_string());
        }

        if !self.configdump.include.is_empty() && !self.configdump.exclude.is_empty() {
            tracing::warn!("configdump.include is set; configdump.exclude will be ignored");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ClientError::config(format!(
                "Profile validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }

    /// Start a client configuration for the EJBCA server.
    ///
    /// `server_override` replaces `server.url` when given.
    pub fn client_config_builder(&self, server_override: Option<&str>) -> Result<ClientConfigBuilder> {
        let url = server_override
            .or(self.server.url.as_deref())
            .ok_or_else(|| {
                ClientError::config("No server URL given; use --server or set server.url")
            })?;
        self.builder_for(url)
    }

    /// Start a client configuration for the SignServer instance.
    ///
    /// Falls back to the EJBCA server when `signserver.url` is unset.
    pub fn signserver_config_builder(
        &self,
        server_override: Option<&str>,
    ) -> Result<ClientConfigBuilder> {
        match server_override.or(self.signserver.url.as_deref()) {
            Some(url) => self.builder_for(url),
            None => self.client_config_builder(None),
        }
    }

    fn builder_for(&self, url: &str) -> Result<ClientConfigBuilder> {
        let builder = ClientConfigBuilder::new()
            .server_url(url)?
            .timeout(Duration::from_secs(self.server.timeout_seconds));

        Ok(match self.trust.mode {
            TrustMode::Webpki => builder.trust_webpki_roots(),
            TrustMode::Explicit => {
                let path = self.trust.ca_bundle_path.as_ref().ok_or_else(|| {
                    ClientError::config("trust.ca_bundle_path is required for explicit trust")
                })?;
                let bundle = std::fs::read(path).map_err(|e| {
                    ClientError::config(format!("Failed to read {}: {e}", path.display()))
                })?;
                builder.trust_explicit(vec![bundle])
            }
            TrustMode::Insecure => {
                tracing::warn!("Server certificate verification is disabled");
                builder.trust_any_insecure()
            }
        })
    }

    /// The personal certificate store to select from.
    pub fn certificate_store(&self) -> Result<PemDirectoryStore> {
        match &self.identity.store_dir {
            Some(dir) => Ok(PemDirectoryStore::new(dir)),
            None => PemDirectoryStore::default_location(),
        }
    }

    /// The export request described by the `[configdump]` section.
    pub fn export_request(&self) -> ExportRequest {
        let section = &self.configdump;
        let mut request = ExportRequest::new(section.format)
            .ignore_errors(section.ignore_errors)
            .include_defaults(section.include_defaults)
            .include_external_cas(section.include_external_cas)
            .include(section.include.iter().cloned())
            .exclude(section.exclude.iter().cloned());
        request.outfile = section.outfile.clone();
        request
    }
}

/// EJBCA server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://ejbca.example.com:8443`.
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// TLS trust configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    /// How the server certificate is verified.
    #[serde(default)]
    pub mode: TrustMode,

    /// PEM bundle of CA certificates, for `explicit` mode.
    #[serde(default)]
    pub ca_bundle_path: Option<PathBuf>,
}

/// Server certificate verification mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
    /// Mozilla's root CA store.
    #[default]
    Webpki,
    /// Only the CAs in `ca_bundle_path`.
    Explicit,
    /// Accept any certificate. For lab setups only.
    Insecure,
}

/// Client certificate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Personal certificate store directory.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Serial number of the certificate to use without prompting.
    #[serde(default)]
    pub serial: Option<String>,
}

/// Configuration export defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigdumpConfig {
    /// Output format.
    #[serde(default)]
    pub format: ExportFormat,

    /// Sent as `ignoreerrors`.
    #[serde(default)]
    pub ignore_errors: bool,

    /// Sent as `defaults`.
    #[serde(default)]
    pub include_defaults: bool,

    /// Sent as `externalcas`.
    #[serde(default)]
    pub include_external_cas: bool,

    /// Item types to export exclusively.
    #[serde(default)]
    pub include: Vec<String>,

    /// Item types to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Output base path without extension.
    #[serde(default)]
    pub outfile: Option<PathBuf>,
}

/// Enrollment defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnrollConfig {
    /// Certificate profile name.
    #[serde(default)]
    pub certificate_profile: Option<String>,

    /// End entity profile name.
    #[serde(default)]
    pub end_entity_profile: Option<String>,

    /// Issuing CA name.
    #[serde(default)]
    pub certificate_authority: Option<String>,

    /// End entity username.
    #[serde(default)]
    pub username: Option<String>,

    /// Ask for the CA chain with the issued certificate.
    #[serde(default = "default_true")]
    pub include_chain: bool,
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            certificate_profile: None,
            end_entity_profile: None,
            certificate_authority: None,
            username: None,
            include_chain: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// SignServer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignServerConfig {
    /// Base URL; defaults to `server.url`.
    #[serde(default)]
    pub url: Option<String>,

    /// Default worker name or id.
    #[serde(default)]
    pub worker: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level; `-v` and `-q` take precedence.
    #[serde(default)]
    pub level: Option<LogLevel>,
}
