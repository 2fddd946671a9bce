// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Profile file discovery and loading.

use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};

use super::config::AdminProfile;

/// Environment variable naming a profile file.
pub const CONFIG_ENV_VAR: &str = "EJBCA_ADMIN_CONFIG";

/// Profile loader with discovery and precedence rules.
///
/// # Search Order
///
/// The first existing file wins:
///
/// 1. Explicit path (if set via `with_path()`)
/// 2. Environment variable `EJBCA_ADMIN_CONFIG`
/// 3. `<config dir>/ejbca-admin/config.toml`
/// 4. Current directory: `./ejbca-admin.toml`
///
/// An explicit path or environment variable that names a missing file is an
/// error. When neither is set and no file is found, the default profile is
/// used.
///
/// # Example
///
/// ```no_run
/// use ejbca_admin_client::profile::ConfigLoader;
///
/// let profile = ConfigLoader::new().load().unwrap();
///
/// let profile = ConfigLoader::new()
///     .with_path("/etc/ejbca-admin/prod.toml")
///     .load()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    env_var_name: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new loader with default settings.
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            env_var_name: CONFIG_ENV_VAR.to_string(),
        }
    }

    /// Set an explicit profile path.
    ///
    /// When set, only this path will be checked (no discovery).
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.explicit_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable name for path override.
    ///
    /// Default: `EJBCA_ADMIN_CONFIG`
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var_name = name.into();
        self
    }

    /// Load and validate the profile.
    pub fn load(&self) -> Result<AdminProfile> {
        let Some(path) = self.find_config_file()? else {
            tracing::debug!("No profile file found, using defaults");
            return Ok(AdminProfile::default());
        };

        tracing::debug!("Loading profile from {}", path.display());
        let toml_content = std::fs::read_to_string(&path)
            .map_err(|e| ClientError::config(format!("Failed to read {}: {e}", path.display())))?;

        self.load_from_str(&toml_content)
    }

    /// Load a profile from a TOML string.
    pub fn load_from_str(&self, toml_content: &str) -> Result<AdminProfile> {
        let profile = AdminProfile::from_toml(toml_content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Find the profile file path.
    ///
    /// Returns `Ok(None)` when discovery finds nothing.
    pub fn find_config_file(&self) -> Result<Option<PathBuf>> {
        if let Some(ref path) = self.explicit_path {
            if path.is_file() {
                return Ok(Some(path.clone()));
            }
            return Err(ClientError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        if let Some(env_path) = std::env::var_os(&self.env_var_name) {
            let path = PathBuf::from(env_path);
            if path.is_file() {
                return Ok(Some(path));
            }
            return Err(ClientError::config(format!(
                "Configuration file from {} not found: {}",
                self.env_var_name,
                path.display()
            )));
        }

        Ok(self.get_search_paths().into_iter().find(|p| p.is_file()))
    }

    /// Get the list of paths searched when no explicit path is set.
    pub fn get_search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(path) = default_config_path() {
            paths.push(path);
        }

        paths.push(PathBuf::from("ejbca-admin.toml"));
        paths
    }
}

/// Per-user profile location, `<config dir>/ejbca-admin/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut dir| {
        dir.push("ejbca-admin");
        dir.push("config.toml");
        dir
    })
}

/// Write a commented example profile to `path`.
///
/// Parent directories are created. An existing file is left untouched
/// unless `overwrite` is set.
pub fn write_default_config(path: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let path = path.as_ref();

    if path.exists() && !overwrite {
        return Err(ClientError::config(format!(
            "{} already exists; pass --force to replace it",
            path.display()
        )));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, DEFAULT_PROFILE)?;
    Ok(())
}

const DEFAULT_PROFILE: &str = r#"# ejbca-admin profile

[server]
# EJBCA base URL (the REST API lives under /ejbca-rest-api)
url = "https://ejbca.example.com:8443"

# Request timeout in seconds (default: 30)
timeout_seconds = 30

[trust]
# Server certificate verification: "webpki", "explicit" or "insecure"
# - webpki: Mozilla's root CA store (default)
# - explicit: only the CAs in ca_bundle_path
# - insecure: accept any certificate (TESTING ONLY)
mode = "webpki"
# ca_bundle_path = "/etc/ejbca-admin/ManagementCA.pem"

[identity]
# Directory of PEM files holding client certificates and their keys
# store_dir = "/home/admin/.config/ejbca-admin/certs"

# Use this certificate without prompting (hex, separators ignored)
# serial = "1A:2B:3C"

[configdump]
# Output format: "json" or "zip"
format = "json"
ignore_errors = false
include_defaults = false
include_external_cas = false

# Export only these item types (takes precedence over exclude)
# include = ["CA", "CERTIFICATEPROFILE"]

# Leave out these item types
# exclude = ["KEYBINDING", "OCSPCONFIG"]

# Output base path; the format extension is appended
# outfile = "configdump"

[enroll]
# certificate_profile = "ENDUSER"
# end_entity_profile = "EMPTY"
# certificate_authority = "ManagementCA"
# username = "ra-officer"
include_chain = true

[signserver]
# SignServer base URL (defaults to server.url)
# url = "https://signserver.example.com:8443"
# worker = "PDFSigner"

[logging]
# Log level: "trace", "debug", "info", "warn" or "error"
level = "info"
"#;
