// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Directory-backed personal certificate store.

use std::path::{Path, PathBuf};

use super::{CertificateStore, ClientCertificate};
use crate::error::{ClientError, Result};
use crate::tls::contains_private_key;

/// Certificate file extensions recognized in the store directory.
const CERT_EXTENSIONS: &[&str] = &["pem", "crt", "cer"];

/// A personal certificate store backed by a directory of PEM files.
///
/// Each certificate file either contains its private key, or has a sibling
/// `<stem>.key` file holding it. Files that cannot be parsed or have no
/// private key are skipped.
#[derive(Debug, Clone)]
pub struct PemDirectoryStore {
    dir: PathBuf,
}

impl PemDirectoryStore {
    /// Open the store at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store at the default per-user location.
    ///
    /// This is `<config dir>/ejbca-admin/certs`, e.g.
    /// `~/.config/ejbca-admin/certs` on Linux or
    /// `%APPDATA%\ejbca-admin\certs` on Windows.
    pub fn default_location() -> Result<Self> {
        let mut dir = dirs::config_dir()
            .ok_or_else(|| ClientError::config("Unable to determine the user config directory"))?;
        dir.push("ejbca-admin");
        dir.push("certs");
        Ok(Self::new(dir))
    }

    /// The directory this store reads from.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn load_entry(&self, cert_path: &Path) -> Result<Option<ClientCertificate>> {
        let cert_pem = std::fs::read(cert_path)?;

        let key_pem = if contains_private_key(&cert_pem) {
            cert_pem.clone()
        } else {
            let key_path = cert_path.with_extension("key");
            if !key_path.is_file() {
                tracing::debug!("Skipping {}: no private key", cert_path.display());
                return Ok(None);
            }
            std::fs::read(&key_path)?
        };

        let name = cert_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let cert = ClientCertificate::from_pem_identity(&cert_pem, &key_pem)?;
        Ok(Some(if name.is_empty() {
            cert
        } else {
            cert.with_display_name(name)
        }))
    }
}

impl CertificateStore for PemDirectoryStore {
    fn list_certificates(&self) -> Result<Vec<ClientCertificate>> {
        if !self.dir.is_dir() {
            tracing::debug!("Certificate store {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| CERT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        let mut certs = Vec::new();
        for path in paths {
            match self.load_entry(&path) {
                Ok(Some(cert)) => certs.push(cert),
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping {}: {}", path.display(), e),
            }
        }

        tracing::debug!(
            "Loaded {} certificate(s) from {}",
            certs.len(),
            self.dir.display()
        );
        Ok(certs)
    }
}
