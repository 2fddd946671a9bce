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

//! Certificate store access.
//!
//! The selector never touches the filesystem directly; it asks a
//! [`CertificateStore`] for the certificates it can offer. Two stores are
//! provided:
//!
//! - [`PemDirectoryStore`]: the user's personal store, a directory of PEM files
//!   each holding a certificate (chain) and its private key
//! - [`MemoryStore`]: a fixed set of certificates, for embedding and tests
//!
//! # Personal Store Layout
//!
//! ```text
//! ~/.config/ejbca-admin/certs/
//!   superadmin.pem        certificate and private key in one file
//!   ra-officer.crt        certificate (chain)
//!   ra-officer.key        private key for ra-officer.crt
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ejbca_admin_client::certstore::{CertificateStore, PemDirectoryStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PemDirectoryStore::default_location()?;
//!
//! for cert in store.list_client_auth_certificates()? {
//!     println!("{} issued by {:?}", cert.display_name, cert.issuer_cn);
//! }
//! # Ok(())
//! # }
//! ```

mod certificate;
mod pem_dir;

pub use certificate::{ClientCertificate, normalize_serial};
pub use pem_dir::PemDirectoryStore;

use crate::error::Result;

/// A source of client certificates.
pub trait CertificateStore {
    /// List every certificate in the store.
    fn list_certificates(&self) -> Result<Vec<ClientCertificate>>;

    /// List the certificates whose extended key usage includes Client Authentication.
    fn list_client_auth_certificates(&self) -> Result<Vec<ClientCertificate>> {
        Ok(self
            .list_certificates()?
            .into_iter()
            .filter(ClientCertificate::has_client_auth)
            .collect())
    }
}

/// An in-memory certificate store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    certificates: Vec<ClientCertificate>,
}

impl MemoryStore {
    /// Create a store holding the given certificates.
    pub fn new(certificates: Vec<ClientCertificate>) -> Self {
        Self { certificates }
    }

    /// Add a certificate to the store.
    pub fn push(&mut self, cert: ClientCertificate) {
        self.certificates.push(cert);
    }
}

impl CertificateStore for MemoryStore {
    fn list_certificates(&self) -> Result<Vec<ClientCertificate>> {
        Ok(self.certificates.clone())
    }
}

impl<S: CertificateStore + ?Sized> CertificateStore for &S {
    fn list_certificates(&self) -> Result<Vec<ClientCertificate>> {
        (**self).list_certificates()
    }
}
