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

//! # ejbca-admin-client
//!
//! A typed mutual-TLS client for the EJBCA and SignServer administrative
//! REST APIs.
//!
//! Every operation follows the same sequence: pick a client certificate from
//! the personal store, build the request, send it once, and save or return
//! the result.
//!
//! ## Features
//!
//! - **Configuration export** (`configdump`) as JSON or ZIP, with item-type
//!   include and exclude filters
//! - **Client certificate selection** by serial number or interactive prompt
//! - **PKCS#10 enrollment** against EJBCA
//! - **Document signing** through SignServer workers
//! - **CSR generation helpers** (feature-gated)
//!
//! ## Quick Start
//!
//! ```no_run
//! use ejbca_admin_client::certstore::PemDirectoryStore;
//! use ejbca_admin_client::selector::{ConsolePrompt, select_client_certificate};
//! use ejbca_admin_client::{AdminClient, ClientConfig, ExportFormat, ExportRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pick the administrator certificate
//!     let store = PemDirectoryStore::default_location()?;
//!     let cert = select_client_certificate(&store, None, &mut ConsolePrompt::stdio())?;
//!
//!     let config = ClientConfig::builder()
//!         .server_url("https://ejbca.example.com:8443")?
//!         .client_certificate(&cert)?
//!         .build()?;
//!
//!     let client = AdminClient::new(config)?;
//!
//!     // Export everything except internal key bindings
//!     let request = ExportRequest::new(ExportFormat::Json).exclude(["KEYBINDING"]);
//!     let path = client.export_config(&request).await?;
//!     println!("Configuration written to {}", path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Cargo Features
//!
//! - `csr-gen` (default): Enables CSR generation helpers using `rcgen`
//!
//! ## Transport
//!
//! - TLS 1.2 or later required
//! - Client certificate authentication only; no bearer tokens

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod certstore;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod profile;
pub mod selector;
pub mod tls;
pub mod types;

#[cfg(feature = "csr-gen")]
pub mod csr;

// Re-export main types at crate root for convenience
pub use certstore::{CertificateStore, ClientCertificate};
pub use client::AdminClient;
pub use config::{ClientConfig, ClientConfigBuilder, ClientIdentity, TrustAnchors};
pub use error::{ClientError, Result};
pub use selector::{CertificatePrompt, select_client_certificate};
pub use types::{
    EnrollRequest, EnrolledCertificate, ExportFormat, ExportRequest, SignRequest, SignResponse,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent string for HTTP requests.
pub const USER_AGENT: &str = concat!("ejbca-admin-client/", env!("CARGO_PKG_VERSION"));
