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

//! TOML profile files.
//!
//! A profile holds the settings an administrator would otherwise repeat on
//! every invocation. Command-line flags override it.
//!
//! # Example Profile
//!
//! ```toml
//! [server]
//! url = "https://ejbca.example.com:8443"
//!
//! [trust]
//! mode = "explicit"
//! ca_bundle_path = "/etc/ejbca-admin/ManagementCA.pem"
//!
//! [identity]
//! serial = "1A:2B:3C"
//!
//! [configdump]
//! format = "zip"
//! exclude = ["KEYBINDING", "OCSPCONFIG"]
//! ```

mod config;
mod loader;

pub use config::{
    AdminProfile, ConfigdumpConfig, EnrollConfig, IdentityConfig, LoggingConfig, ServerConfig,
    SignServerConfig, TrustConfig, TrustMode,
};
pub use loader::{CONFIG_ENV_VAR, ConfigLoader, default_config_path, write_default_config};
