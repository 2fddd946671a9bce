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

//! Request and response types for the EJBCA and SignServer REST APIs.

mod configdump;
pub(crate) mod enroll;
mod sign;

pub use configdump::{DEFAULT_OUTFILE, ExportFormat, ExportRequest, ItemFilter};
pub use enroll::{EnrollRequest, EnrollResponse, EnrolledCertificate};
pub use sign::{SignRequest, SignResponse};

/// Content types used by the REST APIs.
pub mod content_types {
    /// Configdump ZIP archive.
    pub const ZIP: &str = "application/zip";
}

/// REST endpoint paths.
pub mod paths {
    /// Configuration export as JSON.
    pub const CONFIGDUMP: &str = "/ejbca-rest-api/v1/configdump";

    /// Configdump availability check.
    pub const CONFIGDUMP_STATUS: &str = "/ejbca-rest-api/v1/configdump/status";

    /// Configuration export as a ZIP archive.
    pub const CONFIGDUMP_ZIP: &str = "/ejbca-rest-api/v1/configdump/configdump.zip";

    /// PKCS#10 enrollment.
    pub const PKCS10_ENROLL: &str = "/ejbca-rest-api/v1/certificate/pkcs10enroll";

    /// Prefix of the SignServer worker endpoints.
    pub const SIGNSERVER_WORKERS: &str = "/signserver/rest/v1/workers";
}
