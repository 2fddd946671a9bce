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

//! PKCS#10 enrollment (POST /ejbca-rest-api/v1/certificate/pkcs10enroll).
//!
//! EJBCA expects the request as PEM text inside a JSON body. These helpers
//! normalize whatever the caller has on disk into that form.

use rustls_pemfile::Item;
use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::types::enroll::pem_block;

/// Validate a DER-encoded CSR.
///
/// Only the outer structure is checked: the data must be a non-empty DER
/// SEQUENCE. The server performs full validation.
pub fn validate_csr(csr_der: &[u8]) -> Result<()> {
    if csr_der.is_empty() {
        return Err(ClientError::invalid_pem("Empty CSR"));
    }

    if csr_der[0] != 0x30 {
        return Err(ClientError::invalid_pem("Invalid CSR: not a SEQUENCE"));
    }

    Ok(())
}

/// Turn CSR file contents into the PEM text EJBCA expects.
///
/// Accepts either a PEM `CERTIFICATE REQUEST` block or raw DER.
pub fn csr_to_pem(data: &[u8]) -> Result<String> {
    let mut reader = data;
    match rustls_pemfile::read_one(&mut reader) {
        Ok(Some(Item::Csr(csr))) => {
            validate_csr(csr.as_ref())?;
            Ok(pem_block("CERTIFICATE REQUEST", csr.as_ref()))
        }
        Ok(Some(_)) => Err(ClientError::invalid_pem(
            "Expected a CERTIFICATE REQUEST block",
        )),
        Ok(None) | Err(_) => {
            validate_csr(data)?;
            Ok(pem_block("CERTIFICATE REQUEST", data))
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error_message: Option<String>,
}

/// Extract the operator-facing message from an EJBCA error body.
///
/// EJBCA reports failures as `{"error_code": 400, "error_message": "..."}`;
/// anything else is returned as-is.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_message)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_csr() {
        assert!(validate_csr(&[]).is_err());
        assert!(validate_csr(&[0x04, 0x00]).is_err());
        assert!(validate_csr(&[0x30, 0x00]).is_ok());
    }

    #[test]
    fn test_der_csr_is_wrapped() {
        let pem = csr_to_pem(&[0x30, 0x03, 0x02, 0x01, 0x00]).unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----\n"));
        assert!(pem.ends_with("-----END CERTIFICATE REQUEST-----\n"));
    }

    #[test]
    fn test_pem_csr_passes_through() {
        let key = rcgen::KeyPair::generate().unwrap();
        let csr = rcgen::CertificateParams::new(vec!["device.example.com".to_string()])
            .unwrap()
            .serialize_request(&key)
            .unwrap();
        let original = csr.pem().unwrap();

        let pem = csr_to_pem(original.as_bytes()).unwrap();
        assert_eq!(
            pem.replace(['\r', '\n'], ""),
            original.replace(['\r', '\n'], "")
        );
    }

    #[test]
    fn test_certificate_pem_is_rejected() {
        let key = rcgen::KeyPair::generate().unwrap();
        let cert = rcgen::CertificateParams::new(vec!["x".to_string()])
            .unwrap()
            .self_signed(&key)
            .unwrap();
        assert!(csr_to_pem(cert.pem().as_bytes()).is_err());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"error_code":400,"error_message":"Wrong username or password"}"#),
            "Wrong username or password"
        );
        assert_eq!(error_message("Bad Request\n"), "Bad Request");
    }
}
