// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Integration tests for POST /certificate/pkcs10enroll

use base64::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::integration::{MockEjbcaServer, fixtures};
use ejbca_admin_client::csr::CsrBuilder;
use ejbca_admin_client::types::paths;
use ejbca_admin_client::{ClientError, EnrollRequest};

fn request() -> EnrollRequest {
    let generated = CsrBuilder::new()
        .common_name("ra-officer")
        .extended_key_usage_client_auth()
        .build()
        .expect("CSR generation failed");

    EnrollRequest::new(generated.csr_pem, "ra-officer")
        .certificate_profile("ENDUSER")
        .end_entity_profile("EMPTY")
        .certificate_authority("ManagementCA")
        .password("foo123")
}

#[tokio::test]
async fn test_successful_enrollment() {
    let mock = MockEjbcaServer::start().await;

    let issued = fixtures::generate("ra-officer", &[0x4F, 0x10], true);
    let ca = fixtures::generate("ManagementCA", &[0x01], false);

    Mock::given(method("POST"))
        .and(path(paths::PKCS10_ENROLL))
        .and(body_partial_json(json!({
            "certificate_profile_name": "ENDUSER",
            "end_entity_profile_name": "EMPTY",
            "certificate_authority_name": "ManagementCA",
            "username": "ra-officer",
            "include_chain": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "certificate": BASE64_STANDARD.encode(&issued.cert_der),
            "serial_number": "4F10",
            "response_format": "DER",
            "certificate_chain": [BASE64_STANDARD.encode(&ca.cert_der)]
        })))
        .mount(mock.inner())
        .await;

    let client = fixtures::client_for(&mock.url());
    let enrolled = client.enroll_pkcs10(&request()).await.expect("enroll failed");

    assert_eq!(enrolled.serial_number.as_deref(), Some("4F10"));
    assert_eq!(enrolled.certificate, issued.cert_der);
    assert_eq!(enrolled.chain.len(), 1);
    assert!(enrolled.parse().is_ok());

    let pem = enrolled.to_pem();
    assert_eq!(pem.matches("-----BEGIN CERTIFICATE-----").count(), 2);
}

#[tokio::test]
async fn test_enrollment_rejected() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_enroll(
        400,
        json!({"error_code": 400, "error_message": "Wrong username or password"}),
    )
    .await;

    let client = fixtures::client_for(&mock.url());
    let err = client.enroll_pkcs10(&request()).await.unwrap_err();

    match err {
        ClientError::RequestFailed { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Wrong username or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_enrollment_malformed_response() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_enroll(200, json!({"certificate": "not base64!!"})).await;

    let client = fixtures::client_for(&mock.url());
    let err = client.enroll_pkcs10(&request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Base64(_)), "unexpected error: {err:?}");
}
