// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)

//! Integration tests for SignServer worker processing

use base64::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::integration::{MockEjbcaServer, fixtures};
use ejbca_admin_client::{ClientError, SignRequest};

#[tokio::test]
async fn test_sign_document() {
    let mock = MockEjbcaServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signserver/rest/v1/workers/PDFSigner/process"))
        .and(body_partial_json(json!({
            "data": BASE64_STANDARD.encode(b"%PDF-1.7 document"),
            "encoding": "BASE64",
            "metaData": {"REASON": "Approved"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": BASE64_STANDARD.encode(b"signed document"),
            "requestId": "1001",
            "archiveId": "7f3a",
            "metaData": {"pages": 3}
        })))
        .mount(mock.inner())
        .await;

    let client = fixtures::client_for(&mock.url());
    let request = SignRequest::new(b"%PDF-1.7 document").with_metadata("REASON", "Approved");
    let response = client.sign("PDFSigner", &request).await.expect("sign failed");

    assert_eq!(response.decoded_data().unwrap(), b"signed document");
    assert_eq!(response.request_id.as_deref(), Some("1001"));
    assert_eq!(response.archive_id.as_deref(), Some("7f3a"));
}

#[tokio::test]
async fn test_unknown_worker() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_sign("Missing", 404, json!({"error": "No such worker: Missing"}))
        .await;

    let client = fixtures::client_for(&mock.url());
    let err = client
        .sign("Missing", &SignRequest::new(b"x"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ClientError::RequestFailed { status: 404, .. }),
        "unexpected error: {err:?}"
    );
}
