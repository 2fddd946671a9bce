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

//! Integration tests for the configdump export

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::integration::{MockEjbcaServer, fixtures};
use ejbca_admin_client::types::paths;
use ejbca_admin_client::{ClientError, ExportFormat, ExportRequest};

const DUMP_JSON: &str = r#"{"certification-authorities":[{"Name":"ManagementCA"}]}"#;

#[tokio::test]
async fn test_export_json_writes_file() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    mock.mock_export_json(200, DUMP_JSON).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Json).outfile(dir.path().join("dump"));
    let path = client.export_config(&request).await.expect("export failed");

    assert_eq!(path, dir.path().join("dump.json"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), DUMP_JSON);

    let queries = mock.queries_for(paths::CONFIGDUMP).await;
    assert_eq!(
        queries,
        vec!["ignoreerrors=false&defaults=false&externalcas=false".to_string()]
    );
}

#[tokio::test]
async fn test_export_zip_sends_content_type() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    let archive = b"PK\x03\x04fake-archive".to_vec();
    mock.mock_export_zip(&archive).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Zip)
        .ignore_errors(true)
        .include_defaults(true)
        .include_external_cas(true)
        .outfile(dir.path().join("backup"));
    let path = client.export_config(&request).await.expect("export failed");

    assert_eq!(path, dir.path().join("backup.zip"));
    assert_eq!(std::fs::read(&path).unwrap(), archive);

    let queries = mock.queries_for(paths::CONFIGDUMP_ZIP).await;
    assert_eq!(
        queries,
        vec!["ignoreerrors=true&defaults=true&externalcas=true".to_string()]
    );
}

#[tokio::test]
async fn test_inclusion_list_query() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    mock.mock_export_json(200, DUMP_JSON).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Json)
        .include(["CA"])
        .exclude(["KEYBINDING", "OCSPCONFIG"])
        .outfile(dir.path().join("ca-only"));
    client.export_config(&request).await.expect("export failed");

    let queries = mock.queries_for(paths::CONFIGDUMP).await;
    assert_eq!(queries.len(), 1);
    let query = &queries[0];

    assert_eq!(query.matches("exclude=").count(), 1);
    assert_eq!(query.matches("include=").count(), 1);
    assert!(query.contains("exclude=%2A%3A%2A"), "query: {query}");
    assert!(query.contains("include=CA%3A%2A"), "query: {query}");
    assert!(!query.contains("KEYBINDING"));
    assert!(!query.contains("OCSPCONFIG"));
}

#[tokio::test]
async fn test_exclusion_list_query() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    mock.mock_export_json(200, DUMP_JSON).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Json)
        .exclude(["KEYBINDING", "OCSPCONFIG"])
        .outfile(dir.path().join("no-bindings"));
    client.export_config(&request).await.expect("export failed");

    let requests = mock.requests().await;
    let export = requests
        .iter()
        .find(|r| r.url.path() == paths::CONFIGDUMP)
        .expect("export request sent");

    let excludes: Vec<String> = export
        .url
        .query_pairs()
        .filter(|(k, _)| k == "exclude")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(excludes, ["KEYBINDING:*", "OCSPCONFIG:*"]);
    assert!(export.url.query_pairs().all(|(k, _)| k != "include"));
}

#[tokio::test]
async fn test_health_check_not_found() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(404).await;
    mock.mock_export_json(200, DUMP_JSON).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Json).outfile(dir.path().join("dump"));
    let err = client.export_config(&request).await.unwrap_err();

    assert!(
        matches!(err, ClientError::EndpointUnavailable { .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.hint().is_some_and(|h| h.contains("REST Configdump")));
    assert!(err.operator_message().contains("REST Configdump"));

    assert!(!dir.path().join("dump.json").exists());
    assert!(mock.queries_for(paths::CONFIGDUMP).await.is_empty());
}

#[tokio::test]
async fn test_export_bad_request() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    mock.mock_export_json(
        400,
        r#"{"error_code":400,"error_message":"Unknown item type 'CAA'"}"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_for(&mock.url());

    let request = ExportRequest::new(ExportFormat::Json)
        .include(["CAA"])
        .outfile(dir.path().join("dump"));
    let err = client.export_config(&request).await.unwrap_err();

    match err {
        ClientError::RequestFailed { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Unknown item type 'CAA'");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("dump.json").exists());
}

#[tokio::test]
async fn test_unreachable_server() {
    let client = fixtures::client_for("http://127.0.0.1:1");

    let err = client.configdump_status().await.unwrap_err();
    match err {
        ClientError::EndpointUnavailable { hint, .. } => assert!(hint.is_none()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_status_ok() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;

    let client = fixtures::client_for(&mock.url());
    assert!(client.configdump_status().await.is_ok());
    assert_eq!(mock.queries_for(paths::CONFIGDUMP_STATUS).await.len(), 1);
}

#[tokio::test]
async fn test_export_timeout_after_health_check() {
    let mock = MockEjbcaServer::start().await;
    mock.mock_status(200).await;
    Mock::given(method("GET"))
        .and(path(paths::CONFIGDUMP))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DUMP_JSON)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(mock.inner())
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_with_timeout(&mock.url(), Duration::from_secs(1));

    let request = ExportRequest::new(ExportFormat::Json).outfile(dir.path().join("dump"));
    let err = client.export_config(&request).await.unwrap_err();

    match err {
        ClientError::Http(e) => assert!(e.is_timeout(), "unexpected error: {e:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("dump.json").exists());
}

/// Read one request head and return its request line.
async fn read_request_line(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Server whose export trickles out in chunks, each gap shorter than the
/// client's read timeout but the whole body slower than it.
async fn start_slow_export_server(chunks: usize, gap: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let request_line = read_request_line(&mut socket).await;
                if request_line.contains("/configdump/status") {
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await;
                    return;
                }

                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
                    )
                    .await;
                for _ in 0..chunks {
                    tokio::time::sleep(gap).await;
                    let _ = socket.write_all(b"5\r\nchunk\r\n").await;
                    let _ = socket.flush().await;
                }
                let _ = socket.write_all(b"0\r\n\r\n").await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_slow_download_outlasts_timeout() {
    let url = start_slow_export_server(6, Duration::from_millis(300)).await;

    let dir = tempfile::tempdir().unwrap();
    let client = fixtures::client_with_timeout(&url, Duration::from_secs(1));

    let request = ExportRequest::new(ExportFormat::Json).outfile(dir.path().join("slow"));
    let path = client.export_config(&request).await.expect("export failed");

    assert_eq!(std::fs::read_to_string(path).unwrap(), "chunk".repeat(6));
}
