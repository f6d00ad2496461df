//! Tests for the Vultr resource operations against a canned HTTP server.
//!
//! Each test serves exactly one scripted response on a loopback socket and
//! captures the raw request, so the wire contract (method, path, headers,
//! body, envelope unwrapping) is observed end-to-end without a real
//! provider.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use spinup::{InstanceSpec, VultrApi, VultrApiError};

const INSTANCE_BODY: &str = r#"{
    "instance": {
        "id": "abc123",
        "os": "FreeBSD 13 x64",
        "ram": 1024,
        "disk": 25,
        "main_ip": "203.0.113.7",
        "vcpu_count": 1,
        "region": "fra",
        "plan": "vc2-1c-1gb",
        "date_created": "2022-05-09T09:18:12+00:00",
        "status": "active",
        "label": "build-box",
        "os_id": 447,
        "default_password": "s3cret!"
    }
}"#;

const SSH_KEYS_BODY: &str = r#"{
    "ssh_keys": [
        {"id": "a", "date_created": "2021-01-01T00:00:00+00:00", "name": "laptop", "ssh_key": "ssh-ed25519 AAA"},
        {"id": "b", "date_created": "2021-02-01T00:00:00+00:00", "name": "ci", "ssh_key": "ssh-ed25519 BBB"}
    ],
    "meta": {"total": 2, "links": {"next": "", "prev": ""}}
}"#;

/// Serves one scripted response on a loopback socket, returning the base
/// URL and a handle resolving to the raw request that was received.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|err| panic!("bind listener: {err}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("listener addr: {err}"));

    let handle = tokio::spawn(async move {
        let (mut stream, _peer) = listener
            .accept()
            .await
            .unwrap_or_else(|err| panic!("accept: {err}"));
        let request = read_request(&mut stream).await;

        let mut response = format!("HTTP/1.1 {status_line}\r\nconnection: close\r\n");
        if !body.is_empty() {
            response.push_str("content-type: application/json\r\n");
            response.push_str(&format!("content-length: {}\r\n", body.len()));
        }
        response.push_str("\r\n");
        response.push_str(body);

        stream
            .write_all(response.as_bytes())
            .await
            .unwrap_or_else(|err| panic!("write response: {err}"));
        stream.shutdown().await.ok();
        request
    });

    (format!("http://{addr}"), handle)
}

/// Reads one HTTP/1.1 request (headers plus content-length body).
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let read = stream
            .read(&mut chunk)
            .await
            .unwrap_or_else(|err| panic!("read request: {err}"));
        if read == 0 {
            break;
        }
        buf.extend_from_slice(chunk.get(..read).unwrap_or_default());

        let Some(headers_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") else {
            continue;
        };
        let (head, tail) = buf.split_at(headers_end + 4);
        let headers = String::from_utf8_lossy(head).to_lowercase();
        if tail.len() >= content_length(&headers) {
            break;
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

fn api(base_url: &str) -> VultrApi {
    VultrApi::new("test-token").with_base_url(base_url)
}

fn spec() -> InstanceSpec {
    InstanceSpec::builder()
        .os_id(447)
        .region("fra")
        .plan("vc2-1c-1gb")
        .label(Some(String::from("build-box")))
        .build()
        .unwrap_or_else(|err| panic!("spec build failed: {err}"))
}

#[tokio::test]
async fn get_instance_unwraps_envelope_and_authenticates() {
    let (base, request) = serve_once("200 OK", INSTANCE_BODY).await;

    let instance = api(&base)
        .get_instance("abc123")
        .await
        .unwrap_or_else(|err| panic!("get_instance failed: {err}"));

    assert_eq!(instance.id, "abc123");
    assert_eq!(instance.main_ip, "203.0.113.7");
    assert_eq!(instance.status, "active");
    assert_eq!(instance.os_id, 447);

    let raw = request
        .await
        .unwrap_or_else(|err| panic!("server task failed: {err}"))
        .to_lowercase();
    assert!(raw.starts_with("get /instances/abc123 http/1.1"), "request: {raw}");
    assert!(raw.contains("authorization: bearer test-token"), "request: {raw}");
    assert!(raw.contains("content-type: application/json"), "request: {raw}");
}

#[tokio::test]
async fn create_instance_posts_payload_and_expects_202() {
    let (base, request) = serve_once("202 Accepted", INSTANCE_BODY).await;

    let instance = api(&base)
        .create_instance(&spec())
        .await
        .unwrap_or_else(|err| panic!("create_instance failed: {err}"));

    assert_eq!(instance.id, "abc123");
    assert_eq!(instance.default_password.as_deref(), Some("s3cret!"));

    let raw = request
        .await
        .unwrap_or_else(|err| panic!("server task failed: {err}"));
    let lower = raw.to_lowercase();
    assert!(lower.starts_with("post /instances http/1.1"), "request: {raw}");
    assert!(lower.contains("authorization: bearer test-token"), "request: {raw}");
    assert!(raw.contains(r#""region":"fra""#), "request: {raw}");
    assert!(raw.contains(r#""plan":"vc2-1c-1gb""#), "request: {raw}");
    assert!(raw.contains(r#""label":"build-box""#), "request: {raw}");
    assert!(raw.contains(r#""backups":"disabled""#), "request: {raw}");
}

#[tokio::test]
async fn create_instance_rejects_non_accepted_status() {
    let (base, _request) = serve_once("200 OK", INSTANCE_BODY).await;

    let err = api(&base)
        .create_instance(&spec())
        .await
        .expect_err("200 on create should fail");

    assert!(
        matches!(
            err,
            VultrApiError::UnexpectedStatus {
                got: 200,
                expected: 202,
                ..
            }
        ),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn unauthorized_maps_to_dedicated_error_kind() {
    let (base, _request) =
        serve_once("401 Unauthorized", r#"{"error":"Invalid API token"}"#).await;

    let err = api(&base)
        .get_instance("abc123")
        .await
        .expect_err("401 should fail");

    assert_eq!(err, VultrApiError::Unauthorized);
    assert!(
        err.to_string().contains("allow-listed"),
        "guidance missing from: {err}"
    );
}

#[tokio::test]
async fn delete_instance_accepts_204_without_decoding() {
    let (base, request) = serve_once("204 No Content", "").await;

    api(&base)
        .delete_instance("abc123")
        .await
        .unwrap_or_else(|err| panic!("delete_instance failed: {err}"));

    let raw = request
        .await
        .unwrap_or_else(|err| panic!("server task failed: {err}"))
        .to_lowercase();
    assert!(raw.starts_with("delete /instances/abc123 http/1.1"), "request: {raw}");
}

#[tokio::test]
async fn delete_instance_rejects_still_pending_202() {
    let (base, _request) = serve_once("202 Accepted", "{}").await;

    let err = api(&base)
        .delete_instance("abc123")
        .await
        .expect_err("202 on delete should fail");

    assert!(
        matches!(
            err,
            VultrApiError::UnexpectedStatus {
                got: 202,
                expected: 204,
                ..
            }
        ),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn list_ssh_keys_preserves_order_and_metadata() {
    let (base, request) = serve_once("200 OK", SSH_KEYS_BODY).await;

    let listing = api(&base)
        .list_ssh_keys()
        .await
        .unwrap_or_else(|err| panic!("list_ssh_keys failed: {err}"));

    let ids: Vec<&str> = listing.ssh_keys.iter().map(|key| key.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(listing.meta.total, 2);

    let raw = request
        .await
        .unwrap_or_else(|err| panic!("server task failed: {err}"))
        .to_lowercase();
    assert!(raw.starts_with("get /ssh-keys http/1.1"), "request: {raw}");
}

#[tokio::test]
async fn malformed_success_body_maps_to_decode_error() {
    let (base, _request) = serve_once("200 OK", "not json at all").await;

    let err = api(&base)
        .get_instance("abc123")
        .await
        .expect_err("malformed body should fail");

    assert!(matches!(err, VultrApiError::Decode(_)), "unexpected error: {err}");
}
