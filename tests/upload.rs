// Uploads against a throwaway HTTP server on localhost. Each server answers
// a fixed list of responses, one per connection, and hands back the raw
// requests it received.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use imgbb_upload::{ImgbbClient, UploadError, Uploader};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

struct StubServer {
    url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/1/upload", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                requests.push(handle_connection(stream, status, body));
            }
            requests
        });
        StubServer { url, handle }
    }

    fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn handle_connection(stream: TcpStream, status: u16, body: &str) -> String {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap();
        }
        head.push_str(&line);
        if line == "\r\n" || line.is_empty() {
            break;
        }
    }
    let mut request_body = vec![0; content_length];
    reader.read_exact(&mut request_body).unwrap();

    let response = format!(
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();

    head + String::from_utf8_lossy(&request_body).as_ref()
}

const OK_BODY: &str = r#"{"data":{"id":"abc","url":"https://i.ibb.co/abc/cat.png","display_url":"https://i.ibb.co/abc/cat.png"},"success":true,"status":200}"#;

#[test]
fn test_upload_returns_url_and_sends_form_fields() {
    let server = StubServer::start(vec![(200, OK_BODY)]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into())).unwrap();

    let url = client.upload(b"hello").unwrap();
    assert_eq!(url, "https://i.ibb.co/abc/cat.png");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with("POST /1/upload "));
    assert!(request.contains("multipart/form-data"));
    assert!(request.contains("name=\"key\"\r\n\r\ntest-key"));
    // base64("hello")
    assert!(request.contains("name=\"image\"\r\n\r\naGVsbG8="));
}

#[test]
fn test_non_200_is_http_status_error() {
    let server = StubServer::start(vec![(
        400,
        r#"{"status_code":400,"error":{"message":"Empty upload source.","code":130},"status_txt":"Bad Request"}"#,
    )]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into())).unwrap();

    match client.upload(b"").unwrap_err() {
        UploadError::HttpStatus { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message.as_deref(), Some("Empty upload source."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.requests();
}

#[test]
fn test_missing_url_is_response_format_error() {
    let server = StubServer::start(vec![(200, r#"{"success":true,"status":200}"#)]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into())).unwrap();

    let err = client.upload(b"img").unwrap_err();
    assert!(matches!(err, UploadError::ResponseFormat { .. }));
    server.requests();
}

#[test]
fn test_connection_refused_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = ImgbbClient::new(format!("http://{addr}/1/upload"), Some("test-key".into())).unwrap();

    let err = client.upload(b"img").unwrap_err();
    assert!(matches!(err, UploadError::Network(_)));
}

#[test]
fn test_server_error_is_retried() {
    let server = StubServer::start(vec![(503, "{}"), (200, OK_BODY)]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into()))
        .unwrap()
        .with_retries(1);

    let url = client.upload(b"img").unwrap();
    assert_eq!(url, "https://i.ibb.co/abc/cat.png");
    assert_eq!(server.requests().len(), 2);
}

#[test]
fn test_client_error_is_not_retried() {
    let server = StubServer::start(vec![(400, "{}")]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into()))
        .unwrap()
        .with_retries(3);

    let err = client.upload(b"img").unwrap_err();
    assert!(matches!(err, UploadError::HttpStatus { status, .. } if status == StatusCode::BAD_REQUEST));
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_upload_file_reads_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    std::fs::write(&path, b"hello").unwrap();

    let server = StubServer::start(vec![(200, OK_BODY)]);
    let client = ImgbbClient::new(server.url.clone(), Some("test-key".into())).unwrap();

    assert_eq!(client.upload_file(&path).unwrap(), "https://i.ibb.co/abc/cat.png");
    assert!(server.requests()[0].contains("aGVsbG8="));
}
