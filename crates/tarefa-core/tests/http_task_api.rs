//! HttpTaskApi against a local mock HTTP server.
//!
//! The mock accepts one request per connection, records it, and answers with
//! a canned response (`Connection: close`).

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tarefa_core::domain::{AccessToken, ApiError, NewTask, Prioridade, TaskId};
use tarefa_core::impls::HttpTaskApi;
use tarefa_core::ports::TaskApi;

#[derive(Debug)]
struct Recorded {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Canned {
    status: u16,
    body: String,
}

fn ok_json(value: Value) -> Canned {
    Canned {
        status: 200,
        body: value.to_string(),
    }
}

/// Serves `responses` in order, one per connection, and returns the base URL.
async fn serve(responses: Vec<Canned>) -> (String, mpsc::UnboundedReceiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let recorded = read_request(&mut stream).await;
            let _ = tx.send(recorded);

            let reason = match canned.status {
                200 => "OK",
                201 => "Created",
                204 => "No Content",
                404 => "Not Found",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.status,
                reason,
                canned.body.len(),
                canned.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (base, rx)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("read request");
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.expect("read body");
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Recorded {
        method,
        path,
        headers,
        body,
    }
}

// 環境のプロキシ設定に左右されないようにする
fn api(base: impl Into<String>) -> HttpTaskApi {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpTaskApi::with_client(client, base)
}

fn token() -> AccessToken {
    AccessToken::new("hdr.payload.sig")
}

#[tokio::test]
async fn list_sends_bearer_and_parses_tasks() {
    let (base, mut rx) = serve(vec![ok_json(json!([
        { "id": 1, "titulo": "T", "descricao": "D", "prioridade": "ALTA", "email": "a@example.com" },
        { "id": 2, "titulo": "U", "descricao": "E", "prioridade": "BAIXA", "email": "b@example.com" }
    ]))])
    .await;
    let api = api(base);

    let tasks = api.list(&token()).await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::Number(1));
    assert_eq!(tasks[1].prioridade, Some(Prioridade::Baixa));

    let req = rx.recv().await.unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/tarefa");
    assert_eq!(req.header("authorization"), Some("Bearer hdr.payload.sig"));
}

#[tokio::test]
async fn create_posts_json_body() {
    let (base, mut rx) = serve(vec![Canned {
        status: 201,
        body: json!({ "id": 9, "titulo": "T", "descricao": "D", "prioridade": "ALTA", "email": "a@example.com" })
            .to_string(),
    }])
    .await;
    let api = api(format!("{base}/"));

    api.create(&token(), &NewTask::new("T", "D", Some(Prioridade::Alta)))
        .await
        .unwrap();

    let req = rx.recv().await.unwrap();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/tarefa");
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("authorization"), Some("Bearer hdr.payload.sig"));
    let body: Value = serde_json::from_slice(&req.body).unwrap();
    assert_eq!(body, json!({ "titulo": "T", "descricao": "D", "prioridade": "ALTA" }));
}

#[tokio::test]
async fn delete_targets_item_path() {
    let (base, mut rx) = serve(vec![Canned {
        status: 204,
        body: String::new(),
    }])
    .await;
    let api = api(base);

    api.delete(&token(), &TaskId::Number(42)).await.unwrap();

    let req = rx.recv().await.unwrap();
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/tarefa/42");
    assert_eq!(req.header("authorization"), Some("Bearer hdr.payload.sig"));
}

#[tokio::test]
async fn delete_encodes_text_id_segment() {
    let (base, mut rx) = serve(vec![Canned {
        status: 204,
        body: String::new(),
    }])
    .await;
    let api = api(base);

    api.delete(&token(), &TaskId::from("a/b c")).await.unwrap();

    let req = rx.recv().await.unwrap();
    assert_eq!(req.path, "/tarefa/a%2Fb%20c");
}

#[tokio::test]
async fn delete_with_error_status_still_succeeds() {
    let (base, _rx) = serve(vec![Canned {
        status: 404,
        body: "{}".to_string(),
    }])
    .await;
    let api = api(base);

    assert!(api.delete(&token(), &TaskId::from("gone")).await.is_ok());
}

#[tokio::test]
async fn list_with_error_status_is_an_error() {
    let (base, _rx) = serve(vec![Canned {
        status: 500,
        body: "boom".to_string(),
    }])
    .await;
    let api = api(base);

    let err = api.list(&token()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, ref body } if body == "boom"));
}

#[tokio::test]
async fn list_with_invalid_json_is_a_decode_error() {
    let (base, _rx) = serve(vec![Canned {
        status: 200,
        body: "{\"not\":\"a list\"}".to_string(),
    }])
    .await;
    let api = api(base);

    let err = api.list(&token()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // bind して即座に閉じたポートには誰も listen していない
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = api(format!("http://{addr}"));

    let err = api.list(&token()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
