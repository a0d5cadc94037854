//! Local stand-in for the account-check endpoint.
//!
//! Accepts HTTP/1.1 connections, records each request head, and answers with
//! whatever the handler decides. Works as a plain HTTP proxy too: requests
//! routed through it arrive in absolute form.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request head as received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Header names exactly as sent, with values, sorted by name. `Host` and
    /// proxy bookkeeping headers are left out.
    pub fn wire_headers_except_host(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(k, _)| {
                !k.eq_ignore_ascii_case("host") && !k.to_ascii_lowercase().starts_with("proxy-")
            })
            .cloned()
            .collect();
        headers.sort();
        headers
    }

    /// Decoded query parameters, in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let absolute = if self.target.starts_with("http") {
            self.target.clone()
        } else {
            format!("http://mock{}", self.target)
        };
        reqwest::Url::parse(&absolute)
            .map(|url| url.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }

    /// Raw query string as sent.
    pub fn raw_query(&self) -> &str {
        self.target.split_once('?').map(|(_, q)| q).unwrap_or("")
    }

    pub fn username(&self) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == "username")
            .map(|(_, v)| v)
    }
}

/// What the mock does with a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status code and body
    Respond(u16, String),
    /// Close the socket without answering
    Drop,
    /// Never answer
    Hang,
}

impl Reply {
    pub fn json(body: serde_json::Value) -> Self {
        Reply::Respond(200, body.to_string())
    }

    pub fn status(code: u16) -> Self {
        Reply::Respond(code, "{}".to_string())
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

pub struct MockEndpoint {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockEndpoint {
    /// Answer every request with the same reply.
    pub async fn start(reply: Reply) -> Self {
        Self::start_with(move |_| reply.clone()).await
    }

    /// Answer each request with `handler(request)`.
    pub async fn start_with<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        let recorded = recorded.clone();
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            serve_one(socket, recorded, handler).await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, requests }
    }

    /// URL of the check path on this mock.
    pub fn url(&self) -> String {
        format!("http://{}/accounts/check", self.addr)
    }

    /// URL to use when the mock acts as an HTTP proxy.
    pub fn proxy_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve_one(
    mut socket: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    handler: Handler,
) {
    let Some(request) = read_head(&mut socket).await else {
        return;
    };
    recorded.lock().unwrap().push(request.clone());

    match handler(&request) {
        Reply::Respond(code, body) => {
            let response = format!(
                "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                code,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        Reply::Drop => drop(socket),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}

async fn read_head(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 || buf.len() > 64 * 1024 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(RecordedRequest {
        method,
        target,
        headers,
    })
}
