//! Minimal HTTP/1.1 server for adapter tests.
//!
//! Answers one request per connection, routed on the request path, and
//! records every request it sees.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type Handler = Arc<dyn Fn(&Value) -> (&'static str, String) + Send + Sync>;

/// Response rule for one path.
pub(crate) struct Route {
    path: &'static str,
    handler: Handler,
}

impl Route {
    /// Always answer `200 OK` with `body`.
    pub(crate) fn json(path: &'static str, body: Value) -> Self {
        let body = body.to_string();
        Self {
            path,
            handler: Arc::new(move |_| ("200 OK", body.clone())),
        }
    }

    /// Always answer with `status_line` and a raw body.
    pub(crate) fn status(path: &'static str, status_line: &'static str, body: &str) -> Self {
        let body = body.to_string();
        Self {
            path,
            handler: Arc::new(move |_| (status_line, body.clone())),
        }
    }

    /// Answer `200 OK` with a JSON body computed from the JSON request body.
    pub(crate) fn dynamic<F>(path: &'static str, respond: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            path,
            handler: Arc::new(move |request| ("200 OK", respond(request).to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    /// Request line and headers
    pub head: String,
    pub body: String,
}

impl RecordedRequest {
    pub(crate) fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

pub(crate) struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub(crate) async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move { serve(socket, &routes, &recorded).await });
            }
        });

        Self {
            base_url,
            requests,
            task,
        }
    }

    pub(crate) fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose request line names `path`.
    pub(crate) fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.head.split_whitespace().nth(1) == Some(path))
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut socket: TcpStream,
    routes: &[Route],
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let request = read_request(&mut socket).await;
    let path = request.head.split_whitespace().nth(1).unwrap_or("").to_string();
    let body_json = request.json();
    recorded.lock().unwrap().push(request);

    let (status_line, body) = match routes.iter().find(|r| r.path == path) {
        Some(route) => (route.handler)(&body_json),
        None => ("404 Not Found", format!("no route for {}", path)),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    socket.shutdown().await.ok();
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut header_end = None;
    let mut content_length = 0;

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if header_end.is_none()
            && let Some(end) = find_header_end(&buf)
        {
            header_end = Some(end);
            content_length = String::from_utf8_lossy(&buf[..end])
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
        }
        if let Some(end) = header_end
            && buf.len() >= end + 4 + content_length
        {
            break;
        }
    }

    let end = header_end.unwrap_or(buf.len());
    let body_start = (end + 4).min(buf.len());
    RecordedRequest {
        head: String::from_utf8_lossy(&buf[..end]).into_owned(),
        body: String::from_utf8_lossy(&buf[body_start..]).into_owned(),
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
