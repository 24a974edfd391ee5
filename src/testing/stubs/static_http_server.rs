use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Body and content type of one `200 OK` reply.
pub struct CannedResponse {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn new(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type,
            body: body.into(),
        }
    }
}

/// Local HTTP server that answers one connection per canned response, in
/// order, and then stops listening.
pub struct StaticHttpServer {
    base: String,
    worker: JoinHandle<Vec<String>>,
}

impl StaticHttpServer {
    pub fn serve(responses: Vec<CannedResponse>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base = format!("http://{}", listener.local_addr()?);
        let worker = thread::spawn(move || {
            let mut requests = Vec::new();
            for reply in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };
                requests.push(read_request_line(&mut stream));
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    reply.content_type,
                    reply.body.len()
                );
                let _ = stream
                    .write_all(head.as_bytes())
                    .and_then(|_| stream.write_all(&reply.body));
            }
            requests
        });
        Ok(Self { base, worker })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Request lines seen, in order. Blocks until every response was served.
    pub fn requests(self) -> Vec<String> {
        self.worker.join().unwrap_or_default()
    }
}

fn read_request_line(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
