//! One-shot local HTTP server for client tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Build a raw HTTP/1.1 response.
pub fn http_response(status: &str, content_type: Option<&str>, body: &[u8]) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    if let Some(content_type) = content_type {
        head.push_str(&format!("Content-Type: {content_type}\r\n"));
    }
    head.push_str("\r\n");

    let mut response = head.into_bytes();
    response.extend_from_slice(body);
    response
}

/// Serve `response` to the first connection.
///
/// Returns the base URL to point a client at, and a handle resolving to the
/// raw request head the client sent.
pub async fn serve_once(response: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        respond(&mut socket, &response).await
    });

    (format!("http://{addr}"), handle)
}

/// Serve `responses` in order, one per connection, then stop listening.
///
/// Connections after the last response are refused.
pub async fn serve_sequence(responses: Vec<Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            respond(&mut socket, &response).await;
        }
    });

    format!("http://{addr}")
}

/// Read one request head, write `response` and close.
async fn respond(socket: &mut TcpStream, response: &[u8]) -> String {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..n]);
        if request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    socket.write_all(response).await.unwrap();
    socket.shutdown().await.unwrap();
    String::from_utf8_lossy(&request).into_owned()
}
