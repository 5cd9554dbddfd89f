#![allow(dead_code)]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use relaycache_core::ProxyConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type Responder = Arc<dyn Fn(&str) -> Vec<u8> + Send + Sync>;

/// Origin server stand-in that counts connections and answers by request path.
pub struct StubOrigin {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<std::sync::Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubOrigin {
    /// Plain-text origin whose body names the requested path.
    pub async fn echo_path() -> Result<Self> {
        Self::spawn(Arc::new(|path: &str| {
            format!("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nbody for {path}").into_bytes()
        }))
        .await
    }

    /// HTML origin returning `body` for every path.
    pub async fn html(body: &'static str) -> Result<Self> {
        Self::spawn(Arc::new(move |_: &str| {
            format!("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n{body}").into_bytes()
        }))
        .await
    }

    pub fn host(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    async fn spawn(responder: Responder) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(std::sync::Mutex::new(Vec::new()));

        let task_hits = Arc::clone(&hits);
        let task_requests = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                task_hits.fetch_add(1, Ordering::SeqCst);
                let responder = Arc::clone(&responder);
                let requests = Arc::clone(&task_requests);
                tokio::spawn(async move {
                    let _ = serve(&mut stream, responder, requests).await;
                });
            }
        });

        Ok(Self { addr, hits, requests, handle })
    }
}

impl Drop for StubOrigin {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    stream: &mut TcpStream, responder: Responder, requests: Arc<std::sync::Mutex<Vec<String>>>,
) -> Result<()> {
    let mut buf = vec![0u8; 4096];
    let mut received = Vec::new();
    while !received.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&received).into_owned();
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    requests.lock().unwrap().push(head);

    stream.write_all(&responder(&path)).await?;
    stream.shutdown().await?;
    Ok(())
}

/// A running proxy on an ephemeral port.
pub struct TestProxy {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestProxy {
    pub async fn start(cache_dir: &Path) -> Result<Self> {
        let config = ProxyConfig { port: 0, cache_dir: cache_dir.to_path_buf(), ..Default::default() };
        let acceptor = relaycache_server::build(&config).await?;
        let port = acceptor.local_addr()?.port();
        let handle = tokio::spawn(acceptor.run());
        Ok(Self { addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)), handle })
    }

    /// Send `request` on a fresh connection, half-close, and read until the proxy closes it.
    pub async fn send(&self, request: &str) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(request.as_bytes()).await?;
        stream.shutdown().await?;
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;
        Ok(response)
    }

    pub async fn get(&self, target: &str) -> Result<Vec<u8>> {
        self.send(&format!("GET {target} HTTP/1.1\r\nUser-Agent: relaycache-test\r\n\r\n")).await
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Wait briefly for a file matching `pred` to appear in `dir`.
pub async fn wait_for_file(dir: &Path, pred: impl Fn(&str) -> bool) -> Option<std::path::PathBuf> {
    for _ in 0..100 {
        let found = std::fs::read_dir(dir)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()).is_some_and(|n| pred(&n)));
        if found.is_some() {
            return found;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    None
}
