use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use relaycache_core::{Error, ProxyConfig};
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, error, info};

use crate::handler::RequestHandler;

/// Owns the listening socket and spawns one task per accepted connection.
#[derive(Debug)]
pub struct Acceptor {
    listener: TcpListener,
    handler: Arc<RequestHandler>,
}

impl Acceptor {
    /// Bind the configured port on all interfaces with `SO_REUSEADDR` and the configured backlog.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &ProxyConfig, handler: RequestHandler) -> Result<Self, Error> {
        let addr = config.listen_addr();
        let bind_err = |source: io::Error| Error::Bind { addr, source };

        let socket = TcpSocket::new_v4().map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let listener = socket.listen(config.backlog).map_err(bind_err)?;

        Ok(Self { listener, handler: Arc::new(handler) })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept forever. Handlers are detached; nothing waits on them and nothing caps their number.
    pub async fn run(self) {
        let local_addr = self.listener.local_addr().ok();
        info!(address = ?local_addr, "Proxy server is listening");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(err) => {
                    error!(error = %err, "failed to accept incoming connection");
                    continue;
                }
            };
            info!(peer = %peer, "Connection established");
            if let Err(err) = stream.set_nodelay(true) {
                debug!(peer = %peer, error = %err, "failed to set TCP_NODELAY on client stream");
            }

            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                handler.handle(stream, peer).await;
            });
        }
    }
}
