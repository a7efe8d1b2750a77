use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tcp_http::connection::HttpConnection;
use tcp_http::handler::Handler;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::ServerError;

/// A running accept loop.
///
/// Every accepted connection is served on its own task by an
/// [`HttpConnection`] and the shared handler. Connections share nothing but the
/// handler.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_loop: JoinHandle<()>,
}

impl Server {
    /// Binds `address` and starts accepting connections in the background.
    pub async fn serve<A, H>(address: A, handler: H) -> Result<Self, ServerError>
    where
        A: ToSocketAddrs + std::fmt::Debug,
        H: Handler + 'static,
    {
        let tcp_listener = match TcpListener::bind(&address).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, ?address, "bind server error");
                return Err(ServerError::bind(format!("{address:?}"), e));
            }
        };
        let local_addr = tcp_listener.local_addr()?;
        info!(%local_addr, "start listening");

        let running = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());
        let accept_loop = tokio::spawn(accept_loop(tcp_listener, Arc::new(handler), Arc::clone(&running), Arc::clone(&shutdown)));

        Ok(Self { local_addr, running, shutdown, accept_loop })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops accepting new connections. Connections already accepted run to
    /// completion. Calling this more than once has no further effect.
    pub fn close(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!(local_addr = %self.local_addr, "closing server");
            self.shutdown.notify_one();
        }
    }

    /// Waits until the accept loop has exited and the listener is closed.
    pub async fn join(self) {
        if let Err(e) = self.accept_loop.await {
            error!(cause = %e, "accept loop failed");
        }
    }
}

async fn accept_loop<H>(tcp_listener: TcpListener, handler: Arc<H>, running: Arc<AtomicBool>, shutdown: Arc<Notify>)
where
    H: Handler + 'static,
{
    loop {
        let (tcp_stream, remote_addr) = tokio::select! {
            () = shutdown.notified() => break,
            accepted = tcp_listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    if !running.load(Ordering::Acquire) {
                        break;
                    }
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(cause = %e, %remote_addr, "service has error, connection shutdown");
                }
            }
        });
    }

    info!("accept loop stopped");
}
