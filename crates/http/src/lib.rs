//! HTTP/1.1 over raw TCP, built up from bytes.
//!
//! This crate contains the protocol core of a small HTTP/1.1 server: an
//! incremental request parser that accepts a request in fragments of any size,
//! and a response writer that enforces the order in which a response is
//! written, including chunked bodies followed by trailers.
//!
//! Connections are one request long. There is no keep-alive, no pipelining and
//! no chunked request bodies.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use tcp_http::connection::{HttpConnection, ResponseWriter};
//! use tcp_http::handler::Handler;
//! use tcp_http::protocol::{default_headers, HttpError, Request};
//! use tokio::io::AsyncWrite;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler for HelloWorld {
//!     async fn handle<W>(&self, writer: &mut ResponseWriter<W>, _request: &Request) -> Result<(), HttpError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         let body = b"<h1>Hello world!</h1>";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     info!(port = 42069, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:42069").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(HelloWorld);
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!(cause = %e, "connection finished with error");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: [`Request`](protocol::Request), [`Headers`](protocol::Headers),
//!   the [`WriterState`](protocol::WriterState) machine and the error types
//! - [`codec`]: the [`RequestParser`](codec::RequestParser) state machine and
//!   the `tokio_util` decoder and encoder built on it
//! - [`connection`]: [`HttpConnection`](connection::HttpConnection) and
//!   [`ResponseWriter`](connection::ResponseWriter)
//! - [`handler`]: the [`Handler`](handler::Handler) trait implemented by
//!   route handlers

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
