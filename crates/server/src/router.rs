//! Dispatch of parsed requests to the route handlers.

use std::path::PathBuf;

use async_trait::async_trait;
use http::{header, HeaderValue, StatusCode};
use tcp_http::connection::ResponseWriter;
use tcp_http::handler::Handler;
use tcp_http::protocol::{default_headers, Headers, HttpError, Request};
use tokio::io::AsyncWrite;
use tracing::{debug, error};

use crate::config::ServerConfig;
use crate::proxy::Proxy;

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const INTERNAL_SERVER_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const SUCCESS_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

const FILE_NOT_FOUND: &[u8] = b"file not found";

const HTTPBIN_PREFIX: &str = "/httpbin/";

/// Where a request target leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    YourProblem,
    MyProblem,
    Video,
    /// The upstream path, without the `/httpbin/` prefix
    Httpbin(&'a str),
    Success,
}

impl<'a> Route<'a> {
    /// Matches the raw request target, which is compared as is.
    pub fn from_target(target: &'a str) -> Self {
        match target {
            "/yourproblem" => Route::YourProblem,
            "/myproblem" => Route::MyProblem,
            "/video" => Route::Video,
            _ => match target.strip_prefix(HTTPBIN_PREFIX) {
                Some(path) => Route::Httpbin(path),
                None => Route::Success,
            },
        }
    }
}

/// The [`Handler`] serving every route of the server.
#[derive(Debug, Clone)]
pub struct Router {
    video_path: PathBuf,
    proxy: Proxy,
}

impl Router {
    pub fn new(config: &ServerConfig) -> Self {
        Self { video_path: config.video_path.clone(), proxy: Proxy::new(config.upstream.clone()) }
    }

    async fn video<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), HttpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let video = match tokio::fs::read(&self.video_path).await {
            Ok(video) => video,
            Err(e) => {
                error!(cause = %e, path = %self.video_path.display(), "can't read video");
                let headers = default_headers(FILE_NOT_FOUND.len());
                return send(writer, StatusCode::INTERNAL_SERVER_ERROR, &headers, FILE_NOT_FOUND).await;
            }
        };

        let mut headers = default_headers(video.len());
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
        send(writer, StatusCode::OK, &headers, &video).await
    }
}

#[async_trait]
impl Handler for Router {
    async fn handle<W>(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HttpError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let route = Route::from_target(request.target());
        debug!(?route, "routing request");

        match route {
            Route::YourProblem => send_page(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            Route::MyProblem => send_page(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_PAGE).await,
            Route::Video => self.video(writer).await,
            Route::Httpbin(path) => self.proxy.forward(writer, path).await,
            Route::Success => send_page(writer, StatusCode::OK, SUCCESS_PAGE).await,
        }
    }
}

async fn send_page<W>(writer: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> Result<(), HttpError>
where
    W: AsyncWrite + Unpin + Send,
{
    send(writer, status, &default_headers(page.len()), page.as_bytes()).await
}

async fn send<W>(writer: &mut ResponseWriter<W>, status: StatusCode, headers: &Headers, body: &[u8]) -> Result<(), HttpError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_status_line(status).await?;
    writer.write_headers(headers).await?;
    writer.write_body(body).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, Version};
    use tcp_http::protocol::RequestLine;

    fn get(target: &str) -> Request {
        let line = RequestLine::new(Method::GET, target.to_string(), Version::HTTP_11);
        Request::new(line, Headers::new(), Bytes::new())
    }

    fn router_with_video(video_path: PathBuf) -> Router {
        Router::new(&ServerConfig { video_path, ..ServerConfig::default() })
    }

    async fn respond(router: &Router, target: &str) -> String {
        let mut writer = ResponseWriter::new(Vec::new());
        router.handle(&mut writer, &get(target)).await.unwrap();
        String::from_utf8_lossy(writer.get_ref()).into_owned()
    }

    #[test]
    fn routes() {
        assert_eq!(Route::from_target("/yourproblem"), Route::YourProblem);
        assert_eq!(Route::from_target("/myproblem"), Route::MyProblem);
        assert_eq!(Route::from_target("/video"), Route::Video);
        assert_eq!(Route::from_target("/httpbin/stream/100"), Route::Httpbin("stream/100"));
        assert_eq!(Route::from_target("/httpbin/"), Route::Httpbin(""));
        assert_eq!(Route::from_target("/httpbin"), Route::Success);
        assert_eq!(Route::from_target("/"), Route::Success);
        assert_eq!(Route::from_target("/yourproblem/"), Route::Success);
        assert_eq!(Route::from_target("/video?t=1"), Route::Success);
    }

    #[tokio::test]
    async fn your_problem() {
        let response = respond(&Router::new(&ServerConfig::default()), "/yourproblem").await;

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.contains(&format!("content-length: {}\r\n", BAD_REQUEST_PAGE.len())));
        assert!(response.ends_with(BAD_REQUEST_PAGE));
    }

    #[tokio::test]
    async fn my_problem() {
        let response = respond(&Router::new(&ServerConfig::default()), "/myproblem").await;

        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.ends_with(INTERNAL_SERVER_ERROR_PAGE));
    }

    #[tokio::test]
    async fn success() {
        let response = respond(&Router::new(&ServerConfig::default()), "/coffee").await;

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("content-type: text/html\r\n"));
        assert!(response.ends_with(SUCCESS_PAGE));
    }

    #[tokio::test]
    async fn video() {
        let path = std::env::temp_dir().join(format!("httpfromtcp-video-{}.mp4", std::process::id()));
        tokio::fs::write(&path, b"not really a video").await.unwrap();

        let response = respond(&router_with_video(path.clone()), "/video").await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("content-type: video/mp4\r\n"));
        assert!(response.contains("content-length: 18\r\n"));
        assert!(response.ends_with("\r\n\r\nnot really a video"));
    }

    #[tokio::test]
    async fn missing_video() {
        let response = respond(&router_with_video(PathBuf::from("/nonexistent/vim.mp4")), "/video").await;

        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.contains("content-length: 14\r\n"));
        assert!(response.ends_with("\r\n\r\nfile not found"));
    }
}
