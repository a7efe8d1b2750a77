//! Core HTTP protocol types.
//!
//! - **Headers** ([`headers`]): the [`Headers`] collection with folding of repeated names
//! - **Request** ([`request`]): the parsed [`Request`] and its [`RequestLine`]
//! - **Response** ([`response`]): the [`WriterState`] machine and [`default_headers`]
//! - **Message** ([`message`]): [`ResponsePart`] and [`PayloadItem`], the units a
//!   response is encoded in
//! - **Errors** ([`error`]): [`HttpError`], [`ParseError`] and [`SendError`]

mod message;
pub use message::PayloadItem;
pub use message::ResponsePart;

mod headers;
pub use headers::Headers;

mod request;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::default_headers;
pub use response::WriterState;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
