//! The header collection shared by requests, responses and trailers.
//!
//! [`Headers`] wraps an [`http::HeaderMap`] and adds the folding rule used on
//! the wire: a field name is stored once, and repeated occurrences are joined
//! into a single value separated by `", "` in arrival order.
//!
//! Names are always lower-case (the `http` crate normalizes them), lookups are
//! case-insensitive, and iteration follows insertion order.

use http::header::{AsHeaderName, Entry, IntoHeaderName, Iter};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::codec::parse_header_line;
use crate::protocol::ParseError;

/// Lower-cased field name to field value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HeaderMap,
}

impl Headers {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a single header line from the front of `src` into this collection.
    ///
    /// Returns the number of bytes consumed and whether the empty line that ends
    /// the header section was reached:
    ///
    /// - `Ok((0, false))`: no complete line yet, supply more bytes and retry
    /// - `Ok((2, true))`: `src` starts with CRLF, the header section is over
    /// - `Ok((n, false))`: one field line of `n` bytes (CRLF included) was stored
    ///
    /// On error nothing is consumed and the collection is left untouched.
    pub fn parse(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        parse_header_line(self, src)
    }

    /// Returns the value of `name` as a string, ignoring case of the name.
    ///
    /// Values holding bytes outside visible ASCII are stored but not returned
    /// here, use [`Headers::get_raw`] for those.
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.inner.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn get_raw<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.inner.get(name)
    }

    pub fn contains_key<K: AsHeaderName>(&self, name: K) -> bool {
        self.inner.contains_key(name)
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) -> Option<HeaderValue> {
        self.inner.insert(name, value)
    }

    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        self.inner.remove(name)
    }

    /// Adds `value` under `name`, folding it into an existing value with `", "`.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) -> Result<(), ParseError> {
        match self.inner.entry(name) {
            Entry::Occupied(mut entry) => {
                let folded = [entry.get().as_bytes(), b", ", value.as_bytes()].concat();
                let folded = HeaderValue::from_bytes(&folded).map_err(ParseError::malformed_header_line)?;
                entry.insert(folded);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, HeaderValue> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a HeaderName, &'a HeaderValue);
    type IntoIter = Iter<'a, HeaderValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
