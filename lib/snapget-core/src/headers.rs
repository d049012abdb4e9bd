//! Request header assembly.
//!
//! [`HeaderList`] keeps caller headers as ordered `Name: Value` lines. Nothing
//! is validated while assembling; the lines are checked only when converted to
//! an [`http::HeaderMap`] right before sending.

use std::fmt;

use http::{HeaderMap, HeaderName, HeaderValue, header::USER_AGENT};

use crate::{Error, Result, TransportErrorKind};

/// One request header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    name: String,
    value: String,
}

impl HeaderLine {
    /// Creates a header line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Header name as supplied.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header value as supplied.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered list of request headers; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    lines: Vec<HeaderLine>,
}

impl HeaderList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the list from ordered key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            lines: pairs
                .into_iter()
                .map(|(name, value)| HeaderLine::new(name, value))
                .collect(),
        }
    }

    /// Appends a header line.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.lines.push(HeaderLine::new(name, value));
    }

    /// Appends `User-Agent: <agent>` unless the caller already set one.
    #[must_use]
    pub fn with_default_user_agent(mut self, agent: &str) -> Self {
        if !self.contains(USER_AGENT.as_str()) {
            self.push(USER_AGENT.as_str(), agent);
        }
        self
    }

    /// Case-insensitive lookup of a header name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.name.eq_ignore_ascii_case(name))
    }

    /// Number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines.iter()
    }

    /// Convert into a transport header map, keeping order and duplicates.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportErrorKind::InvalidRequest`] error for the first
    /// line whose name or value is not legal HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.lines.len());
        for line in &self.lines {
            let name = HeaderName::from_bytes(line.name.as_bytes())
                .map_err(|err| invalid_header(line, &err))?;
            let value =
                HeaderValue::from_str(&line.value).map_err(|err| invalid_header(line, &err))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

fn invalid_header(line: &HeaderLine, err: &dyn std::error::Error) -> Error {
    Error::transport(
        TransportErrorKind::InvalidRequest,
        format!("header `{}` rejected: {err}", line.name),
    )
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a HeaderLine;
    type IntoIter = std::slice::Iter<'a, HeaderLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
