//! Prelude module for convenient imports.
//!
//! ```ignore
//! use snapget_core::prelude::*;
//! ```

pub use crate::{
    BodyAccumulator, Error, Exchange, GetRequest, HeaderList, PreparedRequest, RequestBuilder,
    Response, Result, Transport, TransportErrorKind, build_url,
};
