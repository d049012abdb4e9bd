//! Prelude module for convenient imports.
//!
//! ```ignore
//! use snapget::prelude::*;
//! ```

pub use crate::{
    Client, ClientConfig, Error, GetRequest, Response, Result, StatusCode, TlsPolicy, Transport,
    TransportErrorKind, execute_with, get, header,
};
