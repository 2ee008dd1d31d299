//! HTTP error types for the handler layer.

mod http_error;

pub use self::http_error::{Error, ErrorKind, Result};
