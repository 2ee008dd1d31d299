#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod namespace;

// Re-export key types for convenience
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
