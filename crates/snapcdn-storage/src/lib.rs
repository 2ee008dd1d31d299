#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod staging;
mod store;

pub use crate::config::StorageConfig;
pub use crate::store::{AssetLocation, AssetStore, ProductSweep};
