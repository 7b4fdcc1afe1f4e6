//! nfl-pbp: discover seasonal NFL play-by-play files in a GitHub repository,
//! download them and concatenate them into one in-memory table.
//!
//! Layers, leaf first: [`url_builder`] -> [`call`] -> [`github`] /
//! [`aggregate`] -> [`pipeline`] -> [`cli`].

pub mod aggregate;
pub mod call;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod github;
pub mod load_config;
pub mod logging;
pub mod pipeline;
pub mod url_builder;

pub use error::{Error, Result};
