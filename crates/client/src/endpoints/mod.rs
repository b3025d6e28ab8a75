//! Cluster REST endpoint implementations.
//!
//! Each function returns the raw response exactly as the client generation
//! reports it; normalization happens one layer up in
//! [`crate::client::ClusterClient`].

mod indices;
mod info;
mod mapping;
pub mod request;
mod search;
pub mod url_encoding;

pub use indices::cat_indices;
pub use info::info;
pub use mapping::get_mapping;
pub use request::{BasicAuth, RequestContext, send_request_with_retry};
pub use search::search;
pub use url_encoding::encode_index_pattern;
