//! Infrastructure Layer
//!
//! Store implementations over the platform primitives and the remote
//! policy source.

pub mod fixed;
pub mod http;
pub mod kv;

pub use fixed::FixedPolicyStore;
pub use http::HttpPolicyStore;
pub use kv::KvEpochStore;
