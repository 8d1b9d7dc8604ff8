//! Client side of the clinical data API.
//!
//! `ApiClient` injects the credential header and owns the retry loop;
//! `RetryPolicy` computes the backoff; `ApiError` is the failure taxonomy
//! shared by the fetcher and the submitter.

pub mod client;
pub mod error;
pub mod retry;

#[cfg(test)]
pub(crate) mod mock_server;

pub use client::ApiClient;
pub use error::{is_transient_status, ApiError};
pub use retry::RetryPolicy;
