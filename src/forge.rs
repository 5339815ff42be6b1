//! Remote repository API used by the release operations.
//!
//! Provides token-based authentication, release endpoints, asset uploads and
//! raw asset downloads through common traits.

/// Configuration and authentication for the remote API.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Traits abstracting the release API and asset downloads.
pub mod traits;

/// Resource and request types exchanged with the API.
pub mod types;
