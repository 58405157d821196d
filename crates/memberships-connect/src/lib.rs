//! # memberships-connect
//!
//! Remote status plumbing for the memberships system.
//!
//! The [`StatusResolver`] dispatches by deployment topology: an
//! authoritative instance answers from its local status store, a
//! connected client issues a versioned request to the remote status
//! endpoint as the connected user.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use memberships_connect::{RemoteStatusClient, StatusResolver};
//!
//! let resolver = StatusResolver::new(
//!     Arc::new(MemoryStatusStore::new()),
//!     Arc::new(RemoteStatusClient::from_env()),
//! );
//!
//! let status = resolver.resolve(&identity).await?;
//! ```

pub mod client;
pub mod mock;
pub mod resolver;

pub use client::{RemoteConfig, RemoteStatusClient, StatusFetcher};
pub use mock::MockStatusFetcher;
pub use resolver::StatusResolver;
