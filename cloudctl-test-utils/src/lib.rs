//! Test utilities for cloudctl crates
//!
//! Provides a mock of the cloud API's database firewall endpoints. Server
//! state lives in an explicit [`FirewallStore`] handed to the server, so each
//! test owns its own state and tests can run in parallel.
//!
//! ```no_run
//! use cloudctl_test_utils::{FirewallStore, MockApiServer};
//!
//! let store = FirewallStore::new().with_cluster("1", Vec::new());
//! let server = MockApiServer::start("some-magic-token", store).unwrap();
//! // point cloudctl at server.url() ...
//! assert_eq!(server.store().count("PUT"), 0);
//! ```

mod server;
mod store;

pub use server::{router, MockApiServer};
pub use store::{FirewallStore, PutMode, RecordedRequest};
