//! awx-lifecycle
//!
//! A thin CRUD façade over the Ansible Tower/AWX REST API, meant to be
//! embedded in an orchestration runtime that manages Tower entities -
//! organizations, teams, users, credentials, projects, inventories, job
//! templates and jobs - as infrastructure nodes.
//!
//! # Module Structure
//!
//! - [`tower`] - credentials and the HTTP session wrapper (bearer auth,
//!   5xx retry with backoff)
//! - [`resource`] - the generic resource abstraction and the closed set of
//!   resource kinds
//! - [`node`] - the host-runtime node model: properties, runtime-property
//!   store, relationships
//! - [`lifecycle`] - the create/delete/link/unlink entry points the host
//!   dispatches, one module per resource kind
//! - [`error`] - the two-level (recoverable / non-recoverable) error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use awx_lifecycle::lifecycle::organization;
//! use awx_lifecycle::node::{NodeContext, NodeProperties};
//! use serde_json::json;
//!
//! fn provision() -> awx_lifecycle::Result<()> {
//!     let ctx = NodeContext::new(NodeProperties {
//!         client_config: json!({
//!             "endpoint": "https://tower.example.com",
//!             "access_token": "token"
//!         }),
//!         resource_config: json!({"name": "engineering"}),
//!         ..Default::default()
//!     });
//!     organization::create(&ctx)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod lifecycle;
pub mod node;
pub mod resource;
pub mod tower;

pub use error::{Error, Result};
