//! Host-runtime node model
//!
//! The orchestration runtime hands every lifecycle operation a node instance:
//! its static properties (client config, resource config, flags), a mutable
//! runtime-property store, and the typed relationships to other node
//! instances. All of that is passed explicitly as a [`NodeContext`] - there is
//! no ambient global context.
//!
//! The runtime invokes at most one lifecycle operation per node instance at a
//! time, so the store uses plain single-threaded interior mutability.

use crate::error::Result;
use crate::tower::creds::ApiCredentials;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Static node properties supplied by the host configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeProperties {
    /// Map with `endpoint`, `endpoint_verify` and `access_token` keys.
    pub client_config: Value,
    /// Resource-specific fields, passed through to the API (plus an optional
    /// nested `kwargs` override map).
    pub resource_config: Value,
    /// When set, create/delete degrade to existence checks only.
    pub use_external_resource: bool,
    /// Explicit name or id of an externally managed resource.
    pub resource_id: Option<Value>,
}

/// A directed, typed edge to another node instance.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub type_hierarchy: Vec<String>,
    pub target: Rc<NodeContext>,
}

impl Relationship {
    pub fn new(rel_type: impl Into<String>, target: Rc<NodeContext>) -> Self {
        Self {
            type_hierarchy: vec![rel_type.into()],
            target,
        }
    }
}

/// One managed node instance, as seen by a lifecycle operation.
#[derive(Debug, Default)]
pub struct NodeContext {
    pub properties: NodeProperties,
    pub relationships: Vec<Relationship>,
    runtime: RefCell<Map<String, Value>>,
}

impl NodeContext {
    pub fn new(properties: NodeProperties) -> Self {
        Self {
            properties,
            relationships: Vec::new(),
            runtime: RefCell::new(Map::new()),
        }
    }

    pub fn with_relationship(mut self, rel: Relationship) -> Self {
        self.relationships.push(rel);
        self
    }

    /// API credentials from the node's `client_config`.
    pub fn credentials(&self) -> Result<ApiCredentials> {
        ApiCredentials::from_client_config(&self.properties.client_config)
    }

    /// The node's resource name: the remote id persisted at create time, or
    /// the configured `resource_id` property for externally managed nodes.
    pub fn resource_name(&self) -> Option<Value> {
        self.runtime_get("resource_id")
            .or_else(|| self.properties.resource_id.clone())
    }

    /// First relationship whose type hierarchy contains `rel_type`.
    pub fn relationship(&self, rel_type: &str) -> Option<&Relationship> {
        self.relationships
            .iter()
            .find(|rel| rel.type_hierarchy.iter().any(|t| t == rel_type))
    }

    /// All relationships whose type hierarchy contains `rel_type`.
    pub fn relationships_of_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.type_hierarchy.iter().any(|t| t == rel_type))
            .collect()
    }

    pub fn runtime_get(&self, key: &str) -> Option<Value> {
        self.runtime.borrow().get(key).cloned()
    }

    pub fn runtime_set(&self, key: impl Into<String>, value: Value) {
        self.runtime.borrow_mut().insert(key.into(), value);
    }

    /// Clear every runtime property. Run after a successful delete so no
    /// dangling `resource_id` survives the node instance.
    pub fn runtime_clear(&self) {
        self.runtime.borrow_mut().clear();
    }

    /// Snapshot of the runtime-property store.
    pub fn runtime_snapshot(&self) -> Map<String, Value> {
        self.runtime.borrow().clone()
    }
}
