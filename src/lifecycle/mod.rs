//! Lifecycle operation entry points
//!
//! One module per resource kind, each exposing the create/delete (and, where
//! applicable, link/unlink) hooks the host runtime dispatches. The pattern is
//! uniform: resolve foreign-key fields by relationship traversal (falling back
//! to a `lookup_id` on an explicit config value), fetch-or-create through the
//! generic resource layer, persist the remote id on the node instance.

pub mod credential;
pub mod host;
pub mod inventory;
pub mod job;
pub mod job_template;
pub mod organization;
pub mod project;
pub mod role;
pub mod team;
pub mod user;

use crate::error::Result;
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::{Map, Value};

/// Relationship type strings consulted by the entry points.
pub mod rel {
    pub const CONTAINED_IN_ORGANIZATION: &str = "contained_in_organization";
    pub const CONNECTED_TO_TEAM: &str = "connected_to_team";
    pub const CONTAINED_IN_TEAM: &str = "contained_in_team";
    pub const CONTAINED_IN_USER: &str = "contained_in_user";
    pub const CONTAINED_IN_PROJECT: &str = "contained_in_project";
    pub const CONNECTED_TO_INVENTORY: &str = "connected_to_inventory";
    pub const CONTAINED_IN_INVENTORY: &str = "contained_in_inventory";
    pub const JOB_CONTAINED_IN_JOB_TEMPLATE: &str = "job_contained_in_job_template";
}

/// The node's `resource_config` as a parameter map.
pub(crate) fn resource_config(ctx: &NodeContext) -> Map<String, Value> {
    match &ctx.properties.resource_config {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

/// Fetch-or-create: an externally managed resource is only verified, never
/// mutated.
pub(crate) fn task_resource_create(
    resource: &mut Resource,
    ctx: &NodeContext,
    params: Value,
) -> Result<Value> {
    if ctx.properties.use_external_resource {
        resource.resolve(ctx)?;
        return resource.get();
    }
    resource.create(params)
}

/// Delete, gated on existence so a second pass is a no-op; clears every
/// persisted runtime property afterwards. Externally managed resources are
/// only verified and keep their runtime state.
pub(crate) fn task_resource_delete(resource: &mut Resource, ctx: &NodeContext) -> Result<()> {
    if ctx.properties.use_external_resource {
        resource.resolve(ctx)?;
        resource.get()?;
        return Ok(());
    }
    resource.resolve(ctx)?;
    if resource.exists()? {
        resource.delete()?;
    } else {
        tracing::info!("Resource doesn't exist");
    }
    ctx.runtime_clear();
    Ok(())
}

/// Persist the remote record and its primary key on the node instance.
pub(crate) fn store_resource(ctx: &NodeContext, record: &Value) {
    ctx.runtime_set("resource", record.clone());
    ctx.runtime_set(
        "resource_id",
        record.get("id").cloned().unwrap_or(Value::Null),
    );
}

/// Resolve a foreign-key field: a matching relationship supplies the target's
/// resource id directly; otherwise a non-null config value is resolved via
/// `lookup_id` against the current node's credentials. First matching
/// relationship type wins.
pub(crate) fn resolve_reference(
    ctx: &NodeContext,
    config: &mut Map<String, Value>,
    key: &str,
    rel_types: &[&str],
    kind: ResourceKind,
) -> Result<()> {
    if let Some(rel) = rel_types.iter().find_map(|t| ctx.relationship(t)) {
        config.insert(
            key.to_string(),
            rel.target.resource_name().unwrap_or(Value::Null),
        );
        return Ok(());
    }
    let value = config.get(key).filter(|v| !v.is_null()).cloned();
    if let Some(value) = value {
        let id = Resource::new(kind, ctx)?.lookup_id(&value)?;
        config.insert(key.to_string(), id.unwrap_or(Value::Null));
    }
    Ok(())
}
