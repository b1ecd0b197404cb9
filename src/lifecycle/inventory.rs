//! Inventory lifecycle operations

use crate::error::Result;
use crate::lifecycle::{
    rel, resolve_reference, resource_config, store_resource, task_resource_create,
    task_resource_delete,
};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Uses an existing, or creates a new, Inventory.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let mut config = resource_config(ctx);
    resolve_reference(
        ctx,
        &mut config,
        "organization",
        &[rel::CONTAINED_IN_ORGANIZATION],
        ResourceKind::Organization,
    )?;

    let mut resource = Resource::new(ResourceKind::Inventory, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes an Inventory.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::Inventory, ctx)?;
    task_resource_delete(&mut resource, ctx)
}
