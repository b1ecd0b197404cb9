//! Host lifecycle operations

use crate::error::Result;
use crate::lifecycle::{
    rel, resolve_reference, resource_config, store_resource, task_resource_create,
    task_resource_delete,
};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Uses an existing, or creates a new, Host.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let mut config = resource_config(ctx);
    // connected_to_inventory is accepted for compatibility with older
    // topologies.
    resolve_reference(
        ctx,
        &mut config,
        "inventory",
        &[rel::CONTAINED_IN_INVENTORY, rel::CONNECTED_TO_INVENTORY],
        ResourceKind::Inventory,
    )?;

    let mut resource = Resource::new(ResourceKind::Host, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes a Host.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::Host, ctx)?;
    task_resource_delete(&mut resource, ctx)
}
