//! Organization lifecycle operations

use crate::error::Result;
use crate::lifecycle::{resource_config, store_resource, task_resource_create, task_resource_delete};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Uses an existing, or creates a new, Organization.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let config = resource_config(ctx);
    let mut resource = Resource::new(ResourceKind::Organization, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes an Organization.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::Organization, ctx)?;
    task_resource_delete(&mut resource, ctx)
}
