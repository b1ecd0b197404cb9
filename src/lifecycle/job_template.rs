//! Job Template lifecycle operations
//!
//! Includes the link/unlink hooks that attach a Credential node to a template
//! after both exist.

use crate::error::Result;
use crate::lifecycle::{
    rel, resolve_reference, resource_config, store_resource, task_resource_create,
    task_resource_delete,
};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Uses an existing, or creates a new, Job Template.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let mut config = resource_config(ctx);
    resolve_reference(
        ctx,
        &mut config,
        "project",
        &[rel::CONTAINED_IN_PROJECT],
        ResourceKind::Project,
    )?;
    resolve_reference(
        ctx,
        &mut config,
        "inventory",
        &[rel::CONNECTED_TO_INVENTORY],
        ResourceKind::Inventory,
    )?;

    let mut resource = Resource::new(ResourceKind::JobTemplate, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes a Job Template.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::JobTemplate, ctx)?;
    task_resource_delete(&mut resource, ctx)
}

/// Attaches the target Credential to the source Job Template.
pub fn link_credential(source: &NodeContext, target: &NodeContext) -> Result<()> {
    let mut template = Resource::new(ResourceKind::JobTemplate, source)?;
    template.resolve(source)?;
    let mut credential = Resource::new(ResourceKind::Credential, target)?;
    credential.resolve(target)?;
    template.associate(&credential, false)
}

/// Detaches the target Credential from the source Job Template.
pub fn unlink_credential(source: &NodeContext, target: &NodeContext) -> Result<()> {
    let mut template = Resource::new(ResourceKind::JobTemplate, source)?;
    template.resolve(source)?;
    let mut credential = Resource::new(ResourceKind::Credential, target)?;
    credential.resolve(target)?;
    template.associate(&credential, true)
}
