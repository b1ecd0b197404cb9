//! Credential and Credential Type lifecycle operations

use crate::error::Result;
use crate::lifecycle::{
    rel, resolve_reference, resource_config, store_resource, task_resource_create,
    task_resource_delete,
};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Uses an existing, or creates a new, Credential.
///
/// The `credential_type` field is always resolved through a Credential Type
/// lookup; the owner may come from an organization, team or user relationship
/// (or from config, via lookup).
pub fn create(ctx: &NodeContext) -> Result<()> {
    let mut config = resource_config(ctx);

    let type_name = config.get("credential_type").filter(|v| !v.is_null()).cloned();
    let type_id = match type_name {
        Some(name) => Resource::new(ResourceKind::CredentialType, ctx)?.lookup_id(&name)?,
        None => None,
    };
    config.insert(
        "credential_type".to_string(),
        type_id.unwrap_or(Value::Null),
    );

    resolve_reference(
        ctx,
        &mut config,
        "organization",
        &[rel::CONTAINED_IN_ORGANIZATION],
        ResourceKind::Organization,
    )?;
    resolve_reference(
        ctx,
        &mut config,
        "team",
        &[rel::CONTAINED_IN_TEAM],
        ResourceKind::Team,
    )?;
    resolve_reference(
        ctx,
        &mut config,
        "user",
        &[rel::CONTAINED_IN_USER],
        ResourceKind::User,
    )?;

    let mut resource = Resource::new(ResourceKind::Credential, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes a Credential.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::Credential, ctx)?;
    task_resource_delete(&mut resource, ctx)
}

/// Uses an existing, or creates a new, Credential Type.
pub fn create_type(ctx: &NodeContext) -> Result<()> {
    let config = resource_config(ctx);
    let mut resource = Resource::new(ResourceKind::CredentialType, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);
    Ok(())
}

/// Deletes a Credential Type.
pub fn delete_type(ctx: &NodeContext) -> Result<()> {
    let mut resource = Resource::new(ResourceKind::CredentialType, ctx)?;
    task_resource_delete(&mut resource, ctx)
}
