//! User lifecycle operations
//!
//! Besides plain create/delete, a User node may be related to a Team or an
//! Organization; membership is toggled through the target's association
//! endpoint as part of the user's own lifecycle.

use crate::error::Result;
use crate::lifecycle::{
    rel, resource_config, store_resource, task_resource_create, task_resource_delete,
};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Toggle the user's membership in the related container node.
fn toggle_membership(
    ctx: &NodeContext,
    rel_type: &str,
    container_kind: ResourceKind,
    disassociate: bool,
) -> Result<()> {
    if let Some(relation) = ctx.relationship(rel_type) {
        let mut container = Resource::new(container_kind, &relation.target)?;
        container.resolve(&relation.target)?;
        let mut user = Resource::new(ResourceKind::User, ctx)?;
        user.resolve(ctx)?;
        container.associate(&user, disassociate)?;
    }
    Ok(())
}

/// Uses an existing, or creates a new, User; then joins any related Team and
/// Organization.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let config = resource_config(ctx);
    let mut resource = Resource::new(ResourceKind::User, ctx)?;
    let record = task_resource_create(&mut resource, ctx, Value::Object(config))?;
    store_resource(ctx, &record);

    toggle_membership(ctx, rel::CONNECTED_TO_TEAM, ResourceKind::Team, false)?;
    toggle_membership(
        ctx,
        rel::CONTAINED_IN_ORGANIZATION,
        ResourceKind::Organization,
        false,
    )?;
    Ok(())
}

/// Leaves any related Team and Organization, then deletes the User.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    toggle_membership(ctx, rel::CONNECTED_TO_TEAM, ResourceKind::Team, true)?;
    toggle_membership(
        ctx,
        rel::CONTAINED_IN_ORGANIZATION,
        ResourceKind::Organization,
        true,
    )?;

    let mut resource = Resource::new(ResourceKind::User, ctx)?;
    task_resource_delete(&mut resource, ctx)
}
