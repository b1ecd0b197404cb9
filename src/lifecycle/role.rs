//! Role grant/revoke operations
//!
//! Roles are granted by POSTing a principal id to one of the role object's
//! `related` sub-URLs, keyed by the principal's collection name. Only Job
//! Template and Project nodes expose object roles this way.

use crate::error::{Error, Result};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::{json, Value};

/// Grants `role` on the source node to the target User.
pub fn add_user(
    source_kind: ResourceKind,
    source: &NodeContext,
    target: &NodeContext,
    role: &str,
) -> Result<()> {
    toggle(source_kind, source, ResourceKind::User, target, role, false)
}

/// Revokes `role` on the source node from the target User.
pub fn remove_user(
    source_kind: ResourceKind,
    source: &NodeContext,
    target: &NodeContext,
    role: &str,
) -> Result<()> {
    toggle(source_kind, source, ResourceKind::User, target, role, true)
}

/// Grants `role` on the source node to the target Team.
pub fn add_team(
    source_kind: ResourceKind,
    source: &NodeContext,
    target: &NodeContext,
    role: &str,
) -> Result<()> {
    toggle(source_kind, source, ResourceKind::Team, target, role, false)
}

/// Revokes `role` on the source node from the target Team.
pub fn remove_team(
    source_kind: ResourceKind,
    source: &NodeContext,
    target: &NodeContext,
    role: &str,
) -> Result<()> {
    toggle(source_kind, source, ResourceKind::Team, target, role, true)
}

fn toggle(
    source_kind: ResourceKind,
    source: &NodeContext,
    principal_kind: ResourceKind,
    principal_ctx: &NodeContext,
    role: &str,
    disassociate: bool,
) -> Result<()> {
    if !matches!(
        source_kind,
        ResourceKind::JobTemplate | ResourceKind::Project
    ) {
        return Err(Error::NonRecoverable(format!(
            "role operations are not supported for {}",
            source_kind
        )));
    }

    let mut owner = Resource::new(source_kind, source)?;
    owner.resolve(source)?;

    let role_name = Value::String(role.to_string());
    let role_obj = owner.lookup_role(&role_name)?.ok_or_else(|| {
        Error::Recoverable(format!(
            "{} role \"{}\" doesn't exist (yet?)",
            source_kind, role
        ))
    })?;
    let collection = principal_kind.related_collection();
    let related = role_obj
        .get("related")
        .and_then(|r| r.get(&collection))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::NonRecoverable(format!(
                "role \"{}\" has no related {} URL",
                role, collection
            ))
        })?;

    let mut principal = Resource::new(principal_kind, principal_ctx)?;
    principal.resolve(principal_ctx)?;
    let principal_id = principal
        .id()
        .ok_or_else(|| {
            Error::NonRecoverable(format!("{}.role_toggle() used without ID", principal_kind))
        })?
        .clone();

    if disassociate {
        tracing::info!(
            "Removing {}({}) from {}",
            principal_kind,
            principal_id,
            source_kind
        );
    } else {
        tracing::info!(
            "Adding {}({}) to {}",
            principal_kind,
            principal_id,
            source_kind
        );
    }

    let mut body = json!({ "id": principal_id });
    if disassociate {
        body["disassociate"] = Value::Bool(true);
    }
    owner.post_related(related, &body)
}
