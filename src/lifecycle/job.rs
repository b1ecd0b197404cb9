//! Job lifecycle operations
//!
//! A Job node doesn't create anything directly: it launches the referenced
//! Job Template and tracks the job the launch spawned. The persisted
//! `resource_id` is the `job` field of the launch record.

use crate::error::{Error, Result};
use crate::lifecycle::{rel, resource_config, task_resource_delete};
use crate::node::NodeContext;
use crate::resource::{Resource, ResourceKind};
use serde_json::Value;

/// Launches the related Job Template and persists the spawned job.
pub fn create(ctx: &NodeContext) -> Result<()> {
    let config = resource_config(ctx);

    let template_id = if let Some(relation) = ctx.relationship(rel::JOB_CONTAINED_IN_JOB_TEMPLATE)
    {
        relation.target.resource_name()
    } else if let Some(name) = config.get("job_template").filter(|v| !v.is_null()) {
        Resource::new(ResourceKind::JobTemplate, ctx)?.lookup_id(name)?
    } else {
        None
    };
    let template_id = template_id.ok_or_else(|| {
        Error::NonRecoverable("Job created without a job_template reference".to_string())
    })?;

    let template = Resource::with_id(ResourceKind::JobTemplate, ctx, template_id)?;
    let record = template.launch()?;

    ctx.runtime_set("resource", record.clone());
    ctx.runtime_set(
        "resource_id",
        record.get("job").cloned().unwrap_or(Value::Null),
    );
    Ok(())
}

/// Deletes the Job spawned at create time.
pub fn delete(ctx: &NodeContext) -> Result<()> {
    let id = ctx.runtime_get("resource_id").ok_or_else(|| {
        Error::NonRecoverable("Job deleted without a persisted resource_id".to_string())
    })?;
    let mut job = Resource::with_id(ResourceKind::Job, ctx, id)?;
    task_resource_delete(&mut job, ctx)
}
