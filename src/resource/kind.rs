//! Resource kinds
//!
//! The Tower API exposes one CRUD shape over many endpoints; everything that
//! varies per resource type - display name, endpoint path, lookup keys - is
//! carried as data on a closed enum instead of a type per resource.

/// The resource types managed through the Tower API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Organization,
    Team,
    User,
    Credential,
    CredentialType,
    Project,
    Inventory,
    Host,
    JobTemplate,
    Job,
    Role,
}

impl ResourceKind {
    /// Human-readable name, used in log lines and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "Organization",
            ResourceKind::Team => "Team",
            ResourceKind::User => "User",
            ResourceKind::Credential => "Credential",
            ResourceKind::CredentialType => "Credential Type",
            ResourceKind::Project => "Project",
            ResourceKind::Inventory => "Inventory",
            ResourceKind::Host => "Host",
            ResourceKind::JobTemplate => "Job_Template",
            ResourceKind::Job => "Job",
            ResourceKind::Role => "Role",
        }
    }

    /// Partial endpoint for collection/item URLs.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "/organizations",
            ResourceKind::Team => "/teams",
            ResourceKind::User => "/users",
            ResourceKind::Credential => "/credentials",
            ResourceKind::CredentialType => "/credential_types",
            ResourceKind::Project => "/projects",
            ResourceKind::Inventory => "/inventories",
            ResourceKind::Host => "/hosts",
            ResourceKind::JobTemplate => "/job_templates",
            ResourceKind::Job => "/jobs",
            ResourceKind::Role => "/roles",
        }
    }

    /// Record fields checked, in order, when resolving a name to an id.
    pub fn lookup_keys(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::User => &["id", "url", "username"],
            _ => &["id", "url", "name"],
        }
    }

    /// Collection name used for association sub-URLs and for the `related`
    /// keys of a role object: the lowercased display name plus an `s`.
    ///
    /// This exact transform is a naming convention inherited from the remote
    /// API ("User" -> `users`, "Team" -> `teams`); do not "fix" it.
    pub fn related_collection(&self) -> String {
        format!("{}s", self.display_name().to_lowercase())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
