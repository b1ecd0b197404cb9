//! Generic resource abstraction
//!
//! One CRUD implementation for every [`ResourceKind`]: build a URL, issue one
//! HTTP call, branch on the status code, map failures onto the two-level
//! error taxonomy. Per-kind association endpoints (user/credential
//! attachment, job-template launch, role lookup) follow the same contract.

use crate::error::{Error, Result};
use crate::node::NodeContext;
use crate::resource::kind::ResourceKind;
use crate::tower::client::TowerClient;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

const API_VERSION: &str = "v2";

/// Lookup keys for role objects; roles are matched the same way regardless of
/// the owning resource kind.
const ROLE_LOOKUP: [&str; 3] = ["id", "url", "name"];

/// A Tower resource of one kind, bound to one client, with an explicitly
/// resolved-or-not identifier.
pub struct Resource {
    kind: ResourceKind,
    client: TowerClient,
    id: Option<Value>,
}

impl Resource {
    /// Adapter with an unresolved identifier, using the node's credentials.
    pub fn new(kind: ResourceKind, ctx: &NodeContext) -> Result<Self> {
        let client = TowerClient::new(&ctx.credentials()?)?;
        Ok(Self {
            kind,
            client,
            id: None,
        })
    }

    /// Adapter with a pre-resolved identifier.
    pub fn with_id(kind: ResourceKind, ctx: &NodeContext, id: Value) -> Result<Self> {
        let mut res = Self::new(kind, ctx)?;
        res.id = Some(id);
        Ok(res)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The resolved identifier, if any.
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// Resolve the identifier from the node's resource name, once. Later
    /// calls reuse the cached value for the lifetime of this adapter.
    pub fn resolve(&mut self, ctx: &NodeContext) -> Result<Option<&Value>> {
        if self.id.is_none() {
            if let Some(name) = ctx.resource_name() {
                self.id = self.lookup_id(&name)?;
            }
        }
        Ok(self.id.as_ref())
    }

    fn require_id(&self, op: &str) -> Result<&Value> {
        self.id.as_ref().ok_or_else(|| {
            Error::NonRecoverable(format!("{}.{}() used without ID", self.kind, op))
        })
    }

    fn collection_url(&self) -> String {
        format!("/api/{}{}/", API_VERSION, self.kind.endpoint())
    }

    fn item_url(&self, op: &str) -> Result<String> {
        let id = self.require_id(op)?;
        Ok(format!(
            "/api/{}{}/{}/",
            API_VERSION,
            self.kind.endpoint(),
            id_fragment(id)
        ))
    }

    /// True only on HTTP 200; any other status means "not there".
    pub fn exists(&self) -> Result<bool> {
        let url = self.item_url("exists")?;
        tracing::info!("Retrieving {} \"{}\"", self.kind, id_fragment(self.require_id("exists")?));
        let res = self.client.get(&url)?;
        Ok(res.status == StatusCode::OK)
    }

    /// The collection's `results` on HTTP 200, empty otherwise. Never fails
    /// on a status code.
    pub fn list(&self) -> Result<Vec<Value>> {
        tracing::info!("Retrieving {} resources", self.kind);
        let res = self.client.get(&self.collection_url())?;
        if res.status != StatusCode::OK {
            return Ok(Vec::new());
        }
        Ok(results_of(res.json()))
    }

    /// Fetch the resource record.
    pub fn get(&self) -> Result<Value> {
        let url = self.item_url("get")?;
        let id = id_fragment(self.require_id("get")?);
        tracing::info!("Retrieving {} \"{}\"", self.kind, id);
        let res = self.client.get(&url)?;
        match res.status {
            StatusCode::OK => Ok(res.into_json().unwrap_or(Value::Null)),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!(
                    "{} \"{}\" BAD REQUEST",
                    self.kind, id
                )))
            }
            StatusCode::NOT_FOUND => Err(Error::Recoverable(format!(
                "{} \"{}\" doesn't exist (yet?)",
                self.kind, id
            ))),
            other => Err(Error::unexpected_status(StatusCode::OK, other)),
        }
    }

    /// Create a new resource. The optional nested `kwargs` map is merged over
    /// the top-level parameters before the payload is sanitized.
    pub fn create(&self, params: Value) -> Result<Value> {
        tracing::info!("Creating new {}", self.kind);
        let params = merge_params(params);
        let payload = sanitize_json_input(&params)?;
        let res = self.client.post(&self.collection_url(), payload.as_ref())?;
        match res.status {
            StatusCode::CREATED => Ok(res.into_json().unwrap_or(Value::Null)),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!("{} BAD REQUEST", self.kind)))
            }
            other => Err(Error::unexpected_status(StatusCode::CREATED, other)),
        }
    }

    /// Delete the resource. Both 204 and 202 count as success.
    pub fn delete(&self) -> Result<()> {
        let url = self.item_url("delete")?;
        let id = id_fragment(self.require_id("delete")?);
        tracing::info!("Deleting {} \"{}\"", self.kind, id);
        let res = self.client.delete(&url)?;
        match res.status {
            StatusCode::NO_CONTENT | StatusCode::ACCEPTED => Ok(()),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!(
                    "{} \"{}\" BAD REQUEST",
                    self.kind, id
                )))
            }
            other => Err(Error::unexpected_status(StatusCode::NO_CONTENT, other)),
        }
    }

    /// Resolve a name to a resource id by scanning the collection listing.
    ///
    /// Records are checked in server order, each configured lookup key in
    /// declared order; the first record with any matching key wins. No match
    /// is `Ok(None)`, not an error.
    pub fn lookup_id(&self, name: &Value) -> Result<Option<Value>> {
        tracing::info!("Retrieving list {}", self.kind);
        let res = self.client.get(&self.collection_url())?;
        if res.status != StatusCode::OK {
            return Err(Error::unexpected_status(StatusCode::OK, res.status));
        }
        for record in results_of(res.json()) {
            for key in self.kind.lookup_keys() {
                if record.get(*key) == Some(name) {
                    // A matched record without an `id` field collapses to
                    // "not found"; the API always includes one, so this only
                    // happens on a malformed listing.
                    return Ok(record.get("id").cloned());
                }
            }
        }
        Ok(None)
    }

    /// Toggle an association with `target` via the fixed sub-URL
    /// `{item}/{target-collection}/`.
    pub fn associate(&self, target: &Resource, disassociate: bool) -> Result<()> {
        let target_id = target.require_id("associate")?;
        let url = format!(
            "{}{}/",
            self.item_url("associate")?,
            target.kind.related_collection()
        );
        if disassociate {
            tracing::info!(
                "Removing {}({}) from {}({})",
                target.kind,
                id_fragment(target_id),
                self.kind,
                id_fragment(self.require_id("associate")?)
            );
        } else {
            tracing::info!(
                "Adding {}({}) to {}({})",
                target.kind,
                id_fragment(target_id),
                self.kind,
                id_fragment(self.require_id("associate")?)
            );
        }
        let mut body = json!({ "id": target_id });
        if disassociate {
            body["disassociate"] = Value::Bool(true);
        }
        let res = self.client.post(&url, Some(&body))?;
        match res.status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!("{} BAD REQUEST", self.kind)))
            }
            other => Err(Error::unexpected_status(StatusCode::NO_CONTENT, other)),
        }
    }

    /// Launch a job template; the returned record carries the new job's id in
    /// its `job` field.
    pub fn launch(&self) -> Result<Value> {
        let url = format!("{}launch/", self.item_url("launch")?);
        tracing::info!(
            "Launching {} \"{}\"",
            self.kind,
            id_fragment(self.require_id("launch")?)
        );
        let res = self.client.post(&url, None)?;
        match res.status {
            StatusCode::CREATED => Ok(res.into_json().unwrap_or(Value::Null)),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!("{} BAD REQUEST", self.kind)))
            }
            other => Err(Error::unexpected_status(StatusCode::CREATED, other)),
        }
    }

    /// Find one of the resource's object roles by id, url or name. Returns
    /// the full role object so the caller can reach its `related` sub-URLs.
    pub fn lookup_role(&self, name: &Value) -> Result<Option<Value>> {
        let url = format!("{}object_roles/", self.item_url("lookup_role")?);
        tracing::info!("Retrieving roles for {}", self.kind);
        let res = self.client.get(&url)?;
        if res.status != StatusCode::OK {
            return Err(Error::unexpected_status(StatusCode::OK, res.status));
        }
        for record in results_of(res.json()) {
            for key in ROLE_LOOKUP {
                if record.get(key) == Some(name) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Issue a request against an arbitrary API path with this adapter's
    /// client. Used for the role `related` URLs, which come back from the
    /// server rather than from a URL template.
    pub(crate) fn post_related(&self, path: &str, body: &Value) -> Result<()> {
        let res = self.client.post(path, Some(body))?;
        match res.status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::BAD_REQUEST => {
                tracing::info!("BAD REQUEST: response: {:?}", res.json());
                Err(Error::NonRecoverable(format!("{} BAD REQUEST", self.kind)))
            }
            other => Err(Error::unexpected_status(StatusCode::NO_CONTENT, other)),
        }
    }
}

/// An id shows up in a URL without JSON quoting.
fn id_fragment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The `results` field of a listing body, or nothing.
fn results_of(body: Option<&Value>) -> Vec<Value> {
    body.and_then(|b| b.get("results"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Pull a nested `kwargs` map out of `params` and recursively merge it over
/// the top-level entries: map-valued entries on both sides merge key-wise,
/// anything else is overridden by the `kwargs` side.
pub fn merge_params(mut params: Value) -> Value {
    if let Value::Object(ref mut map) = params {
        if let Some(Value::Object(kwargs)) = map.remove("kwargs") {
            dict_update(map, kwargs);
        }
    }
    params
}

fn dict_update(orig: &mut Map<String, Value>, updates: Map<String, Value>) {
    for (key, value) in updates {
        match (orig.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                dict_update(existing, incoming);
            }
            (_, value) => {
                orig.insert(key, value);
            }
        }
    }
}

/// Normalize a payload through a JSON text round-trip; empty and
/// non-collection inputs map to "no payload at all".
pub fn sanitize_json_input(data: &Value) -> Result<Option<Value>> {
    let keep = match data {
        Value::Object(map) => !map.is_empty(),
        Value::Array(list) => !list.is_empty(),
        _ => false,
    };
    if !keep {
        return Ok(None);
    }
    let text = serde_json::to_string(data)?;
    Ok(Some(serde_json::from_str(&text)?))
}
