//! Remote per-identity tree store.
//!
//! The remote service stores one schemaless document per identity. Nothing
//! guarantees its shape: older clients, manual edits in the console, or a
//! partially migrated record can all produce documents that are not a clean
//! `{nodes, edges, nextId}`. [`coerce_document`] turns whatever is found into
//! a strict [`GraphSnapshot`].
//!
//! ## Coercion rules
//!
//! | Field   | Missing / wrong type | Bad entry                   |
//! |---------|----------------------|-----------------------------|
//! | nodes   | `[]`                 | skipped, warning            |
//! | edges   | `[]`                 | skipped, warning            |
//! | nextId  | `1`                  | -                           |
//!
//! Numeric node ids are stringified. Edges without an id get
//! `"{source}-{target}"`. The counter is finally raised above every
//! numeric node id.

use std::sync::Arc;

use async_trait::async_trait;
use bookpath_core::{Edge, GraphSnapshot, IdentityId, Node, NodeData, Position, MAX_NODE_ID};
use serde_json::{Map, Value};

use crate::error::{LoadError, RemoteResult, RemoteStoreError};

/// Raw asynchronous document storage keyed by identity.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document for `identity`, or None if it does not exist.
    async fn load(&self, identity: &IdentityId) -> RemoteResult<Option<Value>>;

    /// Overwrite the document for `identity`.
    async fn save(&self, identity: &IdentityId, document: Value) -> RemoteResult<()>;
}

/// Snapshot-level access to a [`DocumentStore`].
///
/// Clone is cheap (just an Arc clone).
#[derive(Clone)]
pub struct TreeStore {
    documents: Arc<dyn DocumentStore>,
}

impl TreeStore {
    /// Wrap a document backend.
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Load and coerce the snapshot for `identity`.
    pub async fn load(&self, identity: &IdentityId) -> Result<Option<GraphSnapshot>, LoadError> {
        match self.documents.load(identity).await? {
            Some(document) => coerce_document(document).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite the remote snapshot for `identity`.
    pub async fn save(&self, identity: &IdentityId, snapshot: &GraphSnapshot) -> RemoteResult<()> {
        let document =
            serde_json::to_value(snapshot).map_err(|e| RemoteStoreError::Unavailable {
                reason: format!("could not encode snapshot: {}", e),
            })?;
        self.documents.save(identity, document).await
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String form of an id that may have been stored as a number.
fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn entries<'a>(doc: &'a Map<String, Value>, field: &str) -> &'a [Value] {
    match doc.get(field) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(
                target: "bookpath::remote",
                field,
                found = json_type(other),
                "Tree document field is not an array, using empty list"
            );
            &[]
        }
        None => &[],
    }
}

fn coerce_node(raw: &Value) -> Option<Node> {
    let obj = raw.as_object()?;
    let id = id_string(obj.get("id"))?;
    let label = obj
        .get("data")
        .and_then(|d| d.get("label"))
        .and_then(Value::as_str)?
        .to_string();
    let position = obj
        .get("position")
        .and_then(|p| serde_json::from_value::<Position>(p.clone()).ok())
        .unwrap_or_default();
    Some(Node {
        id,
        position,
        data: NodeData { label },
        style: obj.get("style").filter(|s| !s.is_null()).cloned(),
    })
}

fn coerce_edge(raw: &Value) -> Option<Edge> {
    let obj = raw.as_object()?;
    let source = id_string(obj.get("source"))?;
    let target = id_string(obj.get("target"))?;
    let handle = |field: &str| obj.get(field).and_then(Value::as_str).map(str::to_string);
    Some(Edge {
        id: id_string(obj.get("id")).unwrap_or_else(|| Edge::id_for(&source, &target)),
        source_handle: handle("sourceHandle"),
        target_handle: handle("targetHandle"),
        source,
        target,
    })
}

/// Counter from the stored `nextId`: an integer (or integral float) in
/// `1..=MAX_NODE_ID`, anything else resets to 1.
fn coerce_next_id(raw: &Value) -> u64 {
    let parsed = raw.as_u64().or_else(|| {
        raw.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= MAX_NODE_ID as f64)
            .map(|f| f as u64)
    });
    match parsed {
        Some(n) if (1..=MAX_NODE_ID).contains(&n) => n,
        Some(n) => {
            tracing::warn!(target: "bookpath::remote", next_id = n, "Tree id counter out of range, reset");
            1
        }
        None => {
            if !raw.is_null() {
                tracing::warn!(target: "bookpath::remote", found = json_type(raw), "Tree id counter is not a valid integer, reset");
            }
            1
        }
    }
}

/// Validate and coerce a raw tree document into a snapshot.
pub fn coerce_document(document: Value) -> Result<GraphSnapshot, LoadError> {
    let doc = match &document {
        Value::Object(map) => map,
        other => {
            return Err(LoadError::NotAnObject {
                found: json_type(other),
            })
        }
    };

    let mut nodes = Vec::new();
    for (index, raw) in entries(doc, "nodes").iter().enumerate() {
        match coerce_node(raw) {
            Some(node) => nodes.push(node),
            None => tracing::warn!(target: "bookpath::remote", index, "Skipping malformed node entry"),
        }
    }

    let mut edges = Vec::new();
    for (index, raw) in entries(doc, "edges").iter().enumerate() {
        match coerce_edge(raw) {
            Some(edge) => edges.push(edge),
            None => tracing::warn!(target: "bookpath::remote", index, "Skipping malformed edge entry"),
        }
    }

    let next_id = doc.get("nextId").map(coerce_next_id).unwrap_or(1);

    let mut snapshot = GraphSnapshot {
        nodes,
        edges,
        next_id,
    };
    snapshot.restore_next_id();
    Ok(snapshot)
}
