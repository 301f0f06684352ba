//! Atomic multi-document writes.

use serde_json::Value;

/// One change inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite a whole document.
    Set {
        collection: String,
        id: String,
        data: Value,
    },
    /// Add `by` to a numeric field of an existing document.
    ///
    /// A missing or non-numeric field is treated as zero.
    Increment {
        collection: String,
        id: String,
        field: String,
        by: i64,
    },
}

impl WriteOp {
    /// Collection touched by this change.
    pub fn collection(&self) -> &str {
        match self {
            Self::Set { collection, .. } | Self::Increment { collection, .. } => collection,
        }
    }
}

/// A set of changes applied all together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full-document write.
    pub fn set(&mut self, collection: impl Into<String>, id: impl Into<String>, data: Value) -> &mut Self {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id: id.into(),
            data,
        });
        self
    }

    /// Queue a numeric increment on an existing document.
    pub fn increment(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        by: i64,
    ) -> &mut Self {
        self.ops.push(WriteOp::Increment {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            by,
        });
        self
    }

    /// Queued changes in order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Generate a fresh document id.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Apply an increment to a dotted field path, creating intermediate objects.
pub(crate) fn increment_field(target: &mut Value, path: &str, by: i64) {
    let mut current = target;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            let next = match map.get(segment) {
                Some(Value::Number(n)) if n.is_i64() => Value::from(n.as_i64().unwrap_or(0) + by),
                Some(Value::Number(n)) => Value::from(n.as_f64().unwrap_or(0.0) + by as f64),
                _ => Value::from(by),
            };
            map.insert(segment.to_string(), next);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
}
