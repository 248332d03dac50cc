//! Structured diff over JSON snapshots of domain objects.
//!
//! Objects recurse field by field; arrays and scalars are leaves. A null
//! value and an absent key are the same thing.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diff {
    /// Some fields of an object changed.
    #[serde(rename = "$update")]
    Update(BTreeMap<String, Diff>),
    /// The value was absent and is now present.
    #[serde(rename = "$insert")]
    Insert(Value),
    /// The value was present and is now absent.
    #[serde(rename = "$delete")]
    Delete(Value),
    /// The value changed wholesale.
    #[serde(rename = "$replace")]
    Replace { old: Value, new: Value },
}

impl Diff {
    /// Whether the change is confined to the single field at `path`.
    pub fn only_touches(&self, path: &[&str]) -> bool {
        match (self, path.split_first()) {
            (_, None) => true,
            (Self::Update(fields), Some((head, rest))) => {
                fields.len() == 1
                    && fields
                        .get(*head)
                        .is_some_and(|field| field.only_touches(rest))
            }
            _ => false,
        }
    }

    /// Dotted paths of every changed leaf, in field order.
    pub fn changed_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        match self {
            Self::Update(fields) => {
                for (name, field) in fields {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    field.collect_paths(&path, paths);
                }
            }
            _ => paths.push(prefix.to_string()),
        }
    }
}

/// Compare two JSON values. `None` when they are equivalent.
pub fn diff(old: &Value, new: &Value) -> Option<Diff> {
    match (old, new) {
        (Value::Null, Value::Null) => None,
        (Value::Null, new) => Some(Diff::Insert(new.clone())),
        (old, Value::Null) => Some(Diff::Delete(old.clone())),
        (Value::Object(old), Value::Object(new)) => diff_objects(old, new),
        (old, new) if old == new => None,
        (old, new) => Some(Diff::Replace {
            old: old.clone(),
            new: new.clone(),
        }),
    }
}

fn diff_objects(old: &Map<String, Value>, new: &Map<String, Value>) -> Option<Diff> {
    let keys = old.keys().chain(new.keys()).collect::<BTreeSet<_>>();
    let fields = keys
        .into_iter()
        .filter_map(|key| {
            let old = old.get(key).unwrap_or(&Value::Null);
            let new = new.get(key).unwrap_or(&Value::Null);
            diff(old, new).map(|field| (key.clone(), field))
        })
        .collect::<BTreeMap<_, _>>();

    if fields.is_empty() {
        None
    } else {
        Some(Diff::Update(fields))
    }
}

/// Diff two domain objects through their JSON form.
pub fn diff_snapshots<T: Serialize>(old: &T, new: &T) -> Result<Option<Diff>> {
    let old = serde_json::to_value(old)?;
    let new = serde_json::to_value(new)?;
    Ok(diff(&old, &new))
}
