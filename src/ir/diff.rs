//! Structural deep-compare between two IR snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::CompilerIr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One differing leaf (or subtree that changed shape).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrChange {
    /// `$` for the root, otherwise e.g. `semantic.symbols[2].kinds`.
    pub path: String,
    pub kind: ChangeKind,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrDiff {
    pub changed: bool,
    pub changes: Vec<IrChange>,
}

impl IrDiff {
    fn from_changes(changes: Vec<IrChange>) -> Self {
        Self {
            changed: !changes.is_empty(),
            changes,
        }
    }

    /// Top-level sections touched by the diff, sorted and de-duplicated.
    pub fn touched_sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = self
            .changes
            .iter()
            .map(|c| {
                c.path
                    .split(['.', '['])
                    .next()
                    .unwrap_or(c.path.as_str())
            })
            .collect();
        sections.sort_unstable();
        sections.dedup();
        sections
    }
}

/// Compare two snapshots through their JSON form.
pub fn diff_compiler_ir(previous: &CompilerIr, next: &CompilerIr) -> IrDiff {
    match (serde_json::to_value(previous), serde_json::to_value(next)) {
        (Ok(before), Ok(after)) => diff_values(&before, &after),
        _ if previous == next => IrDiff::default(),
        _ => IrDiff::from_changes(vec![IrChange {
            path: "$".to_string(),
            kind: ChangeKind::Modified,
            before: None,
            after: None,
        }]),
    }
}

/// Compare two JSON trees. Object keys are visited in sorted order, array
/// items by index.
pub fn diff_values(before: &Value, after: &Value) -> IrDiff {
    let mut changes = Vec::new();
    walk(String::new(), before, after, &mut changes);
    IrDiff::from_changes(changes)
}

fn display(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn walk(path: String, before: &Value, after: &Value, out: &mut Vec<IrChange>) {
    match (before, after) {
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let next = child(&path, key);
                match (a.get(key), b.get(key)) {
                    (Some(x), Some(y)) => walk(next, x, y, out),
                    (Some(x), None) => out.push(removed(next, x)),
                    (None, Some(y)) => out.push(added(next, y)),
                    (None, None) => {}
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for idx in 0..a.len().max(b.len()) {
                let next = format!("{path}[{idx}]");
                match (a.get(idx), b.get(idx)) {
                    (Some(x), Some(y)) => walk(next, x, y, out),
                    (Some(x), None) => out.push(removed(next, x)),
                    (None, Some(y)) => out.push(added(next, y)),
                    (None, None) => {}
                }
            }
        }
        (a, b) if a == b => {}
        (a, b) => out.push(IrChange {
            path: display(&path),
            kind: ChangeKind::Modified,
            before: Some(a.clone()),
            after: Some(b.clone()),
        }),
    }
}

fn added(path: String, value: &Value) -> IrChange {
    IrChange {
        path,
        kind: ChangeKind::Added,
        before: None,
        after: Some(value.clone()),
    }
}

fn removed(path: String, value: &Value) -> IrChange {
    IrChange {
        path,
        kind: ChangeKind::Removed,
        before: Some(value.clone()),
        after: None,
    }
}
