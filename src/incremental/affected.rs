//! Affected-set computation for incremental re-analysis.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::graph::DependencyGraph;
use crate::base::{FileKind, Segment};

/// What must be rebuilt after a set of file changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedSet {
    /// Sorted component keys.
    pub affected_components: Vec<String>,
    /// Tracked files of the affected components, sorted and de-duplicated.
    pub affected_files: Vec<String>,
    /// Never empty; at least `structural`.
    pub affected_segments: Vec<Segment>,
}

impl AffectedSet {
    pub fn contains(&self, component_key: &str) -> bool {
        self.affected_components
            .binary_search_by(|k| k.as_str().cmp(component_key))
            .is_ok()
    }

    pub fn invalidates(&self, segment: Segment) -> bool {
        self.affected_segments.contains(&segment)
    }
}

/// Segments invalidated by a set of changed paths.
///
/// Paths with no recognised suffix contribute nothing; if nothing at all
/// was recognised the result is `[structural]`.
pub fn segments_for<I, S>(changed_files: I) -> Vec<Segment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: BTreeSet<Segment> = changed_files
        .into_iter()
        .filter_map(|path| FileKind::from_path(path.as_ref()))
        .flat_map(|kind| kind.invalidated_segments().iter().copied())
        .collect();
    if segments.is_empty() {
        vec![Segment::Structural]
    } else {
        segments.into_iter().collect()
    }
}

/// Map changed files to their owners, then expand to every transitive
/// dependent. Files no component owns are ignored.
pub fn compute_affected<I, S>(graph: &DependencyGraph, changed_files: I) -> AffectedSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let changed: Vec<S> = changed_files.into_iter().collect();

    let mut affected: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for path in &changed {
        let path = path.as_ref();
        match graph.owner_of_file(path) {
            Some(owner) => {
                if affected.insert(owner.to_string()) {
                    queue.push_back(owner.to_string());
                }
            }
            None => tracing::trace!(path, "changed file has no owning component"),
        }
    }

    while let Some(current) = queue.pop_front() {
        let dependents: Vec<String> = graph
            .dependents_of(&current)
            .map(str::to_string)
            .collect();
        for dependent in dependents {
            if affected.insert(dependent.clone()) {
                queue.push_back(dependent);
            }
        }
    }

    let files: BTreeSet<&str> = affected
        .iter()
        .flat_map(|key| graph.files_of(key).iter().map(String::as_str))
        .collect();

    let result = AffectedSet {
        affected_files: files.into_iter().map(str::to_string).collect(),
        affected_components: affected.into_iter().collect(),
        affected_segments: segments_for(&changed),
    };
    tracing::debug!(
        changed = changed.len(),
        components = result.affected_components.len(),
        files = result.affected_files.len(),
        "computed affected set"
    );
    result
}
