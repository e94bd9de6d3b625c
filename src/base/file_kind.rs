//! File roles and the analysis segments they feed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a tracked file plays inside a component.
///
/// Variants are declared in label order so the derived `Ord` matches the
/// lexicographic order of [`FileKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Constants,
    Handlers,
    Methods,
    Schema,
    Store,
    View,
}

/// Suffix table, checked in order. Longer suffixes never shadow shorter ones
/// because every entry carries its own `.kind.` infix.
const SUFFIXES: &[(&str, FileKind)] = &[
    (".view.yaml", FileKind::View),
    (".view.yml", FileKind::View),
    (".schema.yaml", FileKind::Schema),
    (".schema.yml", FileKind::Schema),
    (".constants.yaml", FileKind::Constants),
    (".constants.yml", FileKind::Constants),
    (".handlers.js", FileKind::Handlers),
    (".handlers.ts", FileKind::Handlers),
    (".store.js", FileKind::Store),
    (".store.ts", FileKind::Store),
    (".methods.js", FileKind::Methods),
    (".methods.ts", FileKind::Methods),
];

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::Constants,
        FileKind::Handlers,
        FileKind::Methods,
        FileKind::Schema,
        FileKind::Store,
        FileKind::View,
    ];

    /// Classify a path by its component-file suffix.
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_ascii_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Constants => "constants",
            FileKind::Handlers => "handlers",
            FileKind::Methods => "methods",
            FileKind::Schema => "schema",
            FileKind::Store => "store",
            FileKind::View => "view",
        }
    }

    /// Script modules are the files that export handlers, actions or methods.
    pub fn is_script_module(&self) -> bool {
        matches!(self, FileKind::Handlers | FileKind::Store | FileKind::Methods)
    }

    /// Analysis segments invalidated when a file of this kind changes.
    pub fn invalidated_segments(&self) -> &'static [Segment] {
        match self {
            FileKind::View => &[Segment::Structural, Segment::Template, Segment::Semantic],
            FileKind::Schema | FileKind::Handlers | FileKind::Store | FileKind::Methods => &[
                Segment::Structural,
                Segment::TypedContract,
                Segment::Semantic,
            ],
            FileKind::Constants => &[Segment::Structural, Segment::Semantic],
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An analysis phase whose output can be reused when none of its inputs changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    Structural,
    Template,
    TypedContract,
    Semantic,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Structural => "structural",
            Segment::Template => "template",
            Segment::TypedContract => "typed-contract",
            Segment::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/app/pages/home/home.view.yaml", Some(FileKind::View))]
    #[case("/app/pages/home/home.schema.yaml", Some(FileKind::Schema))]
    #[case("/app/pages/home/home.handlers.js", Some(FileKind::Handlers))]
    #[case("/app/pages/home/home.store.ts", Some(FileKind::Store))]
    #[case("/app/pages/home/home.methods.js", Some(FileKind::Methods))]
    #[case("/app/pages/home/home.constants.yml", Some(FileKind::Constants))]
    #[case("/app/pages/home/HOME.VIEW.YAML", Some(FileKind::View))]
    #[case("/app/pages/home/readme.md", None)]
    #[case("/app/pages/home/view.yaml", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<FileKind>) {
        assert_eq!(FileKind::from_path(path), expected);
    }

    #[test]
    fn test_kind_order_matches_labels() {
        let mut labels: Vec<_> = FileKind::ALL.iter().map(|k| k.as_str()).collect();
        let sorted = {
            let mut s = labels.clone();
            s.sort();
            s
        };
        assert_eq!(labels, sorted);
        labels.dedup();
        assert_eq!(labels.len(), FileKind::ALL.len());
    }

    #[test]
    fn test_segments_for_view_and_script() {
        assert_eq!(
            FileKind::View.invalidated_segments(),
            &[Segment::Structural, Segment::Template, Segment::Semantic]
        );
        assert_eq!(
            FileKind::Handlers.invalidated_segments(),
            &[Segment::Structural, Segment::TypedContract, Segment::Semantic]
        );
        assert!(FileKind::Store.is_script_module());
        assert!(!FileKind::Schema.is_script_module());
    }

    #[test]
    fn test_segment_serializes_kebab_case() {
        let json = serde_json::to_string(&Segment::TypedContract).unwrap();
        assert_eq!(json, "\"typed-contract\"");
    }
}
