//! The versioned compiler IR snapshot.
//!
//! Field names serialize in camelCase; every array is emitted in a
//! deterministic order so two snapshots of the same input are
//! byte-identical.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::summary::IrSummary;
use super::validate::{IrValidation, validate_compiler_ir};
use crate::base::{CoreError, FileKind};
use crate::hir::{Diagnostic, ReferenceRow, ScopeRow, SemanticEdge, Symbol};
use crate::types::LatticeType;

/// Version written by this crate.
pub const IR_VERSION: u32 = 1;
/// Oldest version the validator accepts by default.
pub const MIN_READABLE_VERSION: u32 = 1;

pub(crate) const GENERATOR: &str = concat!("rtgl-check ", env!("CARGO_PKG_VERSION"));

/// Edge/dependency kind for a component embedding another through its tag.
pub const TEMPLATE_TAG_DEPENDENCY: &str = "template-tag";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerIr {
    pub version: u32,
    pub structural: StructuralSection,
    pub semantic: SemanticSection,
    pub typed_contract: TypedContractSection,
    pub diagnostics: DiagnosticsSection,
    pub metadata: IrMetadata,
}

// ============================================================================
// STRUCTURAL
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSection {
    pub components: Vec<StructuralComponent>,
    pub dependencies: Vec<StructuralDependency>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralComponent {
    pub component_key: String,
    pub category: String,
    pub component: String,
    /// Declared tag name, if the schema names one.
    pub tag_name: Option<String>,
    /// Sorted by kind then path.
    pub files: Vec<FileEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub kind: FileKind,
    pub path: String,
}

/// `from` embeds `to` in its template.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralDependency {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub tag_name: String,
}

// ============================================================================
// SEMANTIC / TYPED CONTRACT / DIAGNOSTICS
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSection {
    pub symbols: Vec<Symbol>,
    pub scopes: Vec<ScopeRow>,
    pub edges: Vec<SemanticEdge>,
    pub refs: Vec<ReferenceRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedContractSection {
    pub components: Vec<TypedContract>,
}

/// The typed surface of one component: props, events and methods.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedContract {
    pub component_key: String,
    pub props: Vec<TypedProp>,
    pub events: Vec<String>,
    pub methods: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedProp {
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub ty: LatticeType,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSection {
    pub items: Vec<Diagnostic>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrMetadata {
    pub generator: String,
    pub component_count: usize,
    pub summary: IrSummary,
}

// ============================================================================
// SNAPSHOT API
// ============================================================================

impl CompilerIr {
    /// An empty snapshot at the current version.
    pub fn empty() -> Self {
        Self {
            version: IR_VERSION,
            structural: StructuralSection::default(),
            semantic: SemanticSection::default(),
            typed_contract: TypedContractSection::default(),
            diagnostics: DiagnosticsSection::default(),
            metadata: IrMetadata {
                generator: GENERATOR.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn to_value(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate this snapshot exactly as a consumer reading its JSON would.
    pub fn validate(&self) -> IrValidation {
        match self.to_value() {
            Ok(value) => validate_compiler_ir(&value),
            Err(err) => IrValidation::unreadable(err.to_string()),
        }
    }

    /// Component keys in structural order.
    pub fn component_keys(&self) -> impl Iterator<Item = &str> {
        self.structural
            .components
            .iter()
            .map(|c| c.component_key.as_str())
    }

    pub fn component(&self, component_key: &str) -> Option<&StructuralComponent> {
        self.structural
            .components
            .iter()
            .find(|c| c.component_key == component_key)
    }
}
