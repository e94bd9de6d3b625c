//! Framework symbol passes that run beside scope resolution.
//!
//! - listener wiring: every `eventListeners` handler/action must be exported
//!   by the handlers/store module, every schema method by the methods module
//! - component tags: every component-looking tag must be in the registry

use super::diagnostics::{Diagnostic, RelatedLocation, codes};
use super::suggest::rank_candidates;
use crate::base::FileKind;
use crate::model::{ComponentModel, Registry, ScriptModule};

/// Suggestions attached to an unresolved listener, method or tag.
pub const MAX_SUGGESTIONS: usize = 3;

fn suggestions(
    diag: Diagnostic,
    name: &str,
    pool: &ScriptModule,
    file_path: Option<&str>,
) -> Diagnostic {
    rank_candidates(name, pool.exports.iter().map(String::as_str), MAX_SUGGESTIONS)
        .into_iter()
        .fold(diag, |diag, candidate| {
            diag.with_related(RelatedLocation::new(
                file_path,
                0,
                0,
                format!("Did you mean '{candidate}'?"),
            ))
        })
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

fn unresolved_framework_symbol(model: &ComponentModel, message: String) -> Diagnostic {
    Diagnostic::error(codes::UNRESOLVED_FRAMEWORK_SYMBOL, message)
        .with_category(codes::SEMANTIC_CATEGORY)
        .with_component(&model.component_key)
}

/// Check listener handlers/actions and schema-declared methods against the
/// component's exports.
pub fn check_listeners(model: &ComponentModel) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let view_file = model.file_path(FileKind::View);
    let handlers_file = model.file_path(FileKind::Handlers);
    let store_file = model.file_path(FileKind::Store);
    let methods_file = model.file_path(FileKind::Methods);

    for (ref_name, config) in &model.view.refs {
        for (event, listener) in &config.event_listeners {
            let handler = non_empty(listener.handler.as_deref());
            if let Some(handler) = handler.filter(|h| !model.handlers.exports(h)) {
                let diag = unresolved_framework_symbol(
                    model,
                    format!(
                        "Listener '{event}' on ref '{ref_name}' references unknown handler '{handler}'"
                    ),
                )
                .with_file(view_file);
                out.push(suggestions(diag, handler, &model.handlers, handlers_file));
            }

            let action = non_empty(listener.action.as_deref());
            if let Some(action) = action.filter(|a| !model.store.exports(a)) {
                let diag = unresolved_framework_symbol(
                    model,
                    format!(
                        "Listener '{event}' on ref '{ref_name}' references unknown store action '{action}'"
                    ),
                )
                .with_file(view_file);
                out.push(suggestions(diag, action, &model.store, store_file));
            }
        }
    }

    for method in &model.schema.method_names {
        if !model.methods.exports(method) {
            let diag = unresolved_framework_symbol(
                model,
                format!("Schema method '{method}' is not exported by the methods module"),
            )
            .with_file(model.file_path(FileKind::Schema));
            out.push(suggestions(diag, method, &model.methods, methods_file));
        }
    }

    out.sort_by(Diagnostic::sort_cmp);
    out
}

/// Check every component-looking tag of the template against the registry.
pub fn check_component_tags(model: &ComponentModel, registry: &Registry) -> Vec<Diagnostic> {
    let view_file = model.file_path(FileKind::View);
    let mut tags: Vec<_> = model
        .view
        .tags
        .iter()
        .filter(|tag| tag.looks_like_component() && !registry.contains(&tag.tag_name))
        .collect();
    tags.sort_by(|a, b| (a.span, &a.tag_name).cmp(&(b.span, &b.tag_name)));

    tags.into_iter()
        .map(|tag| {
            let diag = Diagnostic::error(
                codes::UNRESOLVED_COMPONENT_TAG,
                format!("Unknown component tag '{}'", tag.tag_name),
            )
            .with_category(codes::SEMANTIC_CATEGORY)
            .with_component(&model.component_key)
            .with_file(view_file)
            .with_span(tag.span);

            rank_candidates(&tag.tag_name, registry.tag_names(), MAX_SUGGESTIONS)
                .into_iter()
                .fold(diag, |diag, candidate| {
                    let declared_by = registry
                        .get(candidate)
                        .and_then(|contract| contract.component_key.as_deref());
                    let message = match declared_by {
                        Some(key) => format!("Did you mean '{candidate}' (declared by {key})?"),
                        None => format!("Did you mean '{candidate}'?"),
                    };
                    diag.with_related(RelatedLocation::new(None, 0, 0, message))
                })
        })
        .collect()
}
