//! Small component workspaces used across the integration tests.
//!
//! ```text
//! pages/home ──app-card──► components/card ──app-button──► components/button
//! components/footer (standalone)
//! ```

use rtgl_check::base::{FileKind, SourceSpan};
use rtgl_check::model::{
    ComponentContract, ComponentModel, ListenerConfig, LocalScopeGraph, RefConfig, Registry,
    ScriptModule, TagUsage, TemplateReference,
};

pub const BUTTON_VIEW: &str = "/src/components/button/button.view.yaml";
pub const CARD_VIEW: &str = "/src/components/card/card.view.yaml";
pub const CARD_SCHEMA: &str = "/src/components/card/card.schema.yaml";
pub const HOME_VIEW: &str = "/src/pages/home/home.view.yaml";
pub const HOME_HANDLERS: &str = "/src/pages/home/home.handlers.js";
pub const FOOTER_VIEW: &str = "/src/components/footer/footer.view.yaml";

fn reference(line: u32, expression: &str, roots: &[&str]) -> TemplateReference {
    TemplateReference::new(SourceSpan::point(line, 4), expression)
        .with_context("text")
        .with_roots(roots.iter().copied())
}

fn base(key: &str, view: &str, tag: &str) -> ComponentModel {
    let mut model = ComponentModel::new(key);
    let (category, component) = key.split_once('/').unwrap_or(("", key));
    model.category = category.to_string();
    model.component = component.to_string();
    model.files.insert(FileKind::View, view.to_string());
    model.schema.component_name = Some(tag.to_string());
    model
}

pub fn button() -> ComponentModel {
    let mut model = base("components/button", BUTTON_VIEW, "app-button");
    model.schema.prop_names.insert("label".to_string());
    model.semantic_graph = Some(LocalScopeGraph::from_references(vec![reference(
        2,
        "label",
        &["label"],
    )]));
    model
}

pub fn card() -> ComponentModel {
    let mut model = base("components/card", CARD_VIEW, "app-card");
    model.files.insert(FileKind::Schema, CARD_SCHEMA.to_string());
    model.schema.prop_names.insert("title".to_string());
    model.schema.required_props.insert("title".to_string());
    model.schema.props.insert(
        "title".to_string(),
        serde_json::json!({ "type": "string" }),
    );
    model.view.tags = vec![TagUsage::new("app-button", SourceSpan::point(5, 2))];
    model.semantic_graph = Some(LocalScopeGraph::from_references(vec![
        reference(3, "title", &["title"]),
        reference(6, "item.name", &["item"]).with_locals(["item"]),
    ]));
    model
}

/// References `total`, which nothing in the component declares.
pub fn home() -> ComponentModel {
    let mut model = base("pages/home", HOME_VIEW, "page-home");
    model.files.insert(FileKind::Handlers, HOME_HANDLERS.to_string());
    model.handlers = ScriptModule::with_exports(["handleOpen"]);
    model.schema.prop_names.extend(["subtotal".to_string(), "totalCount".to_string()]);
    model.view.constants.insert("tota".to_string());

    let mut open = RefConfig::default();
    open.event_listeners.insert(
        "click".to_string(),
        ListenerConfig {
            handler: Some("handleOpen".to_string()),
            action: None,
        },
    );
    model.view.refs.insert("openButton".to_string(), open);

    model.view.tags = vec![TagUsage::new("app-card", SourceSpan::point(8, 2))];
    model.semantic_graph = Some(LocalScopeGraph::from_references(vec![
        reference(4, "total", &["total"]),
        reference(5, "subtotal + totalCount", &["subtotal", "totalCount"]),
    ]));
    model
}

pub fn footer() -> ComponentModel {
    base("components/footer", FOOTER_VIEW, "app-footer")
}

/// Every fixture component, in no particular order.
pub fn workspace() -> Vec<ComponentModel> {
    vec![home(), footer(), button(), card()]
}

/// Registry exporting every fixture tag.
pub fn registry() -> Registry {
    workspace()
        .into_iter()
        .filter_map(|model| {
            let tag = model.schema.component_name.clone()?;
            let contract = ComponentContract {
                component_key: Some(model.component_key.clone()),
                required_props: model.schema.required_props.clone(),
                ..Default::default()
            };
            Some((tag, contract))
        })
        .collect()
}
