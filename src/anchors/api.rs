//! Anchor API - list, get operations over the workspace index

use anyhow::Result;
use serde_json::json;
use std::path::Path;

use crate::config::Config;
use crate::core::model::{Confidence, Meta, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::host::workspace::load_index;
use crate::index::document::DocumentIndex;
use crate::index::store::AnchorIndex;
use crate::links::{resolve_all, ResolutionScope};
use crate::markers::marker::Marker;

fn marker_item(document: &DocumentIndex, marker: &Marker) -> ResultItem {
    let range = document.source().range_of(marker.source);
    let path = document.id().as_str();
    let item = if marker.is_anchor() {
        ResultItem::anchor(path, &marker.name, marker.source, range)
    } else {
        ResultItem::link(path, &marker.name, marker.source, range)
    };

    let mut item = item
        .with_excerpt(marker.raw_text(document.text()))
        .with_meta(Meta {
            version: Some(document.version().to_string()),
            size: Some(document.text().len() as u64),
        });
    if let Some(label) = marker.label_text(document.text()) {
        item = item.with_data(json!({ "label": label }));
    }
    item
}

/// List anchors across the workspace, optionally only names containing `filter`
pub fn list_anchors(index: &AnchorIndex, filter: Option<&str>) -> ResultSet {
    let filter = filter.map(str::to_lowercase);

    let mut result_set: ResultSet = index
        .documents()
        .flat_map(|document| {
            document
                .anchors()
                .iter()
                .map(move |anchor| (document, anchor))
        })
        .filter(|(_, anchor)| {
            filter
                .as_deref()
                .map_or(true, |f| anchor.name.to_lowercase().contains(f))
        })
        .map(|(document, anchor)| marker_item(document, anchor))
        .collect();

    result_set.sort();
    result_set
}

/// Every definition of `name`, optionally followed by the links that resolve to it
pub fn get_anchor(
    index: &AnchorIndex,
    name: &str,
    with_links: bool,
    scope: ResolutionScope,
) -> ResultSet {
    let mut result_set = ResultSet::new();

    let definitions: Vec<_> = index
        .documents()
        .filter_map(|document| document.anchor(name).map(|anchor| (document, anchor)))
        .collect();

    // One definition per document; several documents means links may be ambiguous.
    let confidence = if definitions.len() > 1 {
        Confidence::Medium
    } else {
        Confidence::High
    };
    for (document, anchor) in &definitions {
        result_set.push(marker_item(document, anchor).with_confidence(confidence));
    }

    if with_links && !definitions.is_empty() {
        for document in index.documents() {
            for resolved in resolve_all(document, scope.project(index)) {
                let Some(target) = resolved.resolution.preferred() else {
                    continue;
                };
                if target.anchor.name != name {
                    continue;
                }
                let confidence = if resolved.is_resolved() {
                    Confidence::Medium
                } else {
                    Confidence::Low
                };
                result_set.push(
                    marker_item(document, resolved.link)
                        .with_confidence(confidence)
                        .with_data(json!({
                            "status": resolved.resolution.status(),
                            "target": target.document.as_str(),
                        })),
                );
            }
        }
    }

    result_set
}

/// Run anchor list command
pub fn run_list(
    root: &Path,
    config: &Config,
    filter: Option<&str>,
    render_config: RenderConfig,
) -> Result<()> {
    let index = load_index(root, config)?;
    let result_set = list_anchors(&index, filter);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

/// Run anchor get command
pub fn run_get(
    root: &Path,
    config: &Config,
    name: &str,
    with_links: bool,
    render_config: RenderConfig,
) -> Result<()> {
    let index = load_index(root, config)?;
    let result_set = get_anchor(&index, name, with_links, config.scope);

    if result_set.is_empty() {
        log::info!("no anchor named {}", name);
    }

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
