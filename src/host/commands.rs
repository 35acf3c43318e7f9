//! Single-document commands: scan, resolve, decorate, preview

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use crate::config::Config;
use crate::core::model::{Confidence, Meta, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::text::Position;
use crate::decorations::DecorationRanges;
use crate::host::session::EditorSession;
use crate::host::sink::{PreviewSink, RecordingSink, RenderSink};
use crate::host::workspace::{load_document, load_index_with, LoadedDocument};
use crate::index::document::DocumentIndex;
use crate::index::store::AnchorIndex;
use crate::links::{resolve_all, AnchorTarget, Resolution, ResolvedLink};

fn emit(result_set: &ResultSet, render_config: RenderConfig) {
    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(result_set));
}

fn meta(document: &DocumentIndex) -> Meta {
    Meta {
        version: Some(document.version().to_string()),
        size: Some(document.text().len() as u64),
    }
}

/// Markers of one document, in document order
pub fn scan_document(document: &DocumentIndex) -> ResultSet {
    let text = document.text();
    let path = document.id().as_str();

    document
        .markers()
        .into_iter()
        .map(|marker| {
            let range = document.source().range_of(marker.source);
            let item = if marker.is_anchor() {
                ResultItem::anchor(path, &marker.name, marker.source, range)
            } else {
                ResultItem::link(path, &marker.name, marker.source, range)
            };
            item.with_excerpt(marker.raw_text(text))
                .with_meta(meta(document))
                .with_data(json!({
                    "label": marker.label_text(text),
                    "label_span": marker.label,
                }))
        })
        .collect()
}

fn target_json(target: &AnchorTarget<'_>, project: &AnchorIndex) -> serde_json::Value {
    let range = project
        .get(target.document)
        .map(|doc| doc.source().range_of(target.anchor.source));
    json!({
        "path": target.document.as_str(),
        "name": target.anchor.name,
        "span": target.anchor.source,
        "range": range,
    })
}

/// Resolution of every link in a document; targets are located through `project`
pub fn resolve_document(
    document: &DocumentIndex,
    resolved: &[ResolvedLink<'_>],
    project: &AnchorIndex,
) -> ResultSet {
    let path = document.id().as_str();

    resolved
        .iter()
        .map(|resolved| {
            let link = resolved.link;
            let range = document.source().range_of(link.source);
            let (confidence, data) = match &resolved.resolution {
                Resolution::Resolved(target) => (
                    Confidence::High,
                    json!({ "status": "resolved", "target": target_json(target, project) }),
                ),
                Resolution::Ambiguous(candidates) => (
                    Confidence::Medium,
                    json!({
                        "status": "ambiguous",
                        "candidates": candidates
                            .iter()
                            .map(|c| target_json(c, project))
                            .collect::<Vec<_>>(),
                    }),
                ),
                Resolution::Unresolved => (Confidence::Low, json!({ "status": "unresolved" })),
            };

            ResultItem::link(path, &link.name, link.source, range)
                .with_excerpt(link.raw_text(document.text()))
                .with_confidence(confidence)
                .with_data(data)
        })
        .collect()
}

/// Result items for every span of every decoration set, plus active markers
pub fn decoration_items(document: &DocumentIndex, ranges: &DecorationRanges) -> ResultSet {
    let path = document.id().as_str();
    let text = document.text();

    let mut result_set: ResultSet = ranges
        .sets()
        .flat_map(|(set, spans)| spans.iter().map(move |span| (set, *span)))
        .map(|(set, span)| {
            ResultItem::decoration(path, set.as_str(), span, document.source().range_of(span))
                .with_excerpt(span.slice(text))
        })
        .collect();

    for active in ranges.active_markers() {
        result_set.push(
            ResultItem::decoration(
                path,
                "active",
                active.source,
                document.source().range_of(active.source),
            )
            .with_excerpt(active.source.slice(text))
            .with_data(json!({ "kind": active.kind, "marker": active.name })),
        );
    }

    result_set.sort();
    result_set
}

fn open_session<S: RenderSink>(
    config: &Config,
    document: &LoadedDocument,
    cursor: Option<Position>,
    sink: S,
) -> Result<EditorSession<S>> {
    let mut session =
        EditorSession::new(config.clone(), sink).context("Cannot start editor session")?;
    session.open(document.id.clone(), document.text.clone());
    if !session.activate(&document.id, cursor)? {
        log::info!("{} is not decorated", document.id);
    }
    Ok(session)
}

/// Run the scan command
pub fn run_scan(
    root: &Path,
    file: &Path,
    config: &Config,
    render_config: RenderConfig,
) -> Result<()> {
    let document = load_document(root, file, config)?;
    let scanner = config.scanner().context("Invalid marker syntax")?;
    let index = DocumentIndex::build(
        document.id.clone(),
        document.version(config.hash),
        &document.text,
        &scanner,
    );

    emit(&scan_document(&index), render_config);
    Ok(())
}

/// Run the resolve command
pub fn run_resolve(
    root: &Path,
    file: &Path,
    config: &Config,
    render_config: RenderConfig,
) -> Result<()> {
    let document = load_document(root, file, config)?;
    let index = load_index_with(root, config, &document)?;
    let current = index
        .get(&document.id)
        .cloned()
        .with_context(|| format!("{} was not indexed", document.id))?;

    let resolved = resolve_all(&current, config.scope.project(&index));
    let result_set = resolve_document(&current, &resolved, &index);

    emit(&result_set, render_config);
    Ok(())
}

/// Run the decorate command
pub fn run_decorate(
    root: &Path,
    file: &Path,
    cursor: Option<Position>,
    config: &Config,
    render_config: RenderConfig,
) -> Result<()> {
    let document = load_document(root, file, config)?;
    let session = open_session(config, &document, cursor, RecordingSink::new())?;

    let result_set = match (
        session.index().get(&document.id),
        session.sink().current(&document.id),
    ) {
        (Some(index), Some(ranges)) => decoration_items(index, ranges),
        _ => ResultSet::new(),
    };

    emit(&result_set, render_config);
    Ok(())
}

/// Run the preview command: print the document as it would look decorated
pub fn run_preview(
    root: &Path,
    file: &Path,
    cursor: Option<Position>,
    config: &Config,
    color: bool,
) -> Result<()> {
    let document = load_document(root, file, config)?;
    let sink = PreviewSink::new(config.style.clone(), color);
    let session = open_session(config, &document, cursor, sink)?;

    match session.into_sink().into_output() {
        Some(output) => print!("{}", output),
        None => print!("{}", document.text),
    }
    Ok(())
}
