//! Splits a period cell into its sub-entries.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Node, normalize_ws};
use crate::entry::build_entry;
use crate::event_kind::EventKind;
use crate::model::ScheduleEntry;
use crate::types::View;

static BLOCK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ednevnik-seznam_ur_teden-blok-\d{6}-\d{4}-\d{2}-\d{2}")
        .expect("block id pattern is valid")
});

/// A block groups several entries sharing one period slot.
pub fn is_block<N: Node>(node: &N) -> bool {
    node.attr("id").is_some_and(|id| BLOCK_ID.is_match(id))
}

/// A container whose element children are all `div` sections.
fn is_section_group<N: Node>(node: &N) -> bool {
    let children = node.children();
    !children.is_empty() && children.iter().all(|child| child.tag() == "div")
}

/// Sub-entry nodes of a cell in encounter order.
///
/// Blocks always expand. Outside a block, only a cell made of a primary
/// entry and one sibling holding further sections is split; every other
/// child is a sub-entry of its own.
pub fn sub_entry_nodes<N: Node>(cell: &N) -> Vec<N> {
    let children = cell.children();
    if let [primary, secondary] = children.as_slice() {
        if !is_block(primary) && !is_block(secondary) && is_section_group(secondary) {
            let mut nodes = vec![primary.clone()];
            nodes.extend(secondary.children());
            return nodes;
        }
    }

    let mut nodes = Vec::new();
    for child in children {
        if is_block(&child) {
            nodes.extend(child.children());
        } else {
            nodes.push(child);
        }
    }
    nodes
}

/// Event kind from the first marker icon; `None` for an ordinary lesson.
pub fn event_kind<N: Node>(node: &N) -> Option<EventKind> {
    let img = node.find_tag("img")?;
    match img.attr("title") {
        Some(title) => Some(EventKind::from_marker_title(title)),
        None => {
            tracing::warn!("event marker without a title");
            Some(EventKind::Unknown)
        }
    }
}

/// Parses every sub-entry of `cell` independently.
///
/// A sub-entry that fails is logged with its raw text and dropped; the
/// survivors are numbered `0..n` in encounter order.
pub fn decompose<N: Node>(cell: &N, view: View) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();
    for node in sub_entry_nodes(cell) {
        let event = event_kind(&node);
        match build_entry(&node, event, view) {
            Ok(kind) => entries.push(ScheduleEntry {
                hour_in_block: entries.len(),
                event,
                kind,
            }),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    raw = %normalize_ws(&node.text()),
                    "skipping unparseable sub-entry"
                );
            }
        }
    }
    entries
}
