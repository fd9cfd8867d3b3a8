use std::collections::HashSet;

use lazy_static::lazy_static;
use maplit::hashset;

use crate::tree::{NodeId, ParseTree};

/// Tag of coordinating conjunctions.
pub static COORDINATION_TAG: &str = "CC";

lazy_static! {
    /// Part-of-speech tags of punctuation that is skipped when moving the
    /// head out of a coordination.
    pub static ref PUNCTUATION_TAGS: HashSet<&'static str> = hashset! {
        "''",
        "``",
        "-LRB-",
        "-RRB-",
        ".",
        ":",
        ",",
    };
}

/// Check whether a tag is in the fixed punctuation tag set.
pub fn is_punctuation_tag(tag: &str) -> bool {
    PUNCTUATION_TAGS.contains(tag)
}

/// The category of a node as used for rule lookups.
///
/// See [`transform_label_string`].
pub fn transform_label(tree: &ParseTree, node: NodeId) -> &str {
    transform_label_string(tree.is_leaf(node), tree.label(node))
}

/// Strip functional annotations from a category label.
///
/// Labels such as `NP-SBJ`, `NP=2` or `NP^S` are cut at the annotation
/// marker. An `=` or `^` marker is used when it precedes the first `-`,
/// of `=` and `^` the earliest wins. Markers at the start of a label do
/// not count, so `-NONE-` and `-LRB-` are kept intact. Leaf labels are
/// words and are never cut (e.g. *well-known*).
pub fn transform_label_string(is_leaf: bool, label: &str) -> &str {
    let dash = label.find('-');
    let mut marker = label.find('=');

    if let Some(caret) = label.find('^').filter(|&idx| idx > 0) {
        if marker.map_or(true, |eq| caret < eq) {
            marker = Some(caret);
        }
    }

    let mut cut = dash;
    if let Some(marker) = marker.filter(|&idx| idx > 0) {
        if cut.map_or(true, |dash| dash == 0 || marker < dash) {
            cut = Some(marker);
        }
    }

    match cut {
        Some(cut) if cut > 0 && !is_leaf => &label[..cut],
        _ => label,
    }
}
