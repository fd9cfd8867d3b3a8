use log::warn;

use crate::tree::{NodeId, ParseTree};

/// A constituent for which the head finder did not find a head.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingHead {
    node: NodeId,
    label: String,
    subtree: String,
}

impl MissingHead {
    pub(crate) fn new(tree: &ParseTree, node: NodeId) -> Self {
        MissingHead {
            node,
            label: tree.label(node).to_owned(),
            subtree: tree.subtree_to_string(node),
        }
    }

    /// The node without a head.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The label of the node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The serialized subtree rooted at the node.
    pub fn subtree(&self) -> &str {
        &self.subtree
    }
}

/// Observer of head finding problems during dependency extraction.
pub trait HeadObserver {
    /// Called for a node without a head, before its first child is used
    /// as the head.
    fn missing_head(&mut self, event: &MissingHead);
}

/// Observer that logs missing heads as warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl HeadObserver for LogObserver {
    fn missing_head(&mut self, event: &MissingHead) {
        warn!(
            "No head found for {}, using its first child: {}",
            event.label(),
            event.subtree()
        );
    }
}

/// Observer that counts and logs missing heads.
#[derive(Clone, Debug, Default)]
pub struct MissingHeadCounter {
    count: usize,
}

impl MissingHeadCounter {
    /// The number of missing heads.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl HeadObserver for MissingHeadCounter {
    fn missing_head(&mut self, event: &MissingHead) {
        self.count += 1;
        LogObserver.missing_head(event);
    }
}
