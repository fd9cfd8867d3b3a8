//! Bracketed constituency trees.
//!
//! Trees are read from the usual Penn Treebank bracket notation, e.g.
//! `(S (NP (DT the) (NN dog)) (VP (VBZ runs)))`. Nodes are stored in an
//! arena and are addressed through [`NodeId`]s, the root is always node 0.

use std::fmt;
use std::mem;
use std::str::FromStr;

mod error;
pub use self::error::MalformedTreeError;

mod parse;
pub use self::parse::normalize;

mod span;
pub use self::span::{Constituent, Span};

/// Index of a node in a [`ParseTree`].
pub type NodeId = usize;

/// Separator used when labels of a collapsed spine are concatenated.
pub const LABEL_SEPARATOR: char = '|';

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Node {
    pub(crate) label: String,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(label: String) -> Self {
        Node {
            label,
            children: Vec::new(),
        }
    }
}

/// A constituency tree.
///
/// Trees are constructed once by parsing a bracketed description and are
/// immutable afterwards. Transformations such as
/// [`ParseTree::collapse_singleton_spines`] return a new tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ParseTree {
    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The number of nodes, including the leaves.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The label of a node.
    ///
    /// For leaves this is the word, for preterminals the part-of-speech
    /// tag, and for other nodes the phrasal category.
    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node].label
    }

    /// The children of a node, from left to right.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    /// Check whether the node is a leaf (has no children).
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node].children.is_empty()
    }

    /// Check whether the node is a preterminal.
    ///
    /// A preterminal has exactly one child, which is a leaf.
    pub fn is_preterminal(&self, node: NodeId) -> bool {
        match self.nodes[node].children.as_slice() {
            [child] => self.is_leaf(*child),
            _ => false,
        }
    }

    /// All nodes in post-order.
    ///
    /// Every node comes after all of its descendants, the root is the last
    /// node. The traversal is computed on each call.
    pub fn post_order(&self) -> Vec<NodeId> {
        self.post_order_from(self.root)
    }

    /// All nodes of the subtree rooted at `node` in post-order.
    pub fn post_order_from(&self, node: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(node, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
            } else {
                stack.push((node, true));
                for &child in self.nodes[node].children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        order
    }

    /// The leaf nodes, from left to right.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.terminals()
    }

    /// The number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|node| node.children.is_empty()).count()
    }

    /// Terminal nodes in post-order.
    pub fn terminals(&self) -> Vec<NodeId> {
        self.post_order()
            .into_iter()
            .filter(|&node| self.is_leaf(node))
            .collect()
    }

    /// Non-terminal nodes (including preterminals) in post-order.
    pub fn non_terminals(&self) -> Vec<NodeId> {
        self.post_order()
            .into_iter()
            .filter(|&node| !self.is_leaf(node))
            .collect()
    }

    /// Compute the leaf span of every node.
    ///
    /// Leaves are numbered from left to right starting at 0. The span of
    /// an inner node runs from the start of its first child to the end of
    /// its last child. The result is indexed by [`NodeId`].
    pub fn spans(&self) -> Vec<Span> {
        let mut spans = vec![Span::new(0, 0); self.nodes.len()];
        let mut next_leaf = 0;

        for node in self.post_order() {
            let children = &self.nodes[node].children;
            spans[node] = match (children.first(), children.last()) {
                (Some(&first), Some(&last)) => Span::new(spans[first].start(), spans[last].end()),
                _ => {
                    next_leaf += 1;
                    Span::new(next_leaf - 1, next_leaf - 1)
                }
            };
        }

        spans
    }

    /// Constituents of the tree in post-order.
    pub fn constituents(&self) -> Vec<Constituent> {
        let spans = self.spans();
        self.post_order()
            .into_iter()
            .map(|node| Constituent::new(node, spans[node], self.label(node)))
            .collect()
    }

    /// Words and part-of-speech tags of the preterminals.
    ///
    /// Leaves that are not dominated by a preterminal are skipped.
    pub fn words_and_tags(&self) -> (Vec<&str>, Vec<&str>) {
        self.post_order()
            .into_iter()
            .filter(|&node| self.is_preterminal(node))
            .map(|node| (self.label(self.nodes[node].children[0]), self.label(node)))
            .unzip()
    }

    /// Serialize the subtree rooted at `node`.
    pub fn subtree_to_string(&self, node: NodeId) -> String {
        Subtree { tree: self, node }.to_string()
    }

    /// Merge unary non-preterminal nodes with their children.
    ///
    /// With `same_label_only`, a node is only merged with its child when
    /// both have the same label, so `(NP (NP (DT the) (NN dog)))` becomes
    /// `(NP (DT the) (NN dog))`. Otherwise every such node is merged and
    /// gets the label of the child, or the labels of both separated by
    /// [`LABEL_SEPARATOR`] when `append_labels` is set (e.g. `S|VP`).
    ///
    /// Children are collapsed before their parents and every node absorbs
    /// at most one level.
    pub fn collapse_singleton_spines(&self, same_label_only: bool, append_labels: bool) -> Self {
        let mut drafts: Vec<Draft> = self
            .nodes
            .iter()
            .map(|node| Draft {
                label: node.label.clone(),
                children: node.children.clone(),
            })
            .collect();

        for node in self.post_order() {
            if drafts[node].children.len() != 1 || self.is_preterminal(node) {
                continue;
            }

            let child = drafts[node].children[0];
            if same_label_only && drafts[node].label != drafts[child].label {
                continue;
            }

            let child = mem::take(&mut drafts[child]);
            let draft = &mut drafts[node];
            if !same_label_only {
                if append_labels && !draft.label.is_empty() {
                    draft.label.push(LABEL_SEPARATOR);
                    draft.label.push_str(&child.label);
                } else {
                    draft.label = child.label;
                }
            }
            draft.children = child.children;
        }

        // Renumber the remaining nodes in pre-order.
        let mut nodes: Vec<Node> = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(self.root, None)];
        while let Some((draft_id, parent)) = stack.pop() {
            let id = nodes.len();
            let draft = mem::take(&mut drafts[draft_id]);
            nodes.push(Node::new(draft.label));

            if let Some(parent) = parent {
                nodes[parent].children.push(id);
            }

            stack.extend(draft.children.into_iter().rev().map(|child| (child, Some(id))));
        }

        ParseTree { nodes, root: 0 }
    }

    fn write_node(&self, f: &mut impl fmt::Write, node: NodeId) -> fmt::Result {
        // Nodes with the index of the next child to write.
        let mut stack = vec![(node, 0)];

        while let Some((node, child_idx)) = stack.pop() {
            let Node { label, children } = &self.nodes[node];

            if children.is_empty() {
                f.write_str(label)?;
                continue;
            }

            if child_idx == 0 {
                f.write_char('(')?;
                f.write_str(label)?;
            }

            if child_idx == children.len() {
                f.write_char(')')?;
                continue;
            }

            if child_idx > 0 || !label.is_empty() {
                f.write_char(' ')?;
            }

            stack.push((node, child_idx + 1));
            stack.push((children[child_idx], 0));
        }

        Ok(())
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_node(f, self.root)
    }
}

struct Subtree<'a> {
    tree: &'a ParseTree,
    node: NodeId,
}

impl<'a> fmt::Display for Subtree<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.tree.write_node(f, self.node)
    }
}

impl FromStr for ParseTree {
    type Err = MalformedTreeError;

    fn from_str(desc: &str) -> Result<Self, Self::Err> {
        parse::parse(desc)
    }
}

/// Label and children of a node while a tree is restructured.
#[derive(Default)]
struct Draft {
    label: String,
    children: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::{ParseTree, Span};

    static DOG_RUNS: &str = "(S (NP (DT the) (NN dog)) (VP (VBZ runs)))";

    fn parse(desc: &str) -> ParseTree {
        desc.parse().unwrap()
    }

    #[test]
    fn round_trips_valid_trees() {
        for desc in &[
            DOG_RUNS,
            "((S (NP (DT the) (JJ quick) (JJ (AA (BB (CC brown)))) (NN fox)) (VP (VBD jumped) (PP (IN over) (NP (DT the) (JJ lazy) (NN dog)))) (. .)))",
            "(NP (NNP well-known) (NNS words))",
            "(X (-LRB- -LRB-) (NN x) (-RRB- -RRB-))",
        ] {
            assert_eq!(parse(desc).to_string(), *desc);
        }
    }

    #[test]
    fn round_trips_after_normalization() {
        let tree = parse("\t(S\n  (NP (DT the)   (NN dog))\n  (VP (VBZ runs))\n)\n");
        assert_eq!(tree.to_string(), DOG_RUNS);
    }

    #[test]
    fn node_predicates() {
        let tree = parse(DOG_RUNS);
        let root = tree.root();
        assert_eq!(tree.label(root), "S");
        assert!(!tree.is_leaf(root));
        assert!(!tree.is_preterminal(root));

        let np = tree.children(root)[0];
        assert_eq!(tree.label(np), "NP");
        assert!(!tree.is_preterminal(np));

        let dt = tree.children(np)[0];
        assert!(tree.is_preterminal(dt));

        let the = tree.children(dt)[0];
        assert!(tree.is_leaf(the));
        assert_eq!(tree.label(the), "the");
    }

    #[test]
    fn post_order_visits_descendants_first() {
        let tree = parse(DOG_RUNS);
        let order = tree.post_order();

        assert_eq!(order.len(), tree.len());
        assert_eq!(*order.last().unwrap(), tree.root());

        let labels: Vec<_> = order.iter().map(|&node| tree.label(node)).collect();
        assert_eq!(
            labels,
            vec!["the", "DT", "dog", "NN", "NP", "runs", "VBZ", "VP", "S"]
        );

        // The traversal is recomputed and does not depend on earlier calls.
        assert_eq!(tree.post_order(), order);
    }

    #[test]
    fn spans_are_consistent() {
        let tree = parse(
            "((S (NP (DT the) (JJ quick) (NN fox)) (VP (VBD jumped) (PP (IN over) (NP (DT the) (NN dog)))) (. .)))",
        );
        let spans = tree.spans();

        assert_eq!(spans[tree.root()], Span::new(0, 7));

        for node in tree.post_order() {
            let span = spans[node];
            assert!(span.start() <= span.end());

            let children = tree.children(node);
            if children.is_empty() {
                assert_eq!(span.start(), span.end());
            } else {
                let start = children.iter().map(|&c| spans[c].start()).min().unwrap();
                let end = children.iter().map(|&c| spans[c].end()).max().unwrap();
                assert_eq!(span, Span::new(start, end));
            }
        }
    }

    #[test]
    fn constituents_carry_names_and_spans() {
        let tree = parse(DOG_RUNS);
        let constituents = tree.constituents();

        let np = constituents.iter().find(|c| c.name() == "NP").unwrap();
        assert_eq!(np.span(), Span::new(0, 1));

        let vp = constituents.iter().find(|c| c.name() == "VP").unwrap();
        assert_eq!(vp.span(), Span::new(2, 2));
        assert_eq!(tree.label(vp.node()), "VP");
    }

    #[test]
    fn leaves_and_words() {
        let tree = parse(DOG_RUNS);

        assert_eq!(tree.n_leaves(), 3);
        let leaves: Vec<_> = tree
            .leaves()
            .into_iter()
            .map(|node| tree.label(node))
            .collect();
        assert_eq!(leaves, vec!["the", "dog", "runs"]);

        let (words, tags) = tree.words_and_tags();
        assert_eq!(words, vec!["the", "dog", "runs"]);
        assert_eq!(tags, vec!["DT", "NN", "VBZ"]);

        assert_eq!(tree.non_terminals().len(), 6);
    }

    #[test]
    fn serializes_subtrees() {
        let tree = parse(DOG_RUNS);
        let np = tree.children(tree.root())[0];
        assert_eq!(tree.subtree_to_string(np), "(NP (DT the) (NN dog))");
    }

    #[test]
    fn collapses_spines_with_same_label() {
        let tree = parse("(S (NP (NP (DT the) (NN dog))) (VP (VP (VBZ runs))))");
        assert_eq!(
            tree.collapse_singleton_spines(true, false).to_string(),
            "(S (NP (DT the) (NN dog)) (VP (VBZ runs)))"
        );
    }

    #[test]
    fn collapses_all_spines() {
        let tree = parse("((S (NP (PRP it)) (VP (VBZ works))))");
        assert_eq!(
            tree.collapse_singleton_spines(false, false).to_string(),
            "(S (PRP it) (VBZ works))"
        );

        let tree = parse("(SBAR (S (VP (VB go) (ADVP (RB now)))))");
        assert_eq!(
            tree.collapse_singleton_spines(false, true).to_string(),
            "(SBAR|S|VP (VB go) (ADVP|RB now))"
        );
    }

    fn unary_chain(depth: usize) -> String {
        format!("{}(NN x){}", "(A ".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn handles_deep_trees() {
        let desc = unary_chain(200_000);
        let tree = parse(&desc);

        assert_eq!(tree.len(), 200_002);
        assert_eq!(tree.to_string(), desc);
        assert_eq!(tree.spans()[tree.root()], Span::new(0, 0));
        assert_eq!(
            tree.collapse_singleton_spines(true, false).to_string(),
            "(A (NN x))"
        );
        assert_eq!(
            tree.collapse_singleton_spines(false, false).to_string(),
            "(NN x)"
        );
    }

    #[test]
    fn collapsing_keeps_preterminals() {
        let tree = parse("(NN dog)");
        assert_eq!(tree.collapse_singleton_spines(false, true), tree);

        let tree = parse("(NP (NN dog))");
        assert_eq!(tree.collapse_singleton_spines(true, false), tree);
    }
}
