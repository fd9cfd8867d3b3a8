//! Head finding for constituency trees.
//!
//! A head finder picks the child of a constituent that determines its
//! syntactic behavior. [`CollinsHeadFinder`] does this with a table of
//! head rules per phrasal category, the default table is the modified
//! Collins table for Penn Treebank-style trees.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::tree::{NodeId, ParseTree};

mod label;
pub use self::label::{
    is_punctuation_tag, transform_label, transform_label_string, COORDINATION_TAG,
    PUNCTUATION_TAGS,
};

mod rules;
pub use self::rules::{Direction, HeadRule, HeadTable, MOD_COLLINS_RULES};

/// Trait for head finders.
pub trait HeadFinder {
    /// Determine the head child of `node`.
    ///
    /// Leaves have no head. The only child of a unary node is its head.
    /// Other nodes are handled by [`HeadFinder::determine_non_trivial_head`].
    fn determine_head(&self, tree: &ParseTree, node: NodeId) -> Option<NodeId> {
        match tree.children(node) {
            [] => None,
            [child] => Some(*child),
            _ => self.determine_non_trivial_head(tree, node),
        }
    }

    /// Determine the head child of a node with two or more children.
    fn determine_non_trivial_head(&self, tree: &ParseTree, node: NodeId) -> Option<NodeId>;

    /// Follow head children from `node` down to a leaf.
    ///
    /// When no head child can be found, the first child is followed.
    fn lexical_head(&self, tree: &ParseTree, node: NodeId) -> NodeId {
        let mut node = node;

        while let Some(&first) = tree.children(node).first() {
            node = self.determine_head(tree, node).unwrap_or(first);
        }

        node
    }
}

/// Head finder using Collins-style head rules.
///
/// The head rules of a phrasal category are tried in order, the last
/// rule falls back to the left- or rightmost child when none of its
/// categories match. The head is then moved from the right conjunct of a
/// coordination to the left conjunct.
#[derive(Clone, Debug)]
pub struct CollinsHeadFinder {
    table: Arc<HeadTable>,
    default_rule: Option<HeadRule>,
    coordination_tag: String,
    punctuation_tags: HashSet<String>,
}

impl CollinsHeadFinder {
    /// Construct a head finder with the given rule table.
    ///
    /// The finder uses the `CC` coordination tag and the fixed punctuation
    /// tag set. Categories that are not in the table have no head.
    pub fn new(table: Arc<HeadTable>) -> Self {
        CollinsHeadFinder {
            table,
            default_rule: None,
            coordination_tag: COORDINATION_TAG.to_owned(),
            punctuation_tags: PUNCTUATION_TAGS.iter().map(|&tag| tag.to_owned()).collect(),
        }
    }

    /// Construct a head finder with the modified Collins head rules.
    pub fn mod_collins() -> Self {
        Self::new(MOD_COLLINS_RULES.clone())
    }

    /// Use `rule` for categories that are not in the rule table.
    pub fn with_default_rule(mut self, rule: HeadRule) -> Self {
        self.default_rule = Some(rule);
        self
    }

    /// Use `tag` as the tag of coordinating conjunctions.
    pub fn with_coordination_tag(mut self, tag: impl Into<String>) -> Self {
        self.coordination_tag = tag.into();
        self
    }

    /// Use `tags` as the punctuation tags that are skipped when the head is
    /// moved to the left conjunct.
    pub fn with_punctuation_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.punctuation_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The rule table.
    pub fn table(&self) -> &HeadTable {
        &self.table
    }

    /// The rule for categories that are not in the table.
    pub fn default_rule(&self) -> Option<&HeadRule> {
        self.default_rule.as_ref()
    }

    /// The tag of coordinating conjunctions.
    pub fn coordination_tag(&self) -> &str {
        &self.coordination_tag
    }

    /// The punctuation tags.
    pub fn punctuation_tags(&self) -> &HashSet<String> {
        &self.punctuation_tags
    }

    /// Find the head child among `children` using a single rule.
    ///
    /// Returns `None` when no child matches and `allow_fallback` is not
    /// set.
    fn traverse_locate(
        &self,
        tree: &ParseTree,
        children: &[NodeId],
        rule: &HeadRule,
        allow_fallback: bool,
    ) -> Option<NodeId> {
        let head = match Self::locate(tree, children, rule) {
            Some(idx) => idx,
            None if allow_fallback => {
                if rule.direction.is_leftward() {
                    0
                } else {
                    children.len().checked_sub(1)?
                }
            }
            None => return None,
        };

        children
            .get(self.correct_coordination(tree, children, head))
            .copied()
    }

    fn locate(tree: &ParseTree, children: &[NodeId], rule: &HeadRule) -> Option<usize> {
        let has_category = |child: &NodeId, category: &str| transform_label(tree, *child) == category;

        match rule.direction {
            Direction::Left => rule.categories.iter().find_map(|category| {
                children
                    .iter()
                    .position(|child| has_category(child, category.as_str()))
            }),
            Direction::Right => rule.categories.iter().find_map(|category| {
                children
                    .iter()
                    .rposition(|child| has_category(child, category.as_str()))
            }),
            Direction::LeftDis => children
                .iter()
                .position(|&child| rule.matches(transform_label(tree, child))),
            Direction::RightDis => children
                .iter()
                .rposition(|&child| rule.matches(transform_label(tree, child))),
        }
    }

    /// Move the head from the right conjunct to the left conjunct.
    ///
    /// When the child before the head is a coordinating conjunction, the
    /// head becomes the child before the conjunction, skipping punctuation
    /// preterminals. If only punctuation precedes the conjunction, the head
    /// is left unchanged.
    fn correct_coordination(&self, tree: &ParseTree, children: &[NodeId], head: usize) -> usize {
        if head < 2 || tree.label(children[head - 1]) != self.coordination_tag {
            return head;
        }

        let mut idx = head - 2;
        loop {
            let child = children[idx];
            if !(tree.is_preterminal(child) && self.punctuation_tags.contains(tree.label(child))) {
                return idx;
            }

            if idx == 0 {
                return head;
            }

            idx -= 1;
        }
    }
}

impl Default for CollinsHeadFinder {
    fn default() -> Self {
        Self::mod_collins()
    }
}

impl HeadFinder for CollinsHeadFinder {
    fn determine_non_trivial_head(&self, tree: &ParseTree, node: NodeId) -> Option<NodeId> {
        let category = transform_label(tree, node);
        let children = tree.children(node);

        match self.table.get(category) {
            Some(rules) => {
                let last = rules.len().saturating_sub(1);
                rules.iter().enumerate().find_map(|(idx, rule)| {
                    self.traverse_locate(tree, children, rule, idx == last)
                })
            }
            None => match &self.default_rule {
                Some(rule) => self.traverse_locate(tree, children, rule, true),
                None => {
                    debug!("No head rules for category: {}", category);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use maplit::hashmap;

    use super::{CollinsHeadFinder, Direction, HeadFinder, HeadRule};
    use crate::tree::{NodeId, ParseTree};

    fn parse(desc: &str) -> ParseTree {
        desc.parse().unwrap()
    }

    fn head_word(finder: &impl HeadFinder, tree: &ParseTree, node: NodeId) -> String {
        let head = finder.determine_head(tree, node).unwrap();
        tree.label(finder.lexical_head(tree, head)).to_owned()
    }

    fn root_head_word(desc: &str) -> String {
        let tree = parse(desc);
        head_word(&CollinsHeadFinder::mod_collins(), &tree, tree.root())
    }

    #[test]
    fn leaves_have_no_head() {
        let tree = parse("(NN dog)");
        let finder = CollinsHeadFinder::mod_collins();
        let leaf = tree.children(tree.root())[0];
        assert_eq!(finder.determine_head(&tree, leaf), None);
    }

    #[test]
    fn unary_nodes_head_their_child() {
        let finder = CollinsHeadFinder::mod_collins();
        for desc in &["(NN dog)", "(UNKNOWN (NN dog))", "(NP (VP (VBZ runs)))"] {
            let tree = parse(desc);
            let root = tree.root();
            assert_eq!(
                finder.determine_head(&tree, root),
                Some(tree.children(root)[0])
            );
        }
    }

    #[test]
    fn noun_phrase_prefers_rightmost_noun() {
        let tree = parse("(NP (DT the) (JJ big) (NN dog))");
        let finder = CollinsHeadFinder::mod_collins();
        let root = tree.root();
        assert_eq!(
            finder.determine_head(&tree, root),
            Some(tree.children(root)[2])
        );

        assert_eq!(root_head_word("(NP (NN dog) (NNS food) (DT this))"), "food");
    }

    #[test]
    fn clause_prefers_verb_phrase() {
        assert_eq!(
            root_head_word("(S (NP (DT the) (NN dog)) (VP (VBZ runs)))"),
            "runs"
        );
    }

    #[test]
    fn functional_annotations_are_ignored() {
        assert_eq!(
            root_head_word("(NP-SBJ=1 (DT the) (NN-X dog) (NNS-Y dogs))"),
            "dogs"
        );
        assert_eq!(
            root_head_word("(S-TPC (NP-SBJ (PRP it)) (VP-PRD (VBZ works)))"),
            "works"
        );
    }

    #[test]
    fn head_finding_is_deterministic() {
        let tree = parse("(NP (NP (NN dog)) (CC and) (NP (NN cat)))");
        let finder = CollinsHeadFinder::mod_collins();
        let root = tree.root();
        let head = finder.determine_head(&tree, root);
        assert_eq!(head, finder.determine_head(&tree, root));
        assert_eq!(head, Some(tree.children(root)[0]));
    }

    #[test]
    fn coordination_moves_head_left() {
        assert_eq!(root_head_word("(ADVP (RB here) (CC and) (RB there))"), "here");
        assert_eq!(root_head_word("(UCP (JJ big) (CC and) (NN dog))"), "big");
    }

    #[test]
    fn coordination_skips_punctuation() {
        assert_eq!(
            root_head_word("(ADVP (RB here) (, ,) (CC and) (RB there))"),
            "here"
        );
        assert_eq!(
            root_head_word("(ADVP (RB here) (: ;) (, ,) (CC and) (RB there))"),
            "here"
        );
    }

    #[test]
    fn coordination_keeps_head_before_only_punctuation() {
        assert_eq!(root_head_word("(UCP (, ,) (CC and) (NN dog))"), "dog");
    }

    #[test]
    fn coordination_tag_is_configurable() {
        let tree = parse("(ADVP (RB here) (KON und) (RB there))");
        let root = tree.root();

        let finder = CollinsHeadFinder::mod_collins();
        assert_eq!(head_word(&finder, &tree, root), "there");

        let finder = CollinsHeadFinder::mod_collins().with_coordination_tag("KON");
        assert_eq!(head_word(&finder, &tree, root), "here");
    }

    #[test]
    fn punctuation_tags_are_configurable() {
        let tree = parse("(ADVP (RB here) (HYPH -) (CC and) (RB there))");
        let root = tree.root();

        let finder = CollinsHeadFinder::mod_collins();
        assert_eq!(head_word(&finder, &tree, root), "-");

        let finder = CollinsHeadFinder::mod_collins().with_punctuation_tags(vec!["HYPH"]);
        assert_eq!(head_word(&finder, &tree, root), "here");
    }

    #[test]
    fn unknown_category_has_no_head() {
        let tree = parse("(FOO (AA a) (BB b))");
        let finder = CollinsHeadFinder::mod_collins();
        assert_eq!(finder.determine_head(&tree, tree.root()), None);
    }

    #[test]
    fn default_rule_for_unknown_category() {
        let tree = parse("(FOO (AA a) (BB b) (CC c))");
        let root = tree.root();

        let finder = CollinsHeadFinder::mod_collins()
            .with_default_rule(HeadRule::new(Direction::Left, &["BB"]));
        assert_eq!(head_word(&finder, &tree, root), "b");

        let finder = CollinsHeadFinder::mod_collins()
            .with_default_rule(HeadRule::new(Direction::Left, &["ZZ"]));
        assert_eq!(head_word(&finder, &tree, root), "a");
    }

    #[test]
    fn last_rule_falls_back() {
        let table = hashmap! {
            "X".to_owned() => vec![
                HeadRule::new(Direction::LeftDis, &["ZZ"]),
                HeadRule::new(Direction::RightDis, &["YY"]),
            ],
        };
        let finder = CollinsHeadFinder::new(Arc::new(table));
        let tree = parse("(X (AA a) (BB b))");
        assert_eq!(head_word(&finder, &tree, tree.root()), "b");
    }

    #[test]
    fn disjunctive_rules_search_children_first() {
        let tree = parse("(X (AA a) (BB b) (AA c))");
        let root = tree.root();

        let rules = |direction| {
            let table = hashmap! {
                "X".to_owned() => vec![HeadRule::new(direction, &["BB", "AA"])],
            };
            CollinsHeadFinder::new(Arc::new(table))
        };

        assert_eq!(head_word(&rules(Direction::Left), &tree, root), "b");
        assert_eq!(head_word(&rules(Direction::LeftDis), &tree, root), "a");
        assert_eq!(head_word(&rules(Direction::Right), &tree, root), "b");
        assert_eq!(head_word(&rules(Direction::RightDis), &tree, root), "c");
    }

    #[test]
    fn lexical_head_follows_heads_to_a_leaf() {
        let tree = parse("(S (NP (DT the) (NN dog)) (VP (VBZ runs) (ADVP (RB fast))))");
        let finder = CollinsHeadFinder::mod_collins();
        let head = finder.lexical_head(&tree, tree.root());
        assert!(tree.is_leaf(head));
        assert_eq!(tree.label(head), "runs");

        let np = tree.children(tree.root())[0];
        assert_eq!(tree.label(finder.lexical_head(&tree, np)), "dog");
    }

    #[test]
    fn head_finder_can_be_shared() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CollinsHeadFinder>();
    }
}
