use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use maplit::hashmap;
use serde::{Deserialize, Serialize};

/// Order in which the children of a node are searched.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// For each category in order, search the children left-to-right.
    Left,

    /// For each child left-to-right, test all categories.
    LeftDis,

    /// For each category in order, search the children right-to-left.
    Right,

    /// For each child right-to-left, test all categories.
    RightDis,
}

impl Direction {
    /// Check whether the children are searched from the left.
    pub fn is_leftward(self) -> bool {
        matches!(self, Direction::Left | Direction::LeftDis)
    }

    /// Check whether the search iterates over children before categories.
    pub fn is_disjunctive(self) -> bool {
        matches!(self, Direction::LeftDis | Direction::RightDis)
    }
}

/// A single head rule entry.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeadRule {
    pub direction: Direction,

    #[serde(default)]
    pub categories: Vec<String>,
}

impl HeadRule {
    pub fn new<S>(direction: Direction, categories: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        HeadRule {
            direction,
            categories: categories
                .iter()
                .map(|category| category.as_ref().to_owned())
                .collect(),
        }
    }

    /// Check whether `category` is one of the rule's categories.
    pub fn matches(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Rule entries per phrasal category, applied in order.
pub type HeadTable = HashMap<String, Vec<HeadRule>>;

fn noun_phrase_rules() -> Vec<HeadRule> {
    vec![
        HeadRule::new(
            Direction::RightDis,
            &["NN", "NNP", "NNPS", "NNS", "NX", "JJR"],
        ),
        HeadRule::new(Direction::Left, &["NP"]),
        HeadRule::new(Direction::RightDis, &["$", "ADJP", "PRN"]),
        HeadRule::new(Direction::Right, &["CD"]),
        HeadRule::new(Direction::RightDis, &["JJ", "JJS", "RB", "QP"]),
    ]
}

fn left(categories: &[&str]) -> Vec<HeadRule> {
    vec![HeadRule::new(Direction::Left, categories)]
}

fn right(categories: &[&str]) -> Vec<HeadRule> {
    vec![HeadRule::new(Direction::Right, categories)]
}

lazy_static! {
    /// The modified Collins head rules for Penn Treebank-style trees.
    pub static ref MOD_COLLINS_RULES: Arc<HeadTable> = Arc::new(hashmap! {
        "ADJP".to_owned() => left(&[
            "NNS", "QP", "NN", "$", "ADVP", "JJ", "VBN", "VBG", "ADJP", "JJR", "NP", "JJS", "DT",
            "FW", "RBR", "RBS", "SBAR", "RB",
        ]),
        "ADVP".to_owned() => right(&[
            "RB", "RBR", "RBS", "FW", "ADVP", "TO", "CD", "JJR", "JJ", "IN", "NP", "JJS", "NN",
        ]),
        "CONJP".to_owned() => right(&["CC", "RB", "IN"]),
        "FRAG".to_owned() => right(&[]),
        "INTJ".to_owned() => left(&[]),
        "LST".to_owned() => right(&["LS", ":"]),
        "NAC".to_owned() => left(&[
            "NN", "NNS", "NNP", "NNPS", "NP", "NAC", "EX", "$", "CD", "QP", "PRP", "VBG", "JJ",
            "JJS", "JJR", "ADJP", "FW",
        ]),
        "NX".to_owned() => left(&[]),
        "PP".to_owned() => right(&["IN", "TO", "VBG", "VBN", "RP", "FW"]),
        "PRN".to_owned() => left(&[]),
        "PRT".to_owned() => right(&["RP"]),
        "QP".to_owned() => left(&[
            "$", "IN", "NNS", "NN", "JJ", "RB", "DT", "CD", "NCD", "QP", "JJR", "JJS",
        ]),
        "RRC".to_owned() => right(&["VP", "NP", "ADVP", "ADJP", "PP"]),
        "S".to_owned() => left(&["TO", "IN", "VP", "S", "SBAR", "ADJP", "UCP", "NP"]),
        "SBAR".to_owned() => left(&[
            "WHNP", "WHPP", "WHADVP", "WHADJP", "IN", "DT", "S", "SQ", "SINV", "SBAR", "FRAG",
        ]),
        "SBARQ".to_owned() => left(&["SQ", "S", "SINV", "SBARQ", "FRAG"]),
        "SINV".to_owned() => left(&[
            "VBZ", "VBD", "VBP", "VB", "MD", "VP", "S", "SINV", "ADJP", "NP",
        ]),
        "SQ".to_owned() => left(&["VBZ", "VBD", "VBP", "VB", "MD", "VP", "SQ"]),
        "UCP".to_owned() => right(&[]),
        "VP".to_owned() => left(&[
            "TO", "VBD", "VBN", "MD", "VBZ", "VB", "VBG", "VBP", "AUX", "AUXG", "VP", "ADJP",
            "NN", "NNS", "NP",
        ]),
        "WHADJP".to_owned() => left(&["CC", "WRB", "JJ", "ADJP"]),
        "WHADVP".to_owned() => right(&["CC", "WRB"]),
        "WHNP".to_owned() => left(&["WDT", "WP", "WP$", "WHADJP", "WHPP", "WHNP"]),
        "WHPP".to_owned() => right(&["IN", "TO", "FW"]),
        "X".to_owned() => right(&[]),
        "NP".to_owned() => noun_phrase_rules(),
        "NML".to_owned() => noun_phrase_rules(),
        "TYPO".to_owned() => left(&[]),
    });
}
