use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TreeheadError;
use crate::head::{
    CollinsHeadFinder, HeadRule, HeadTable, COORDINATION_TAG, MOD_COLLINS_RULES, PUNCTUATION_TAGS,
};

/// The rule table that a configuration starts from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBase {
    /// The modified Collins head rules.
    ModCollins,

    /// An empty rule table.
    None,
}

impl Default for RuleBase {
    fn default() -> Self {
        RuleBase::ModCollins
    }
}

fn default_coordination_tag() -> String {
    COORDINATION_TAG.to_owned()
}

fn default_punctuation_tags() -> Vec<String> {
    let mut tags: Vec<_> = PUNCTUATION_TAGS.iter().map(|&tag| tag.to_owned()).collect();
    tags.sort();
    tags
}

/// Head finder configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeadFinderConfig {
    /// The rule table to start from.
    #[serde(default)]
    pub base: RuleBase,

    /// Head rules per category.
    ///
    /// The rules of a category replace the rules of that category in the
    /// base table.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<HeadRule>>,

    /// Rule for categories that are not in the table.
    #[serde(default)]
    pub default_rule: Option<HeadRule>,

    /// Tag of coordinating conjunctions.
    #[serde(default = "default_coordination_tag")]
    pub coordination_tag: String,

    /// Punctuation tags that are skipped when the head of a coordination
    /// is moved to the left conjunct.
    #[serde(default = "default_punctuation_tags")]
    pub punctuation_tags: Vec<String>,
}

impl Default for HeadFinderConfig {
    fn default() -> Self {
        HeadFinderConfig {
            base: RuleBase::default(),
            rules: BTreeMap::new(),
            default_rule: None,
            coordination_tag: default_coordination_tag(),
            punctuation_tags: default_punctuation_tags(),
        }
    }
}

impl HeadFinderConfig {
    /// Check that the configuration describes a usable head finder.
    pub fn validate(&self) -> Result<(), TreeheadError> {
        if let Some((category, _)) = self.rules.iter().find(|(_, rules)| rules.is_empty()) {
            return Err(TreeheadError::IllegalConfigurationError(format!(
                "category '{}' does not have any head rules",
                category
            )));
        }

        if self.base == RuleBase::None && self.rules.is_empty() && self.default_rule.is_none() {
            return Err(TreeheadError::IllegalConfigurationError(
                "configuration without a base table must have rules or a default rule".to_owned(),
            ));
        }

        if self.coordination_tag.is_empty() {
            return Err(TreeheadError::IllegalConfigurationError(
                "coordination tag must not be empty".to_owned(),
            ));
        }

        Ok(())
    }

    /// Construct the head rule table.
    pub fn table(&self) -> Arc<HeadTable> {
        if self.base == RuleBase::ModCollins && self.rules.is_empty() {
            return MOD_COLLINS_RULES.clone();
        }

        let mut table = match self.base {
            RuleBase::ModCollins => (**MOD_COLLINS_RULES).clone(),
            RuleBase::None => HeadTable::new(),
        };

        table.extend(
            self.rules
                .iter()
                .map(|(category, rules)| (category.clone(), rules.clone())),
        );

        Arc::new(table)
    }

    /// Construct a head finder from the configuration.
    pub fn head_finder(&self) -> Result<CollinsHeadFinder, TreeheadError> {
        self.validate()?;

        let mut finder = CollinsHeadFinder::new(self.table())
            .with_coordination_tag(self.coordination_tag.clone())
            .with_punctuation_tags(self.punctuation_tags.iter().cloned());

        if let Some(rule) = &self.default_rule {
            finder = finder.with_default_rule(rule.clone());
        }

        Ok(finder)
    }
}

pub trait TomlRead
where
    Self: Sized,
{
    fn from_toml_read(read: impl Read) -> Result<Self, TreeheadError>;
}

impl TomlRead for HeadFinderConfig {
    fn from_toml_read(mut read: impl Read) -> Result<Self, TreeheadError> {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let config: HeadFinderConfig = toml::from_str(&data)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use maplit::btreemap;

    use super::{HeadFinderConfig, RuleBase, TomlRead};
    use crate::error::TreeheadError;
    use crate::head::{Direction, HeadFinder, HeadRule, MOD_COLLINS_RULES};
    use crate::tree::ParseTree;

    #[test]
    fn reads_config() {
        let config =
            HeadFinderConfig::from_toml_read(include_bytes!("../testdata/rules.toml").as_ref())
                .unwrap();

        assert_eq!(
            config,
            HeadFinderConfig {
                base: RuleBase::ModCollins,
                rules: btreemap! {
                    "NP".to_string() => vec![
                        HeadRule::new(Direction::RightDis, &["NN", "NNS", "NNP", "NNPS"]),
                        HeadRule::new(Direction::Left, &["NP"]),
                    ],
                    "DP".to_string() => vec![HeadRule::new(Direction::Left, &["DT"])],
                },
                default_rule: Some(HeadRule::new(Direction::Left, &[] as &[&str])),
                coordination_tag: "CC".to_string(),
                punctuation_tags: vec![
                    "''".to_string(),
                    "``".to_string(),
                    "-LRB-".to_string(),
                    "-RRB-".to_string(),
                    ".".to_string(),
                    ":".to_string(),
                    ",".to_string(),
                    "HYPH".to_string(),
                ],
            }
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = HeadFinderConfig::from_toml_read("".as_bytes()).unwrap();
        assert_eq!(config, HeadFinderConfig::default());
        assert!(Arc::ptr_eq(&config.table(), &*MOD_COLLINS_RULES));
        assert_eq!(config.punctuation_tags.len(), 7);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            HeadFinderConfig::from_toml_read("rulez = 1".as_bytes()),
            Err(TreeheadError::TomlDeserializationError(_))
        ));
    }

    #[test]
    fn rejects_unknown_directions() {
        let toml = "[[rules.NP]]\ndirection = \"up\"\ncategories = [\"NN\"]\n";
        assert!(HeadFinderConfig::from_toml_read(toml.as_bytes()).is_err());
    }

    #[test]
    fn rejects_empty_rule_lists() {
        let config = HeadFinderConfig {
            rules: btreemap! { "NP".to_string() => vec![] },
            ..HeadFinderConfig::default()
        };

        assert!(matches!(
            config.head_finder(),
            Err(TreeheadError::IllegalConfigurationError(_))
        ));
    }

    #[test]
    fn rejects_config_without_rules() {
        let config = HeadFinderConfig {
            base: RuleBase::None,
            rules: BTreeMap::new(),
            ..HeadFinderConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TreeheadError::IllegalConfigurationError(_))
        ));
    }

    #[test]
    fn rules_replace_base_rules() {
        let config =
            HeadFinderConfig::from_toml_read(include_bytes!("../testdata/rules.toml").as_ref())
                .unwrap();
        let table = config.table();

        assert_eq!(table.len(), MOD_COLLINS_RULES.len() + 1);
        assert_eq!(table["NP"].len(), 2);
        assert_eq!(table["VP"], MOD_COLLINS_RULES["VP"]);
        assert_eq!(MOD_COLLINS_RULES["NP"].len(), 5);
    }

    #[test]
    fn configured_head_finder() {
        let config =
            HeadFinderConfig::from_toml_read(include_bytes!("../testdata/rules.toml").as_ref())
                .unwrap();
        let finder = config.head_finder().unwrap();

        let tree: ParseTree = "(DP (DT the) (NN dog))".parse().unwrap();
        let head = finder.determine_head(&tree, tree.root()).unwrap();
        assert_eq!(tree.label(head), "DT");

        // Unknown categories use the default rule.
        let tree: ParseTree = "(FOO (AA a) (BB b))".parse().unwrap();
        let head = finder.determine_head(&tree, tree.root()).unwrap();
        assert_eq!(tree.label(head), "AA");

        // HYPH is punctuation in this configuration.
        let tree: ParseTree = "(ADVP (RB here) (HYPH -) (CC and) (RB there))"
            .parse()
            .unwrap();
        assert_eq!(tree.label(finder.lexical_head(&tree, tree.root())), "here");
    }

    #[test]
    fn config_without_base() {
        let toml = "base = \"none\"\n\n[[rules.X]]\ndirection = \"right\"\n";
        let config = HeadFinderConfig::from_toml_read(toml.as_bytes()).unwrap();
        let finder = config.head_finder().unwrap();

        assert_eq!(finder.table().len(), 1);
        assert_eq!(finder.table()["X"][0].categories, Vec::<String>::new());

        let tree: ParseTree = "(X (AA a) (BB b))".parse().unwrap();
        let head = finder.determine_head(&tree, tree.root()).unwrap();
        assert_eq!(tree.label(head), "BB");

        let tree: ParseTree = "(NP (DT the) (NN dog))".parse().unwrap();
        assert_eq!(finder.determine_head(&tree, tree.root()), None);
    }
}
