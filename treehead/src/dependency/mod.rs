//! Conversion of constituency trees to unlabeled dependencies.
//!
//! Heads are percolated bottom-up through the tree. The head word of every
//! non-head child of a constituent becomes a dependent of the head word of
//! the constituent.

use thiserror::Error;
use udgraph::graph::{DepTriple, Sentence};
use udgraph::token::TokenBuilder;

use crate::head::HeadFinder;
use crate::tree::{NodeId, ParseTree};

mod observer;
pub use self::observer::{HeadObserver, LogObserver, MissingHead, MissingHeadCounter};

/// Dependency extraction errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The number of words differs from the number of leaves in the tree.
    #[error("sentence has {words} words, but the tree has {leaves} leaves")]
    WordCountMismatch { words: usize, leaves: usize },

    #[error(transparent)]
    Graph(#[from] udgraph::Error),
}

/// Head of every word of a sentence.
///
/// Words are numbered from 0. A word without a head is attached to the
/// virtual root of the sentence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dependencies {
    heads: Vec<Option<usize>>,
}

impl Dependencies {
    /// The head of each word.
    pub fn heads(&self) -> &[Option<usize>] {
        &self.heads
    }

    /// The head of word `word`.
    ///
    /// The inner value is `None` when the word is attached to the root.
    /// Returns `None` when there is no word `word`.
    pub fn head(&self, word: usize) -> Option<Option<usize>> {
        self.heads.get(word).copied()
    }

    /// The number of words.
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// The words that are attached to the root.
    pub fn root_attached(&self) -> Vec<usize> {
        self.heads
            .iter()
            .enumerate()
            .filter(|(_, head)| head.is_none())
            .map(|(word, _)| word)
            .collect()
    }

    /// Heads in CoNLL numbering.
    ///
    /// Words are numbered from 1, the root is 0.
    pub fn conll_heads(&self) -> Vec<usize> {
        self.heads
            .iter()
            .map(|head| head.map(|head| head + 1).unwrap_or(0))
            .collect()
    }

    /// Construct a dependency graph with unlabeled arcs.
    ///
    /// `tags` are stored as language-specific part-of-speech tags when
    /// provided. Both slices must have one element per word.
    pub fn to_sentence<W, T>(&self, words: &[W], tags: Option<&[T]>) -> Result<Sentence, ExtractError>
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        if words.len() != self.len() {
            return Err(ExtractError::WordCountMismatch {
                words: words.len(),
                leaves: self.len(),
            });
        }

        if let Some(tags) = tags {
            if tags.len() != self.len() {
                return Err(ExtractError::WordCountMismatch {
                    words: tags.len(),
                    leaves: self.len(),
                });
            }
        }

        let mut sentence = Sentence::new();
        for (idx, word) in words.iter().enumerate() {
            let mut builder = TokenBuilder::new(word.as_ref());
            if let Some(tags) = tags {
                builder = builder.xpos(tags[idx].as_ref());
            }
            sentence.push(builder.into());
        }

        for (dependent, head) in self.conll_heads().into_iter().enumerate() {
            sentence
                .dep_graph_mut()
                .add_deprel::<String>(DepTriple::new(head, None, dependent + 1))?;
        }

        Ok(sentence)
    }
}

/// Extraction of dependencies from constituency trees.
pub struct DependencyExtractor<'a, F: ?Sized> {
    head_finder: &'a F,
}

impl<'a, F> DependencyExtractor<'a, F>
where
    F: HeadFinder + ?Sized,
{
    pub fn new(head_finder: &'a F) -> Self {
        DependencyExtractor { head_finder }
    }

    /// Extract the dependencies of a sentence with `num_words` words.
    ///
    /// Nodes without a head are reported through a [`LogObserver`].
    pub fn extract(&self, num_words: usize, tree: &ParseTree) -> Result<Dependencies, ExtractError> {
        self.extract_with(num_words, tree, &mut LogObserver)
    }

    /// Extract the dependencies of a sentence with `num_words` words.
    ///
    /// When the head finder does not find a head for a node, the event is
    /// passed to `observer` and the first child is used as the head.
    pub fn extract_with(
        &self,
        num_words: usize,
        tree: &ParseTree,
        observer: &mut dyn HeadObserver,
    ) -> Result<Dependencies, ExtractError> {
        let n_leaves = tree.n_leaves();
        if num_words != n_leaves {
            return Err(ExtractError::WordCountMismatch {
                words: num_words,
                leaves: n_leaves,
            });
        }

        let spans = tree.spans();
        let mut heads = vec![None; num_words];

        // Index of the head word of every node visited so far.
        let mut subtree_heads = vec![0; tree.len()];

        for node in tree.post_order() {
            let children = tree.children(node);
            if children.is_empty() || tree.is_preterminal(node) {
                subtree_heads[node] = spans[node].start();
                continue;
            }

            let head_child = self.head_child(tree, node, observer);
            let head = subtree_heads[head_child];
            subtree_heads[node] = head;

            for &child in children {
                if child != head_child {
                    heads[subtree_heads[child]] = Some(head);
                }
            }
        }

        Ok(Dependencies { heads })
    }

    fn head_child(&self, tree: &ParseTree, node: NodeId, observer: &mut dyn HeadObserver) -> NodeId {
        match self.head_finder.determine_head(tree, node) {
            Some(head) => head,
            None => {
                observer.missing_head(&MissingHead::new(tree, node));
                tree.children(node)[0]
            }
        }
    }
}
