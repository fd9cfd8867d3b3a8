//! Head finding and dependency conversion for constituency trees.
//!
//! Bracketed trees are read into a [`ParseTree`](tree::ParseTree). A
//! [`HeadFinder`](head::HeadFinder) determines the head child of every
//! constituent, which the
//! [`DependencyExtractor`](dependency::DependencyExtractor) uses to
//! convert the tree to unlabeled dependencies.

pub mod config;

pub mod conll;

pub mod dependency;

pub mod error;

pub mod head;

pub mod tree;
