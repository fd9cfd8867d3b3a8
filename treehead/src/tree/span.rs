use std::cmp;

use super::NodeId;

/// An inclusive span over the leaves of a tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Construct a span covering `start..=end`.
    ///
    /// Panics when `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) is after its end ({})",
            start,
            end
        );

        Span { start, end }
    }

    /// The first leaf index of the span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The last leaf index of the span.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The number of leaves covered by the span.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Check whether the leaf with index `idx` is covered.
    pub fn contains(&self, idx: usize) -> bool {
        self.start <= idx && idx <= self.end
    }

    /// Check whether this span lies completely inside `other`.
    pub fn lies_inside(&self, other: Span) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// Check whether this span shares at least one leaf with `other`.
    pub fn overlaps(&self, other: Span) -> bool {
        cmp::max(self.start, other.start) <= cmp::min(self.end, other.end)
    }

    /// Distance to another span.
    ///
    /// By default this is the sum of the distances between the start
    /// points and between the end points. With `min_dist`, this is the
    /// offset between the end of the earlier span and the start of the
    /// later span, which is 0 for overlapping spans.
    pub fn distance(&self, other: Span, min_dist: bool) -> usize {
        if min_dist {
            let gap_start = cmp::min(self.end, other.end);
            let gap_end = cmp::max(self.start, other.start);
            gap_end.saturating_sub(gap_start)
        } else {
            self.start.abs_diff(other.start) + self.end.abs_diff(other.end)
        }
    }
}

/// A tree node together with its leaf span.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Constituent<'a> {
    node: NodeId,
    span: Span,
    name: &'a str,
}

impl<'a> Constituent<'a> {
    pub(crate) fn new(node: NodeId, span: Span, name: &'a str) -> Self {
        Constituent { node, span, name }
    }

    /// The node that dominates the constituent.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The leaves covered by the constituent.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The label of the dominating node.
    pub fn name(&self) -> &'a str {
        self.name
    }
}
