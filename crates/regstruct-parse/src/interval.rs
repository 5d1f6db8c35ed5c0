//! Positional containment lookup over header intervals.
//!
//! Chapters and sections are flat lists of `[start, end)` intervals in
//! document order. An [`IntervalIndex`] answers "which interval contains this
//! offset" with a documented **first-match** policy: the first interval in
//! document order whose span contains the offset wins, not the innermost or
//! the tightest one. Within a single marker type intervals never overlap, so
//! the policy only matters when callers hand in lists that do.

use std::ops::Range;

use regstruct_core::{Chapter, Section};

/// Anything carrying a half-open text interval.
pub trait Spanned {
    fn span(&self) -> Range<usize>;
}

impl Spanned for Chapter {
    fn span(&self) -> Range<usize> {
        Chapter::span(self)
    }
}

impl Spanned for Section {
    fn span(&self) -> Range<usize> {
        Section::span(self)
    }
}

impl Spanned for Range<usize> {
    fn span(&self) -> Range<usize> {
        self.clone()
    }
}

/// First-match interval index over a borrowed slice.
#[derive(Debug, Clone, Copy)]
pub struct IntervalIndex<'a, T> {
    items: &'a [T],
}

impl<'a, T: Spanned> IntervalIndex<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Index of the first interval containing `offset`, if any.
    pub fn first_containing(&self, offset: usize) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.span().contains(&offset))
    }

    /// The interval itself, under the same policy.
    pub fn get_containing(&self, offset: usize) -> Option<&'a T> {
        self.first_containing(offset).map(|i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
