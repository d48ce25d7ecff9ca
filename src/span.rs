use std::ops::Range;

/// A byte range into the source text a layout was built from.
///
/// Spans always start and end on `char` boundaries of that text.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        debug_assert!(start <= end);
        Span { start, end }
    }

    /// An empty span positioned at `at`
    pub fn empty_at(at: usize) -> Span {
        Span { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrow the text this span covers. Returns an empty string if the span
    /// does not belong to `source`.
    pub fn as_str<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range()).unwrap_or_default()
    }

    /// Whether `next` starts exactly where this span ends
    pub fn is_followed_by(&self, next: &Span) -> bool {
        self.end == next.start
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Span::new(r.start, r.end)
    }
}
