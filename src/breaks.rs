//! Unicode break analysis over a list of segments without joining them.
//!
//! [VirtualText] addresses the segments as one byte stream through a prefix
//! offset table. A [BreakOracle] walks that stream one code point at a time and
//! fills byte-indexed break maps: entry `i` describes the boundary right after
//! the byte at `i`, and only the last byte of each code point carries a value.

use crate::markup::Segment;
use unicode_linebreak::BreakOpportunity;
use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

/// What may happen at a boundary, or after a fragment
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BreakKind {
    /// The line continues
    #[default]
    NoBreak,
    /// A line may wrap here
    AllowBreak,
    /// A line must end here
    MustBreak,
}

/// Segments viewed as one contiguous stream of bytes
#[derive(Debug, Copy, Clone)]
pub struct VirtualText<'a> {
    source: &'a str,
    segments: &'a [Segment],
    /// `offsets[i]` is where segment `i` starts in the stream; the last entry is the total length
    offsets: &'a [usize],
}

impl<'a> VirtualText<'a> {
    /// Fill `offsets` for `segments` and wrap them. `offsets` is cleared first
    /// and ends up one longer than `segments`.
    pub fn build(source: &'a str, segments: &'a [Segment], offsets: &'a mut Vec<usize>) -> Self {
        offsets.clear();
        offsets.reserve(segments.len() + 1);
        let mut total = 0usize;
        offsets.push(total);
        for segment in segments {
            total += segment.span.len();
            offsets.push(total);
        }
        VirtualText {
            source,
            segments,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.last().copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where segment `index` starts in the stream
    pub fn segment_start(&self, index: usize) -> usize {
        self.offsets[index]
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The text of segment `index`, which starts at [VirtualText::segment_start]
    pub fn segment_text(&self, index: usize) -> &'a str {
        self.segments[index].text(self.source)
    }

    /// Find the segment holding stream byte `pos`, and `pos` relative to it
    pub fn locate(&self, pos: usize) -> Option<(usize, usize)> {
        if pos >= self.len() {
            return None;
        }
        let index = self.offsets.partition_point(|&start| start <= pos) - 1;
        Some((index, pos - self.offsets[index]))
    }

    /// Decode the code point at `pos` and advance `pos` past it.
    /// Returns `None` at the end of the stream.
    pub fn next_char(&self, pos: &mut usize) -> Option<char> {
        let (index, local) = self.locate(*pos)?;
        let text = self.segments[index].text(self.source);
        let ch = text.get(local..)?.chars().next()?;
        *pos += ch.len_utf8();
        Some(ch)
    }

    /// Iterate over every code point in stream order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        let mut pos = 0usize;
        std::iter::from_fn(move || self.next_char(&mut pos))
    }
}

/// Classifies line and grapheme boundaries of a [VirtualText]
pub trait BreakOracle {
    /// Fill `out` (one entry per stream byte) with line break opportunities
    fn line_breaks(&mut self, text: &VirtualText<'_>, out: &mut [BreakKind]);

    /// Fill `out` (one entry per stream byte) with `true` after every extended grapheme cluster
    fn grapheme_breaks(&mut self, text: &VirtualText<'_>, out: &mut [bool]);
}

/// The default oracle: UAX #14 line breaking and UAX #29 grapheme clusters.
///
/// Grapheme clusters are found segment by segment. The line breaker only takes
/// a contiguous string, so for it the stream is decoded into an internal buffer
/// that is kept between calls.
#[derive(Debug, Default)]
pub struct UnicodeBreaks {
    buffer: String,
}

impl UnicodeBreaks {
    pub fn new() -> UnicodeBreaks {
        UnicodeBreaks::default()
    }

    fn fill_buffer(&mut self, text: &VirtualText<'_>) {
        self.buffer.clear();
        self.buffer.reserve(text.len());
        self.buffer.extend(text.chars());
    }
}

fn is_hard_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

impl BreakOracle for UnicodeBreaks {
    fn line_breaks(&mut self, text: &VirtualText<'_>, out: &mut [BreakKind]) {
        out.fill(BreakKind::NoBreak);
        self.fill_buffer(text);

        let len = self.buffer.len();
        let ends_with_hard_break = self.buffer.chars().next_back().is_some_and(is_hard_break);

        for (at, opportunity) in unicode_linebreak::linebreaks(&self.buffer) {
            if at == 0 || at > out.len() {
                continue;
            }
            // the algorithm always reports a mandatory break at end of text
            if at == len && !ends_with_hard_break {
                continue;
            }
            out[at - 1] = match opportunity {
                BreakOpportunity::Mandatory => BreakKind::MustBreak,
                BreakOpportunity::Allowed => BreakKind::AllowBreak,
            };
        }
    }

    fn grapheme_breaks(&mut self, text: &VirtualText<'_>, out: &mut [bool]) {
        out.fill(false);

        let mut cursor = GraphemeCursor::new(0, text.len(), true);
        let mut index = 0usize;
        while index < text.segment_count() {
            let chunk = text.segment_text(index);
            let chunk_start = text.segment_start(index);
            match cursor.next_boundary(chunk, chunk_start) {
                Ok(Some(at)) => {
                    if let Some(slot) = at.checked_sub(1).and_then(|last| out.get_mut(last)) {
                        *slot = true;
                    }
                }
                Ok(None) => break,
                Err(GraphemeIncomplete::NextChunk) => index += 1,
                Err(GraphemeIncomplete::PreContext(end)) => {
                    let Some((before, _)) = end.checked_sub(1).and_then(|last| text.locate(last))
                    else {
                        break;
                    };
                    let start = text.segment_start(before);
                    let context = text.segment_text(before).get(..end - start).unwrap_or_default();
                    cursor.provide_context(context, start);
                }
                Err(_) => break,
            }
        }
    }
}

/// Reusable break maps covering one stream
#[derive(Debug, Default)]
pub struct BreakMaps {
    pub offsets: Vec<usize>,
    pub line: Vec<BreakKind>,
    pub grapheme: Vec<bool>,
}

impl BreakMaps {
    pub fn clear(&mut self) {
        self.offsets.clear();
        self.line.clear();
        self.grapheme.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_segments;
    use crate::style::TextStyle;

    fn line_map(source: &str) -> Vec<BreakKind> {
        let segments = parse_segments(source, &TextStyle::default(), true);
        let mut offsets = Vec::new();
        let text = VirtualText::build(source, &segments, &mut offsets);
        let mut out = vec![BreakKind::NoBreak; text.len()];
        UnicodeBreaks::new().line_breaks(&text, &mut out);
        out
    }

    #[test]
    fn virtual_text_spans_segments() {
        let source = "ab<u>cé</u>d";
        let segments = parse_segments(source, &TextStyle::default(), true);
        let mut offsets = Vec::new();
        let text = VirtualText::build(source, &segments, &mut offsets);

        assert_eq!(text.len(), 6);
        assert_eq!(text.locate(0), Some((0, 0)));
        assert_eq!(text.locate(2), Some((1, 0)));
        assert_eq!(text.locate(5), Some((2, 0)));
        assert_eq!(text.locate(6), None);
        assert_eq!(text.chars().collect::<String>(), "abcéd");

        let mut pos = 3;
        assert_eq!(text.next_char(&mut pos), Some('é'));
        assert_eq!(pos, 5);
    }

    #[test]
    fn spaces_allow_breaks_after_them() {
        use BreakKind::*;
        assert_eq!(
            line_map("ab cd"),
            vec![NoBreak, NoBreak, AllowBreak, NoBreak, NoBreak]
        );
    }

    #[test]
    fn newlines_must_break_but_end_of_text_does_not() {
        let map = line_map("a\nb");
        assert_eq!(map[1], BreakKind::MustBreak);
        assert_eq!(map[2], BreakKind::NoBreak);

        let trailing = line_map("a\n");
        assert_eq!(trailing[1], BreakKind::MustBreak);
    }

    #[test]
    fn breaks_are_found_across_segment_boundaries() {
        // the space and the next word live in different segments
        let map = line_map("one <u>two</u>");
        assert_eq!(map[3], BreakKind::AllowBreak);
    }

    #[test]
    fn crlf_breaks_once_after_the_line_feed() {
        let map = line_map("a\r\nb");
        assert_eq!(map[1], BreakKind::NoBreak);
        assert_eq!(map[2], BreakKind::MustBreak);
    }

    #[test]
    fn grapheme_clusters_keep_combining_marks() {
        let source = "e\u{301}x";
        let segments = parse_segments(source, &TextStyle::default(), false);
        let mut offsets = Vec::new();
        let text = VirtualText::build(source, &segments, &mut offsets);
        let mut out = vec![false; text.len()];
        UnicodeBreaks::new().grapheme_breaks(&text, &mut out);
        // 'e' (1 byte) + U+0301 (2 bytes) form one cluster ending at byte 2
        assert_eq!(out, vec![false, false, true, true]);
    }

    fn grapheme_map(source: &str) -> Vec<bool> {
        let segments = parse_segments(source, &TextStyle::default(), true);
        let mut offsets = Vec::new();
        let text = VirtualText::build(source, &segments, &mut offsets);
        let mut out = vec![false; text.len()];
        UnicodeBreaks::new().grapheme_breaks(&text, &mut out);
        out
    }

    #[test]
    fn grapheme_clusters_continue_across_segments() {
        // the combining mark sits in its own segment but still joins the 'e'
        let map = grapheme_map("ae<u>\u{301}</u>b");
        assert_eq!(map, vec![true, false, false, true, true]);
    }

    #[test]
    fn regional_indicator_pairs_span_segments() {
        // two flags, split so the second pair straddles the tag
        let source = "\u{1F1EB}\u{1F1F7}\u{1F1E9}<s>\u{1F1EA}</s>";
        let map = grapheme_map(source);
        let ends: Vec<usize> = map
            .iter()
            .enumerate()
            .filter(|(_, &end)| end)
            .map(|(at, _)| at)
            .collect();
        assert_eq!(ends, vec![7, 15]);
    }

    #[test]
    fn grapheme_boundaries_match_a_joined_string() {
        use unicode_segmentation::UnicodeSegmentation;
        let source = "x<u>e\u{301}</u>\u{1F469}\u{200D}<s>\u{1F52C}</s> n\u{303}<u></u>o";
        let map = grapheme_map(source);
        let segments = parse_segments(source, &TextStyle::default(), true);
        let joined: String = segments.iter().map(|s| s.text(source)).collect();
        let mut expected = vec![false; joined.len()];
        for (start, grapheme) in joined.grapheme_indices(true) {
            expected[start + grapheme.len() - 1] = true;
        }
        assert_eq!(map, expected);
    }
}
