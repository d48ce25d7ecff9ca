use crate::breaks::{BreakKind, VirtualText};
use crate::font::FontProvider;
use crate::markup::Segment;
use crate::span::Span;
use crate::style::RichState;
use crate::units::Px;

/// How text that does not fit the area width is split
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Lines only end at hard line breaks
    None,
    /// Lines wrap between words
    #[default]
    Word,
    /// Lines may wrap between any two grapheme clusters
    Grapheme,
}

/// A measured piece of one segment that ends at a break opportunity
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    /// The text to draw
    pub text: Span,
    /// Text consumed by the break but never drawn, such as a line feed.
    /// Always starts where `text` ends.
    pub break_symbol: Span,
    pub state: RichState,
    pub brk: BreakKind,
    /// Width at the size the fragment was measured at
    pub base_width: Px,
    /// Width at the size currently being evaluated
    pub scaled_width: Px,
}

/// Split `segments` into fragments and measure each one at `size`, appending to `out`
/// (which is cleared first).
///
/// `line_breaks` and `grapheme_breaks` are the break maps of `text`, the stream
/// view of the same segments.
#[allow(clippy::too_many_arguments)]
pub fn tokenize_into<F: FontProvider + ?Sized>(
    source: &str,
    segments: &[Segment],
    text: &VirtualText<'_>,
    line_breaks: &[BreakKind],
    grapheme_breaks: &[bool],
    overflow: Overflow,
    font: &F,
    size: u32,
    kerning: bool,
    out: &mut Vec<Fragment>,
) {
    out.clear();

    for (index, segment) in segments.iter().enumerate() {
        let stream_start = text.segment_start(index);
        let origin = segment.span.start;
        let body = segment.text(source);
        let state = segment.state;
        let soft_breaks = !state.no_break;

        let mut push = |start: usize, text_end: usize, symbol_end: usize, brk: BreakKind| {
            let text = Span::new(origin + start, origin + text_end);
            let width = font.measure(size, text.as_str(source), kerning);
            out.push(Fragment {
                text,
                break_symbol: Span::new(origin + text_end, origin + symbol_end),
                state,
                brk,
                base_width: width,
                scaled_width: width,
            });
        };

        let mut start = 0usize;
        for (at, ch) in body.char_indices() {
            let end = at + ch.len_utf8();
            let last_byte = stream_start + end - 1;
            let brk = line_breaks.get(last_byte).copied().unwrap_or_default();

            if brk == BreakKind::MustBreak {
                // a CR directly before the LF belongs to the same break
                let symbol_start = if ch == '\n' && at > start && body.as_bytes()[at - 1] == b'\r' {
                    at - 1
                } else {
                    at
                };
                push(start, symbol_start, end, BreakKind::MustBreak);
                start = end;
                continue;
            }

            let soft = soft_breaks
                && match overflow {
                    Overflow::None => false,
                    Overflow::Word => brk == BreakKind::AllowBreak,
                    Overflow::Grapheme => grapheme_breaks.get(last_byte).copied().unwrap_or(false),
                };
            if soft {
                push(start, end, end, BreakKind::AllowBreak);
                start = end;
            }
        }

        if start < body.len() {
            push(start, body.len(), body.len(), BreakKind::NoBreak);
        }
    }
}

/// Set every fragment's scaled width to its base width times `scale`
pub fn rescale(fragments: &mut [Fragment], scale: f32) {
    for fragment in fragments {
        fragment.scaled_width = fragment.base_width * scale;
    }
}
