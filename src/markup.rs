//! Inline markup: `<key>`, `<key=value>` and `</key>` tags that restyle the
//! text between them.
//!
//! The parser never fails. A `<` without a closing `>`, a `<` that is followed
//! by another `<` before its `>`, an empty `<>`, a closing tag with no matching
//! opener and any tag with an unknown key are all kept as literal text. Tags
//! still open at the end of the input are closed implicitly.

use crate::colour::Colour;
use crate::span::Span;
use crate::style::{RichState, StyleFlags, TextStyle};

/// A run of source text that shares one resolved style
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub span: Span,
    pub state: RichState,
}

impl Segment {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.as_str(source)
    }
}

#[derive(Debug, Copy, Clone)]
struct OpenTag {
    state: RichState,
    /// Name of the tag in the source; empty for the base entry
    key: Span,
}

/// Splits markup into styled [Segment]s, keeping its tag stack between calls so
/// repeated parses do not reallocate
#[derive(Debug, Default)]
pub struct MarkupParser {
    open_tags: Vec<OpenTag>,
}

impl MarkupParser {
    pub fn new() -> MarkupParser {
        MarkupParser::default()
    }

    /// Parse `text`, appending segments to `out` (which is cleared first).
    ///
    /// When `rich` is false the whole text becomes one segment in `base` style.
    pub fn parse_into(&mut self, text: &str, base: &TextStyle, rich: bool, out: &mut Vec<Segment>) {
        out.clear();
        let base_state = RichState::from(*base);

        if !rich {
            out.push(Segment {
                span: Span::new(0, text.len()),
                state: base_state,
            });
            return;
        }

        self.open_tags.clear();
        self.open_tags.push(OpenTag {
            state: base_state,
            key: Span::empty_at(0),
        });

        let bytes = text.as_bytes();
        let len = text.len();
        let mut pos = 0usize;
        let mut text_start = 0usize;

        while pos < len {
            let Some(open) = find_byte(bytes, b'<', pos) else {
                break;
            };

            if open > text_start {
                self.emit(out, Span::new(text_start, open));
            }

            let close = find_byte(bytes, b'>', open + 1);
            let stray = find_byte(bytes, b'<', open + 1);
            let close = match (close, stray) {
                (Some(close), Some(stray)) if stray < close => None,
                (close, _) => close,
            };

            let Some(close) = close else {
                // not a tag: keep the '<' and rescan after it
                self.emit(out, Span::new(open, open + 1));
                pos = open + 1;
                text_start = pos;
                continue;
            };

            let inner = Span::new(open + 1, close);
            let whole = Span::new(open, close + 1);
            pos = close + 1;
            text_start = pos;

            if inner.is_empty() {
                self.emit(out, whole);
                continue;
            }

            let inner_text = inner.as_str(text);
            if let Some(name) = inner_text.strip_prefix('/') {
                if !self.close_tag(text, name) {
                    self.emit(out, whole);
                }
                continue;
            }

            let (key, value) = match inner_text.find('=') {
                Some(eq) => (
                    Span::new(inner.start, inner.start + eq),
                    &inner_text[eq + 1..],
                ),
                None => (inner, ""),
            };

            let mut state = self.current();
            if apply_directive(key.as_str(text), value, &mut state) {
                self.open_tags.push(OpenTag { state, key });
            } else {
                self.emit(out, whole);
            }
        }

        if text_start < len {
            self.emit(out, Span::new(text_start, len));
        }
    }

    fn current(&self) -> RichState {
        self.open_tags
            .last()
            .map(|tag| tag.state)
            .unwrap_or_default()
    }

    /// Pop the innermost open tag called `name`, returning false if there is none
    fn close_tag(&mut self, text: &str, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        // index 0 is the base entry and can never be closed
        match self
            .open_tags
            .iter()
            .skip(1)
            .rposition(|tag| tag.key.as_str(text) == name)
        {
            Some(idx) => {
                self.open_tags.remove(idx + 1);
                true
            }
            None => false,
        }
    }

    fn emit(&self, out: &mut Vec<Segment>, span: Span) {
        let state = self.current();
        if let Some(last) = out.last_mut() {
            if last.span.is_followed_by(&span) && last.state == state {
                last.span.end = span.end;
                return;
            }
        }
        out.push(Segment { span, state });
    }
}

/// Parse `text` into styled segments. See [MarkupParser::parse_into].
pub fn parse_segments(text: &str, base: &TextStyle, rich: bool) -> Vec<Segment> {
    let mut out = Vec::new();
    MarkupParser::new().parse_into(text, base, rich, &mut out);
    out
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| p + from)
}

fn parse_float(value: &str, default: f32) -> f32 {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Apply one opening tag to `state`. Returns false for keys that are not
/// directives, in which case `state` is left untouched.
fn apply_directive(key: &str, value: &str, state: &mut RichState) -> bool {
    let style = &mut state.style;
    match key {
        "color" => style.text_colour = Colour::parse(value),
        "alpha" | "opacity" => {
            style.opacity *= parse_float(value, 1.0).clamp(0.0, 1.0);
        }
        "background-color" | "bgcolor" => {
            style.background_colour = Colour::parse(value);
            style.flags |= StyleFlags::BACKGROUND;
        }
        "foreground-color" | "fgcolor" => {
            style.foreground_colour = Colour::parse(value);
            style.flags |= StyleFlags::FOREGROUND;
        }
        "overline-color" => {
            style.overline_colour = Colour::parse(value);
            style.flags |= StyleFlags::OVERLINE;
        }
        "overline" | "o" => {
            style.overline_colour = style.text_colour;
            style.flags |= StyleFlags::OVERLINE;
        }
        "underline-color" => {
            style.underline_colour = Colour::parse(value);
            style.flags |= StyleFlags::UNDERLINE;
        }
        "underline" | "u" => {
            style.underline_colour = style.text_colour;
            style.flags |= StyleFlags::UNDERLINE;
        }
        "strikethrough-color" | "strike-color" => {
            style.strike_colour = Colour::parse(value);
            style.flags |= StyleFlags::STRIKE_THROUGH;
        }
        "strikethrough" | "s" => {
            style.strike_colour = style.text_colour;
            style.flags |= StyleFlags::STRIKE_THROUGH;
        }
        "outline-width" => style.outline_width = parse_float(value, 0.0),
        "outline-color" => style.outline_colour = Colour::parse(value),
        "shadow-offset" | "drop-shadow-offset" => {
            let mut parts = value
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|p| !p.is_empty());
            if let Some(x) = parts.next() {
                style.shadow_offset.0 = parse_float(x, style.shadow_offset.0);
            }
            if let Some(y) = parts.next() {
                style.shadow_offset.1 = parse_float(y, style.shadow_offset.1);
            }
        }
        "shadow-color" | "drop-shadow-color" => style.shadow_colour = Colour::parse(value),
        "shadow-softener" | "drop-shadow-softener" => {
            style.shadow_softener = parse_float(value, 0.0)
        }
        "nobr" => state.no_break = true,
        "style" => style.flags = parse_style_flags(value),
        _ => return false,
    }
    true
}

fn parse_style_flags(value: &str) -> StyleFlags {
    value
        .split(['|', ','])
        .map(str::trim)
        .fold(StyleFlags::empty(), |flags, name| {
            flags
                | match name {
                    "underline" => StyleFlags::UNDERLINE,
                    "overline" => StyleFlags::OVERLINE,
                    "strikethrough" | "strike" => StyleFlags::STRIKE_THROUGH,
                    "background" => StyleFlags::BACKGROUND,
                    "foreground" => StyleFlags::FOREGROUND,
                    _ => StyleFlags::empty(),
                }
        })
}
