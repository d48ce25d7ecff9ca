use super::fragment::Fragment;
use crate::breaks::BreakKind;
use crate::span::Span;
use crate::style::RichState;
use crate::units::Px;
use std::ops::Range;

/// The smallest group of fragments that is never split across lines
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub fragments: Range<usize>,
    pub width: Px,
    pub brk: BreakKind,
}

/// Fragments placed next to each other on a line that can be drawn in one go
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Run {
    pub span: Span,
    pub state: RichState,
    pub width: Px,
}

impl Run {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.as_str(source)
    }
}

/// One line of laid out text
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WrappedLine {
    pub runs: Vec<Run>,
    /// What ended the line. Empty when the line was wrapped or is the last one.
    pub break_symbol: Span,
    pub width: Px,
    /// Horizontal alignment offset from the left edge of the area
    pub offset_x: Px,
}

impl WrappedLine {
    /// The text drawn on this line, optionally followed by the break symbol that ended it
    pub fn text(&self, source: &str, include_break: bool) -> String {
        let mut text: String = self.runs.iter().map(|run| run.text(source)).collect();
        if include_break {
            text.push_str(self.break_symbol.as_str(source));
        }
        text
    }

    /// The range of `source` this line was cut from, including its break symbol
    pub fn source_span(&self) -> Option<Span> {
        let start = self.runs.first()?.span.start;
        let end = if self.break_symbol.is_empty() {
            self.runs.last()?.span.end
        } else {
            self.break_symbol.end
        };
        Some(Span::new(start, end))
    }
}

/// Group fragments into atoms, appending to `out` (which is cleared first).
///
/// An atom closes after the first fragment that allows or forces a break. A
/// trailing atom without one is treated as breakable.
pub fn group_atoms(fragments: &[Fragment], out: &mut Vec<Atom>) {
    out.clear();
    let mut start = 0usize;
    let mut width = Px::ZERO;

    for (i, fragment) in fragments.iter().enumerate() {
        width += fragment.scaled_width;
        if fragment.brk != BreakKind::NoBreak {
            out.push(Atom {
                fragments: start..i + 1,
                width,
                brk: fragment.brk,
            });
            start = i + 1;
            width = Px::ZERO;
        }
    }

    if start < fragments.len() {
        out.push(Atom {
            fragments: start..fragments.len(),
            width,
            brk: BreakKind::AllowBreak,
        });
    }
}

/// Recompute atom widths after the fragments were rescaled
pub fn remeasure_atoms(fragments: &[Fragment], atoms: &mut [Atom]) {
    for atom in atoms {
        atom.width = fragments[atom.fragments.clone()]
            .iter()
            .map(|f| f.scaled_width)
            .sum();
    }
}

fn push_fragment(runs: &mut Vec<Run>, fragment: &Fragment) {
    if fragment.text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.span.is_followed_by(&fragment.text)
            && last.state.style.can_batch_with(&fragment.state.style)
        {
            last.span.end = fragment.text.end;
            last.width += fragment.scaled_width;
            return;
        }
    }
    runs.push(Run {
        span: fragment.text,
        state: fragment.state,
        width: fragment.scaled_width,
    });
}

/// Greedily fill lines no wider than `max_width`, appending to `out` (which is cleared first).
///
/// An atom moves to a new line when it would overflow a line that already has
/// something on it; a lone atom wider than `max_width` stays and overflows.
pub fn wrap_atoms(fragments: &[Fragment], atoms: &[Atom], max_width: Px, out: &mut Vec<WrappedLine>) {
    out.clear();
    let mut line = WrappedLine::default();
    let mut occupied = false;

    for atom in atoms {
        if occupied && line.width + atom.width > max_width {
            out.push(std::mem::take(&mut line));
        }

        let parts = &fragments[atom.fragments.clone()];
        for fragment in parts {
            push_fragment(&mut line.runs, fragment);
        }
        line.width += atom.width;
        occupied = true;

        if atom.brk == BreakKind::MustBreak {
            if let Some(last) = parts.last() {
                line.break_symbol = last.break_symbol;
            }
            out.push(std::mem::take(&mut line));
            occupied = false;
        }
    }

    if occupied {
        out.push(line);
    }
}

/// Group and wrap in one step
pub fn wrap_fragments(
    fragments: &[Fragment],
    max_width: Px,
    atoms: &mut Vec<Atom>,
    out: &mut Vec<WrappedLine>,
) {
    group_atoms(fragments, atoms);
    wrap_atoms(fragments, atoms, max_width, out);
}
