//! The layout pipeline: styled segments in, wrapped and aligned lines out.
//!
//! A layout is built in stages, each writing into buffers owned by a
//! [ScratchCache] so that repeated rebuilds reuse their allocations:
//!
//! - [`MarkupParser`](crate::MarkupParser) splits the text into styled segments
//! - a [`BreakOracle`](crate::BreakOracle) classifies line and grapheme boundaries
//!   across all segments at once
//! - [`tokenize_into`] cuts segments into measured [Fragment]s at those boundaries
//! - [`group_atoms`] and [`wrap_atoms`] fill lines greedily
//! - [`auto_fit`] optionally binary searches the largest font size that fits
//! - [`horizontal_offset`] and [`vertical_offset`] place the result in its area
//!
//! # Example
//!
//! ```
//! use text_fit::{FixedAdvanceFont, UnicodeBreaks, Px, Area, TextStyle};
//! use text_fit::layout::{LayoutRequest, ScratchCache, SizeMode, Overflow, Alignment};
//!
//! let font = FixedAdvanceFont::default();
//! let style = TextStyle::default();
//! let request = LayoutRequest {
//!     text: "Hello <u>wide</u> world",
//!     style: &style,
//!     rich: true,
//!     overflow: Overflow::Word,
//!     alignment: Alignment::default(),
//!     area: Area::new(Px(100.0), Px(100.0)),
//!     size: SizeMode::Fixed(16),
//!     kerning: true,
//! };
//!
//! let mut scratch = ScratchCache::new();
//! let layout = scratch
//!     .rebuild(&request, &font, &mut UnicodeBreaks::new())
//!     .expect("font has metrics");
//! assert_eq!(layout.lines.len(), 2);
//! assert_eq!(layout.lines[0].text(request.text, false), "Hello wide ");
//! assert_eq!(layout.lines[1].text(request.text, false), "world");
//! ```

mod align;
mod fit;
mod fragment;
mod wrap;

pub use align::*;
pub use fit::*;
pub use fragment::*;
pub use wrap::*;

use crate::breaks::{BreakKind, BreakMaps, BreakOracle, VirtualText};
use crate::font::{FontMetrics, FontProvider};
use crate::markup::{MarkupParser, Segment};
use crate::style::TextStyle;
use crate::units::{Area, Px};
use crate::TextError;
use log::debug;

/// Which font size a layout is built at
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SizeMode {
    Fixed(u32),
    /// The largest size in the range that fits the area
    Auto(SizeRange),
}

impl SizeMode {
    /// The size fragments are measured at
    pub fn measure_size(&self) -> u32 {
        match self {
            SizeMode::Fixed(size) => *size,
            SizeMode::Auto(range) => range.min(),
        }
    }
}

/// Everything a layout depends on besides the font and break oracle
#[derive(Debug, Copy, Clone)]
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub style: &'a TextStyle,
    pub rich: bool,
    pub overflow: Overflow,
    pub alignment: Alignment,
    pub area: Area,
    pub size: SizeMode,
    pub kerning: bool,
}

/// Wrapped lines and the geometry needed to draw them
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Layout {
    pub lines: Vec<WrappedLine>,
    /// The size the lines were laid out at
    pub font_size: u32,
    pub metrics: FontMetrics,
    pub line_height: Px,
    /// Height of all line boxes together
    pub total_height: Px,
    /// Height the block is fitted and aligned by; smaller than `total_height`
    /// for typographic vertical alignments
    pub fit_height: Px,
    /// Offset of the first line box from the top of the area
    pub offset_y: Px,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Width of the widest line
    pub fn width(&self) -> Px {
        self.lines
            .iter()
            .fold(Px::ZERO, |widest, line| widest.max(line.width))
    }

    /// Whether every line fits the width of `area` and the block fits its height
    pub fn fits(&self, area: Area) -> bool {
        fits(&self.lines, self.fit_height, area)
    }

    /// Top of the line box of line `index`, relative to the top of the area
    pub fn line_top(&self, index: usize) -> Px {
        self.offset_y + self.line_height * (index as f32)
    }
}

/// Buffers reused by every rebuild. Each stage clears its buffer and refills it,
/// keeping the capacity from earlier runs.
#[derive(Debug, Default)]
pub struct ScratchCache {
    parser: MarkupParser,
    segments: Vec<Segment>,
    breaks: BreakMaps,
    fragments: Vec<Fragment>,
    atoms: Vec<Atom>,
    candidate: Vec<WrappedLine>,
    wrapped: Vec<WrappedLine>,
    layout: Layout,
}

impl ScratchCache {
    pub fn new() -> ScratchCache {
        ScratchCache::default()
    }

    /// The layout produced by the last successful rebuild. A failed rebuild
    /// leaves it untouched.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Fragments as measured by the last rebuild
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Run the whole pipeline for `request`, replacing the cached layout.
    ///
    /// Fails with [TextError::FontUnavailable] if `font` has no metrics at the
    /// size being measured or at the size finally chosen.
    pub fn rebuild<F, B>(
        &mut self,
        request: &LayoutRequest<'_>,
        font: &F,
        oracle: &mut B,
    ) -> Result<&Layout, TextError>
    where
        F: FontProvider + ?Sized,
        B: BreakOracle + ?Sized,
    {
        let measure_size = request.size.measure_size();
        let base = font
            .metrics(measure_size)
            .ok_or(TextError::FontUnavailable)?;

        let ScratchCache {
            parser,
            segments,
            breaks,
            fragments,
            atoms,
            candidate,
            wrapped,
            layout,
        } = self;

        parser.parse_into(request.text, request.style, request.rich, segments);

        let BreakMaps {
            offsets,
            line,
            grapheme,
        } = breaks;
        let text = VirtualText::build(request.text, segments, offsets);
        line.clear();
        line.resize(text.len(), BreakKind::NoBreak);
        oracle.line_breaks(&text, line);
        grapheme.clear();
        grapheme.resize(text.len(), false);
        if request.overflow == Overflow::Grapheme {
            oracle.grapheme_breaks(&text, grapheme);
        }

        tokenize_into(
            request.text,
            segments,
            &text,
            line,
            grapheme,
            request.overflow,
            font,
            measure_size,
            request.kerning,
            fragments,
        );

        let area = request.area;
        let alignment = request.alignment;
        let font_size = match request.size {
            SizeMode::Fixed(size) => {
                group_atoms(fragments, atoms);
                wrap_atoms(fragments, atoms, area.width, wrapped);
                size
            }
            SizeMode::Auto(range) => auto_fit(
                fragments,
                atoms,
                &base,
                range,
                area,
                alignment.vertical,
                candidate,
                wrapped,
            ),
        };

        let metrics = if font_size == measure_size {
            base
        } else {
            font.metrics(font_size).ok_or(TextError::FontUnavailable)?
        };
        std::mem::swap(&mut layout.lines, wrapped);

        let above_capline = metrics.above_capline();
        let below_baseline = metrics.below_baseline();
        layout.font_size = font_size;
        layout.metrics = metrics;
        layout.line_height = metrics.line_height();
        layout.total_height = layout.line_height * (layout.lines.len() as f32);
        layout.fit_height = typographic_height(
            layout.total_height,
            above_capline,
            below_baseline,
            alignment.vertical,
        );
        layout.offset_y = vertical_offset(
            alignment.vertical,
            area.height,
            layout.total_height,
            above_capline,
            below_baseline,
        );
        for wrapped in layout.lines.iter_mut() {
            wrapped.offset_x = horizontal_offset(alignment.horizontal, area.width, wrapped.width);
        }

        debug!(
            "laid out {} lines at {}px from {} segments and {} fragments",
            layout.lines.len(),
            font_size,
            segments.len(),
            fragments.len()
        );

        Ok(layout)
    }
}
