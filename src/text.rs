use crate::breaks::{BreakOracle, UnicodeBreaks};
use crate::font::FontProvider;
use crate::layout::{
    Alignment, Layout, LayoutRequest, Overflow, ScratchCache, SizeMode, SizeRange,
};
use crate::sink::{Pen, SinkRun, TextSink};
use crate::style::TextStyle;
use crate::units::Area;
use crate::TextError;
use log::{debug, warn};

/// Everything about a [RichText] besides its text and font
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextSettings {
    /// Size used when auto-sizing is off
    pub font_size: u32,
    pub auto_size: bool,
    pub auto_size_range: SizeRange,
    pub area: Area,
    pub alignment: Alignment,
    pub overflow: Overflow,
    /// Whether markup tags are interpreted
    pub rich: bool,
    pub kerning: bool,
    /// Style of text outside any tag
    pub style: TextStyle,
}

impl Default for TextSettings {
    fn default() -> Self {
        TextSettings {
            font_size: 36,
            auto_size: false,
            auto_size_range: SizeRange::default(),
            area: Area::from_meters(20.0, 10.0),
            alignment: Alignment::default(),
            overflow: Overflow::Word,
            rich: true,
            kerning: true,
            style: TextStyle::default(),
        }
    }
}

impl TextSettings {
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Turn auto-sizing on within `range`
    pub fn with_auto_size(mut self, range: SizeRange) -> Self {
        self.auto_size = true;
        self.auto_size_range = range;
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = area;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_rich(mut self, rich: bool) -> Self {
        self.rich = rich;
        self
    }

    pub fn with_kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    fn size_mode(&self) -> SizeMode {
        if self.auto_size {
            SizeMode::Auto(self.auto_size_range)
        } else {
            SizeMode::Fixed(self.font_size)
        }
    }
}

/// The text of one laid out line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub line: String,
    /// What ended the line, if requested and there was anything
    pub break_symbol: String,
}

/// A block of marked up text laid out inside an area.
///
/// Changing any input marks the layout dirty; it is rebuilt the next time it is
/// queried. Queries fail with [TextError::FontUnavailable] while there is no
/// font that can provide metrics, and keep retrying until there is.
#[derive(Debug)]
pub struct RichText<F, B = UnicodeBreaks> {
    text: String,
    settings: TextSettings,
    font: Option<F>,
    font_version: u64,
    oracle: B,
    scratch: ScratchCache,
    dirty: bool,
    generation: u64,
    buffers: usize,
}

impl<F: FontProvider> RichText<F> {
    pub fn new() -> RichText<F> {
        RichText::with_oracle(UnicodeBreaks::new())
    }

    pub fn with_settings(settings: TextSettings) -> RichText<F> {
        let mut text = RichText::new();
        text.settings = settings;
        text
    }
}

impl<F: FontProvider> Default for RichText<F> {
    fn default() -> Self {
        RichText::new()
    }
}

macro_rules! setting {
    ($(#[$doc:meta])* $set:ident, $get:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        pub fn $set(&mut self, $field: $ty) {
            if self.settings.$field != $field {
                self.settings.$field = $field;
                self.mark_dirty();
            }
        }

        pub fn $get(&self) -> $ty {
            self.settings.$field
        }
    };
}

impl<F: FontProvider, B: BreakOracle> RichText<F, B> {
    /// A layout that classifies breaks with `oracle`
    pub fn with_oracle(oracle: B) -> RichText<F, B> {
        RichText {
            text: String::new(),
            settings: TextSettings::default(),
            font: None,
            font_version: 0,
            oracle,
            scratch: ScratchCache::new(),
            dirty: true,
            generation: 0,
            buffers: 0,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.mark_dirty();
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Assign the font. Always marks the layout dirty, since fonts cannot be compared.
    pub fn set_font(&mut self, font: F) {
        self.font_version = font.version();
        self.font = Some(font);
        self.mark_dirty();
    }

    pub fn clear_font(&mut self) -> Option<F> {
        self.mark_dirty();
        self.font.take()
    }

    pub fn font(&self) -> Option<&F> {
        self.font.as_ref()
    }

    /// Mutable access to the font. Marks the layout dirty.
    pub fn font_mut(&mut self) -> Option<&mut F> {
        self.mark_dirty();
        self.font.as_mut()
    }

    pub fn set_style(&mut self, style: TextStyle) {
        if self.settings.style != style {
            self.settings.style = style;
            self.mark_dirty();
        }
    }

    pub fn style(&self) -> &TextStyle {
        &self.settings.style
    }

    setting!(
        /// Size used when auto-sizing is off
        set_font_size, font_size, font_size: u32
    );
    setting!(set_auto_size, auto_size, auto_size: bool);
    setting!(set_auto_size_range, auto_size_range, auto_size_range: SizeRange);
    setting!(
        /// Size of the area to lay out in, in pixels
        set_area, area, area: Area
    );
    setting!(set_alignment, alignment, alignment: Alignment);
    setting!(set_overflow, overflow, overflow: Overflow);
    setting!(
        /// Whether markup tags are interpreted or drawn literally
        set_rich, rich, rich: bool
    );
    setting!(set_kerning, kerning, kerning: bool);

    /// Set the area from world-space dimensions in meters
    pub fn set_area_meters(&mut self, width: f32, height: f32) {
        self.set_area(Area::from_meters(width, height));
    }

    pub fn set_settings(&mut self, settings: TextSettings) {
        if self.settings != settings {
            self.settings = settings;
            self.mark_dirty();
        }
    }

    pub fn settings(&self) -> &TextSettings {
        &self.settings
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the next query will rebuild the layout
    pub fn is_dirty(&self) -> bool {
        self.dirty
            || self
                .font
                .as_ref()
                .is_some_and(|font| font.version() != self.font_version)
    }

    /// Counts successful rebuilds
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a font is assigned that has metrics at the size layout measures at
    pub fn can_be_rendered(&self) -> bool {
        let size = self.settings.size_mode().measure_size();
        size > 0
            && self
                .font
                .as_ref()
                .is_some_and(|font| font.metrics(size).is_some())
    }

    /// Rebuild the layout if anything changed since the last rebuild
    pub fn rebuild_if_needed(&mut self) -> Result<(), TextError> {
        if !self.is_dirty() {
            return Ok(());
        }

        let Some(font) = self.font.as_ref() else {
            warn!("no font assigned, skipping text layout");
            return Err(TextError::FontUnavailable);
        };
        let version = font.version();

        let request = LayoutRequest {
            text: &self.text,
            style: &self.settings.style,
            rich: self.settings.rich,
            overflow: self.settings.overflow,
            alignment: self.settings.alignment,
            area: self.settings.area,
            size: self.settings.size_mode(),
            kerning: self.settings.kerning,
        };

        match self.scratch.rebuild(&request, font, &mut self.oracle) {
            Ok(layout) => {
                debug!(
                    "rebuilt text layout: {} lines at {}px",
                    layout.lines.len(),
                    layout.font_size
                );
            }
            Err(err) => {
                warn!("skipping text layout: {err}");
                return Err(err);
            }
        }

        self.font_version = version;
        self.dirty = false;
        self.generation += 1;
        Ok(())
    }

    /// The current layout, rebuilt first if needed
    pub fn layout(&mut self) -> Result<&Layout, TextError> {
        self.rebuild_if_needed()?;
        Ok(self.scratch.layout())
    }

    /// The text of every line, with the symbol that ended it if `include_breaks` is set
    pub fn lines(&mut self, include_breaks: bool) -> Result<Vec<TextLine>, TextError> {
        self.rebuild_if_needed()?;
        let source = self.text.as_str();
        Ok(self
            .scratch
            .layout()
            .lines
            .iter()
            .map(|line| TextLine {
                line: line.text(source, false),
                break_symbol: if include_breaks {
                    line.break_symbol.as_str(source).to_string()
                } else {
                    String::new()
                },
            })
            .collect())
    }

    /// The font size the text is actually laid out at
    pub fn render_font_size(&mut self) -> Result<u32, TextError> {
        Ok(self.layout()?.font_size)
    }

    /// The area the drawn text covers: the configured area, grown to the widest
    /// line and the full block height if the text overflows it
    pub fn render_area(&mut self) -> Result<Area, TextError> {
        let area = self.settings.area;
        let layout = self.layout()?;
        Ok(Area::new(
            area.width.max(layout.width()),
            area.height.max(layout.total_height),
        ))
    }

    /// Send the layout to `sink`, returning how many buffers were created.
    ///
    /// Runs share a buffer as long as their styles can be batched together.
    pub fn submit<S: TextSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize, TextError> {
        self.rebuild_if_needed()?;

        let source = self.text.as_str();
        let kerning = self.settings.kerning;
        let layout = self.scratch.layout();
        let mut current: Option<(S::Buffer, TextStyle)> = None;
        let mut buffers = 0usize;

        for (index, line) in layout.lines.iter().enumerate() {
            let origin = Pen::new(line.offset_x, layout.offset_y);
            let mut pen = Pen::new(line.offset_x, layout.line_top(index));

            for run in line.runs.iter() {
                let style = run.state.style;
                let buffer = match current {
                    Some((buffer, last)) if last.can_batch_with(&style) => buffer,
                    _ => {
                        buffers += 1;
                        sink.create_buffer()
                    }
                };

                sink.apply_style(buffer, &style.render_style());
                sink.append_run(
                    buffer,
                    &SinkRun {
                        text: run.text(source),
                        pen,
                        origin,
                        font_size: layout.font_size,
                        kerning,
                        width: run.width,
                    },
                );
                pen.x += run.width;
                current = Some((buffer, style));
            }
        }

        self.buffers = buffers;
        Ok(buffers)
    }

    /// Buffers created by the last [RichText::submit]
    pub fn buffer_count(&self) -> usize {
        self.buffers
    }
}
