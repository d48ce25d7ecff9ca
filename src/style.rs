use crate::colour::{colours, Colour};
use bitflags::bitflags;

bitflags! {
    /// Decorations drawn around glyphs
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u32 {
        const OVERLINE = 1 << 0;
        const UNDERLINE = 1 << 1;
        const STRIKE_THROUGH = 1 << 2;
        const BACKGROUND = 1 << 3;
        const FOREGROUND = 1 << 4;
    }
}

const STYLE_EPSILON: f32 = 1e-4;
const BATCH_EPSILON: f32 = 1e-6;

/// The full set of visual attributes applied to a span of text.
///
/// Markup tags derive a child style by copying their parent's and changing one
/// attribute, so every field here is a plain value.
#[derive(Debug, Copy, Clone)]
pub struct TextStyle {
    /// Multiplies the alpha of every colour when rendered
    pub opacity: f32,
    pub text_colour: Colour,
    pub background_colour: Colour,
    pub foreground_colour: Colour,
    pub overline_colour: Colour,
    pub underline_colour: Colour,
    pub strike_colour: Colour,
    pub outline_colour: Colour,
    pub outline_width: f32,
    pub shadow_offset: (f32, f32),
    pub shadow_colour: Colour,
    pub shadow_softener: f32,
    pub flags: StyleFlags,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            opacity: 1.0,
            text_colour: colours::WHITE,
            background_colour: colours::TRANSPARENT,
            foreground_colour: colours::TRANSPARENT,
            overline_colour: colours::WHITE,
            underline_colour: colours::WHITE,
            strike_colour: colours::WHITE,
            outline_colour: colours::BLACK,
            outline_width: 0.0,
            shadow_offset: (0.0, 0.0),
            shadow_colour: colours::BLACK,
            shadow_softener: 1.0,
            flags: StyleFlags::empty(),
        }
    }
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        let feq = |a: f32, b: f32| (a - b).abs() < STYLE_EPSILON;
        feq(self.opacity, other.opacity)
            && self.text_colour == other.text_colour
            && self.background_colour == other.background_colour
            && self.foreground_colour == other.foreground_colour
            && self.overline_colour == other.overline_colour
            && self.underline_colour == other.underline_colour
            && self.strike_colour == other.strike_colour
            && self.outline_colour == other.outline_colour
            && feq(self.outline_width, other.outline_width)
            && self.shadow_offset == other.shadow_offset
            && self.shadow_colour == other.shadow_colour
            && feq(self.shadow_softener, other.shadow_softener)
            && self.flags == other.flags
    }
}

impl TextStyle {
    /// Whether two styles can share one render buffer. Only outline width,
    /// shadow softener and the faded shadow colour are per-buffer state; every
    /// other attribute is resolved per glyph.
    pub fn can_batch_with(&self, other: &TextStyle) -> bool {
        let feq = |a: f32, b: f32| (a - b).abs() < BATCH_EPSILON;
        feq(self.outline_width, other.outline_width)
            && feq(self.shadow_softener, other.shadow_softener)
            && self.shadow_colour.fade(self.opacity) == other.shadow_colour.fade(other.opacity)
    }

    /// Resolve the style into what a renderer consumes, with opacity folded into every colour
    pub fn render_style(&self) -> RenderStyle {
        let o = self.opacity;
        RenderStyle {
            text_colour: self.text_colour.fade(o),
            background_colour: self.background_colour.fade(o),
            foreground_colour: self.foreground_colour.fade(o),
            overline_colour: self.overline_colour.fade(o),
            underline_colour: self.underline_colour.fade(o),
            strike_colour: self.strike_colour.fade(o),
            outline_width: self.outline_width,
            outline_colour: self.outline_colour.fade(o),
            shadow_offset: self.shadow_offset,
            shadow_colour: self.shadow_colour.fade(o),
            shadow_softener: self.shadow_softener,
            flags: self.flags,
        }
    }
}

/// A [TextStyle] with opacity already applied, ready for a [crate::TextSink]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderStyle {
    pub text_colour: Colour,
    pub background_colour: Colour,
    pub foreground_colour: Colour,
    pub overline_colour: Colour,
    pub underline_colour: Colour,
    pub strike_colour: Colour,
    pub outline_width: f32,
    pub outline_colour: Colour,
    pub shadow_offset: (f32, f32),
    pub shadow_colour: Colour,
    pub shadow_softener: f32,
    pub flags: StyleFlags,
}

/// Everything a markup scope can change: the style plus whether wrapping is
/// suppressed inside it
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RichState {
    pub style: TextStyle,
    pub no_break: bool,
}

impl From<TextStyle> for RichState {
    fn from(style: TextStyle) -> Self {
        RichState {
            style,
            no_break: false,
        }
    }
}
