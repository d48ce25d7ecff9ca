use crate::{units::Px, TextError};
use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::cell::RefCell;
use std::rc::Rc;

/// Vertical metrics of a font at one concrete pixel size
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FontMetrics {
    /// The pixel size these metrics were computed for
    pub size: u32,
    /// Distance from the baseline to the top of the font (usually positive)
    pub ascender: Px,
    /// Distance from the baseline to the bottom of the font (usually negative)
    pub descender: Px,
    /// Extra space between one line's descent and the next line's ascent
    pub line_gap: Px,
    /// Height of flat capital letters above the baseline
    pub capline: Px,
}

impl FontMetrics {
    /// How far apart consecutive baselines are
    pub fn line_height(&self) -> Px {
        self.ascender - self.descender + self.line_gap
    }

    /// Leading between the top of the line box and the cap line
    pub fn above_capline(&self) -> Px {
        self.ascender - self.capline
    }

    /// Space reserved below the baseline
    pub fn below_baseline(&self) -> Px {
        Px::ZERO - self.descender
    }

    /// The same metrics linearly scaled by `scale`
    pub fn scaled(&self, scale: f32) -> FontMetrics {
        FontMetrics {
            size: self.size,
            ascender: self.ascender * scale,
            descender: self.descender * scale,
            line_gap: self.line_gap * scale,
            capline: self.capline * scale,
        }
    }
}

/// Something that can measure text for layout.
///
/// Implementations decide what a size means; layout only assumes that widths
/// and metrics grow roughly linearly with it.
pub trait FontProvider {
    /// Metrics at `size` pixels, or `None` if the typeface cannot be used
    fn metrics(&self, size: u32) -> Option<FontMetrics>;

    /// Advance width of `text` set at `size` pixels
    fn measure(&self, size: u32, text: &str, kerning: bool) -> Px;

    /// Changes whenever the underlying typeface is replaced, so cached layouts
    /// know to rebuild
    fn version(&self) -> u64 {
        0
    }
}

impl<T: FontProvider + ?Sized> FontProvider for &T {
    fn metrics(&self, size: u32) -> Option<FontMetrics> {
        (**self).metrics(size)
    }

    fn measure(&self, size: u32, text: &str, kerning: bool) -> Px {
        (**self).measure(size, text, kerning)
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

impl<T: FontProvider + ?Sized> FontProvider for Rc<T> {
    fn metrics(&self, size: u32) -> Option<FontMetrics> {
        (**self).metrics(size)
    }

    fn measure(&self, size: u32, text: &str, kerning: bool) -> Px {
        (**self).measure(size, text, kerning)
    }

    fn version(&self) -> u64 {
        (**self).version()
    }
}

/// A parsed TrueType or OpenType font.
///
/// Fonts are usually owned by a [FontLibrary] and referred to by their id.
pub struct Font {
    pub face: OwnedFace,
    version: u64,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, TextError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face, version: 0 })
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: u32) -> Option<f32> {
        let units_per_em = self.face.as_face_ref().units_per_em();
        if size == 0 || units_per_em == 0 {
            return None;
        }
        Some(size as f32 / units_per_em as f32)
    }

    /// Resolve a glyph for `ch`, falling back to the replacement character and then `?`
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> i16 {
        let Some(kern) = self.face.as_face_ref().tables().kern else {
            return 0;
        };
        kern.subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable)
            .find_map(|st| st.glyphs_kerning(left, right))
            .unwrap_or(0)
    }
}

impl FontProvider for Font {
    fn metrics(&self, size: u32) -> Option<FontMetrics> {
        let scaling = self.scaling(size)?;
        let face = self.face.as_face_ref();
        let ascender = face.ascender() as f32 * scaling;
        Some(FontMetrics {
            size,
            ascender: Px(ascender),
            descender: Px(face.descender() as f32 * scaling),
            line_gap: Px(face.line_gap() as f32 * scaling),
            capline: Px(face
                .capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(ascender)),
        })
    }

    fn measure(&self, size: u32, text: &str, kerning: bool) -> Px {
        let Some(scaling) = self.scaling(size) else {
            return Px::ZERO;
        };
        let face = self.face.as_face_ref();

        let mut units: i32 = 0;
        let mut previous: Option<GlyphId> = None;
        for gid in text.chars().filter_map(|ch| self.glyph_id(ch)) {
            if let (true, Some(prev)) = (kerning, previous) {
                units += self.kerning(prev, gid) as i32;
            }
            units += face.glyph_hor_advance(gid).unwrap_or_default() as i32;
            previous = Some(gid);
        }
        Px(units as f32 * scaling)
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Owns the fonts available to layouts and hands out stable ids for them
#[derive(Default)]
pub struct FontLibrary {
    fonts: Arena<Font>,
}

impl FontLibrary {
    pub fn new() -> FontLibrary {
        FontLibrary::default()
    }

    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Parse and add a font in one step
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<Id<Font>, TextError> {
        Ok(self.add_font(Font::load(bytes)?))
    }

    pub fn get(&self, id: Id<Font>) -> Option<&Font> {
        self.fonts.get(id)
    }

    /// Swap the font behind `id` for a new one. Layouts holding the old font
    /// see a different version and rebuild.
    pub fn replace(&mut self, id: Id<Font>, mut font: Font) -> Result<(), TextError> {
        let slot = self
            .fonts
            .get_mut(id)
            .ok_or(TextError::UnknownFont(id.index()))?;
        font.version = slot.version + 1;
        *slot = font;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.len() == 0
    }

    /// Move the library behind a shared handle so layouts can follow replacements
    pub fn into_shared(self) -> SharedFontLibrary {
        Rc::new(RefCell::new(self))
    }
}

/// A [FontLibrary] shared between whoever manages fonts and the layouts using them
pub type SharedFontLibrary = Rc<RefCell<FontLibrary>>;

/// One font in a [SharedFontLibrary].
///
/// Measures with whatever font currently sits behind its id, so
/// [FontLibrary::replace] reaches every layout holding a handle.
#[derive(Clone)]
pub struct FontHandle {
    library: SharedFontLibrary,
    id: Id<Font>,
}

impl FontHandle {
    pub fn new(library: &SharedFontLibrary, id: Id<Font>) -> FontHandle {
        FontHandle {
            library: Rc::clone(library),
            id,
        }
    }

    pub fn id(&self) -> Id<Font> {
        self.id
    }

    fn with_font<T>(&self, f: impl FnOnce(&Font) -> T) -> Option<T> {
        let library = self.library.try_borrow().ok()?;
        library.get(self.id).map(f)
    }
}

impl FontProvider for FontHandle {
    fn metrics(&self, size: u32) -> Option<FontMetrics> {
        self.with_font(|font| font.metrics(size)).flatten()
    }

    fn measure(&self, size: u32, text: &str, kerning: bool) -> Px {
        self.with_font(|font| font.measure(size, text, kerning))
            .unwrap_or(Px::ZERO)
    }

    fn version(&self) -> u64 {
        self.with_font(|font| font.version()).unwrap_or(0)
    }
}

/// A synthetic font where every character has the same advance.
///
/// All quantities are fractions of the pixel size, so measurements are exact
/// and scale linearly. Handy for headless layout and for tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedAdvanceFont {
    pub advance_em: f32,
    pub ascender_em: f32,
    pub descender_em: f32,
    pub line_gap_em: f32,
    pub capline_em: f32,
    pub version: u64,
}

impl Default for FixedAdvanceFont {
    fn default() -> Self {
        FixedAdvanceFont {
            advance_em: 0.5,
            ascender_em: 0.75,
            descender_em: -0.25,
            line_gap_em: 0.0,
            capline_em: 0.625,
            version: 0,
        }
    }
}

impl FixedAdvanceFont {
    pub fn with_advance(advance_em: f32) -> FixedAdvanceFont {
        FixedAdvanceFont {
            advance_em,
            ..FixedAdvanceFont::default()
        }
    }
}

impl FontProvider for FixedAdvanceFont {
    fn metrics(&self, size: u32) -> Option<FontMetrics> {
        if size == 0 {
            return None;
        }
        let s = size as f32;
        Some(FontMetrics {
            size,
            ascender: Px(self.ascender_em * s),
            descender: Px(self.descender_em * s),
            line_gap: Px(self.line_gap_em * s),
            capline: Px(self.capline_em * s),
        })
    }

    fn measure(&self, size: u32, text: &str, _kerning: bool) -> Px {
        Px(text.chars().count() as f32 * self.advance_em * size as f32)
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIF: &[u8] = include_bytes!("../tests/fonts/DejaVuSerif.ttf");

    fn serif() -> Font {
        Font::load(SERIF.to_vec()).expect("fixture parses")
    }

    #[test]
    fn loads_names() {
        let font = serif();
        assert_eq!(font.family().as_deref(), Some("DejaVu Serif"));
        assert!(font.name().is_some());
    }

    #[test]
    fn ttf_metrics_scale_from_font_units() {
        // 2048 units per em, so at 2048px one unit is one pixel
        let font = serif();
        let metrics = font.metrics(2048).unwrap();
        assert_eq!(metrics.ascender, Px(1901.0));
        assert_eq!(metrics.descender, Px(-483.0));
        assert_eq!(metrics.line_gap, Px::ZERO);
        // no cap height in this font's OS/2 table
        assert_eq!(metrics.capline, metrics.ascender);
        assert_eq!(font.metrics(1024).unwrap().line_height(), Px(1192.0));
        assert!(font.metrics(0).is_none());
    }

    #[test]
    fn ttf_measurement_applies_kerning() {
        let font = serif();
        assert_eq!(font.measure(2048, "A", true), Px(1479.0));
        assert_eq!(font.measure(2048, "AV", false), Px(2958.0));
        assert_eq!(font.measure(2048, "AV", true), Px(2856.0));
        assert_eq!(font.measure(1024, "AV", true), Px(1428.0));
        assert_eq!(font.measure(0, "AV", true), Px::ZERO);
    }

    #[test]
    fn missing_glyphs_measure_as_the_replacement_character() {
        let font = serif();
        assert_eq!(font.glyph_id('日'), font.glyph_id('\u{FFFD}'));
        assert_eq!(font.measure(2048, "日", true), Px(2100.0));
    }

    #[test]
    fn replacing_a_font_bumps_its_version() {
        let mut library = FontLibrary::new();
        let id = library.add_font(serif());
        assert_eq!(library.get(id).map(|f| f.version()), Some(0));
        library.replace(id, serif()).unwrap();
        library.replace(id, serif()).unwrap();
        assert_eq!(library.get(id).map(|f| f.version()), Some(2));

        let foreign = Arena::<Font>::new().alloc(serif());
        assert!(matches!(
            library.replace(foreign, serif()),
            Err(TextError::UnknownFont(0))
        ));
    }

    #[test]
    fn handles_follow_the_font_in_the_library() {
        let mut library = FontLibrary::new();
        let id = library.add_font(serif());
        let library = library.into_shared();
        let handle = FontHandle::new(&library, id);
        assert_eq!(handle.measure(2048, "AV", true), Px(2856.0));
        assert_eq!(handle.version(), 0);

        library.borrow_mut().replace(id, serif()).unwrap();
        assert_eq!(handle.version(), 1);
        assert_eq!(handle.id(), id);
    }

    #[test]
    fn garbage_bytes_do_not_parse() {
        assert!(matches!(
            Font::load(vec![0u8; 16]),
            Err(TextError::FaceParsing(_))
        ));
        let mut library = FontLibrary::new();
        assert!(library.load(Vec::new()).is_err());
        assert!(library.is_empty());
    }

    #[test]
    fn foreign_ids_do_not_resolve() {
        let foreign = Arena::<Font>::new().next_id();
        let library = FontLibrary::new();
        assert!(library.get(foreign).is_none());
    }

    #[test]
    fn fixed_advance_measures_exactly() {
        let font = FixedAdvanceFont::default();
        assert_eq!(font.measure(16, "abcd", true), Px(32.0));
        assert_eq!(font.measure(16, "", true), Px::ZERO);
        assert_eq!(font.measure(10, "é", true), Px(5.0));
        assert!(font.metrics(0).is_none());
    }

    #[test]
    fn metrics_derive_line_geometry() {
        let metrics = FixedAdvanceFont::default().metrics(16).unwrap();
        assert_eq!(metrics.line_height(), Px(16.0));
        assert_eq!(metrics.above_capline(), Px(2.0));
        assert_eq!(metrics.below_baseline(), Px(4.0));
        assert_eq!(metrics.scaled(2.0).line_height(), Px(32.0));
    }

    #[test]
    fn providers_work_through_references() {
        fn width_of(p: impl FontProvider) -> Px {
            p.measure(8, "ab", false)
        }
        let font = FixedAdvanceFont::default();
        assert_eq!(width_of(&font), Px(8.0));
        assert_eq!(width_of(Rc::new(font)), Px(8.0));
    }
}
