use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TextError {
    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error("no usable font is available for layout")]
    /// The assigned font is missing or cannot provide metrics at the requested size,
    /// so nothing can be laid out or rendered
    FontUnavailable,

    #[error("invalid font size range {min}..={max}")]
    /// An auto-size range was empty or started at zero
    InvalidSizeRange { min: u32, max: u32 },

    #[error("no font with index {0} in the library")]
    /// A font id did not resolve within a [crate::FontLibrary]
    UnknownFont(usize),
}
