//! Rich text layout for bounded text boxes.
//!
//! Text is marked up with inline tags (`<color=#ff0000>red</color>`,
//! `<u>underlined</u>`, `<nobr>kept together</nobr>`, ...), split at Unicode line
//! and grapheme boundaries, measured with a [FontProvider] and wrapped greedily
//! into an [Area]. With auto-sizing on, the largest font size in a range that
//! still fits the area is chosen.
//!
//! # Example
//!
//! ```
//! use text_fit::{Area, FixedAdvanceFont, Px, RecordingSink, RichText, SizeRange, TextSettings};
//!
//! let settings = TextSettings::default()
//!     .with_area(Area::new(Px(120.0), Px(40.0)))
//!     .with_auto_size(SizeRange::new(8, 32).expect("valid range"));
//!
//! let mut text = RichText::with_settings(settings);
//! text.set_font(FixedAdvanceFont::default());
//! text.set_text("Hello, <color=red>world</color>!");
//!
//! let size = text.render_font_size().expect("font is assigned");
//! assert!(size >= 8 && size <= 32);
//!
//! let mut sink = RecordingSink::new();
//! let buffers = text.submit(&mut sink).expect("font is assigned");
//! assert_eq!(buffers, 1);
//! ```

mod breaks;
pub use breaks::*;

mod colour;
pub use colour::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

/// The stages text goes through to become positioned lines
pub mod layout;
pub use layout::{Alignment, HorizontalAlign, Layout, Overflow, SizeRange, VerticalAlign};

mod markup;
pub use markup::*;

mod sink;
pub use sink::*;

mod span;
pub use span::*;

mod style;
pub use style::*;

mod text;
pub use text::*;

mod units;
pub use units::*;
