use std::rc::Rc;
use text_fit::{
    Alignment, Area, FixedAdvanceFont, Font, FontProvider, HorizontalAlign, RecordingSink,
    RichText, SizeRange, TextSettings, VerticalAlign,
};

/// Fit some lorem ipsum into a 40m x 12m box and print the lines.
///
/// Pass the path of a TrueType font to measure with it; otherwise every glyph
/// is half an em wide.
fn main() {
    let font: Rc<dyn FontProvider> = match std::env::args().nth(1) {
        Some(path) => {
            let bytes = std::fs::read(&path).expect("can read font file");
            Rc::new(Font::load(bytes).expect("can load font"))
        }
        None => Rc::new(FixedAdvanceFont::default()),
    };

    let settings = TextSettings::default()
        .with_area(Area::from_meters(40.0, 12.0))
        .with_auto_size(SizeRange::new(8, 96).expect("valid size range"))
        .with_alignment(Alignment::new(
            HorizontalAlign::Center,
            VerticalAlign::Middle,
        ));

    let mut text = RichText::with_settings(settings);
    text.set_font(font);
    text.set_text(&format!(
        "<color=#ffcc00><u>{}</u></color>\n{}\n<alpha=0.5>{}</alpha>",
        lipsum::lipsum(3),
        lipsum::lipsum(24),
        lipsum::lipsum(12)
    ));

    let size = text.render_font_size().expect("font is usable");
    println!("font size: {size}px");
    for line in text.lines(false).expect("font is usable") {
        println!("| {}", line.line);
    }

    let mut sink = RecordingSink::new();
    let buffers = text.submit(&mut sink).expect("font is usable");
    println!(
        "{} runs in {buffers} buffers, render area {:?}",
        sink.runs().len(),
        text.render_area().expect("font is usable")
    );
}
