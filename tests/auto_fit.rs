use text_fit::{
    Alignment, Area, FixedAdvanceFont, HorizontalAlign, Overflow, Px, RichText, SizeRange,
    TextSettings, VerticalAlign,
};

// Sizes are searched from 16 so that every scale factor is an exact binary
// fraction and scaled widths match widths measured at the size directly.
const MIN: u32 = 16;
const MAX: u32 = 64;

fn rich_text(source: &str, area: Area, vertical: VerticalAlign, overflow: Overflow) -> RichText<FixedAdvanceFont> {
    let mut text = RichText::with_settings(
        TextSettings::default()
            .with_area(area)
            .with_overflow(overflow)
            .with_alignment(Alignment::new(HorizontalAlign::Left, vertical))
            .with_auto_size(SizeRange::new(MIN, MAX).unwrap()),
    );
    text.set_font(FixedAdvanceFont::default());
    text.set_text(source);
    text
}

/// Lay out at exactly `size` and report whether the result fits
fn fits_at(text: &mut RichText<FixedAdvanceFont>, size: u32) -> bool {
    let auto = text.auto_size();
    text.set_auto_size(false);
    text.set_font_size(size);
    let area = text.area();
    let fits = text.layout().unwrap().fits(area);
    text.set_auto_size(auto);
    fits
}

fn cases() -> Vec<(String, Area)> {
    let mut cases = Vec::new();
    for words in [1, 5, 20, 80] {
        for (w, h) in [(120.0, 40.0), (300.0, 200.0), (640.0, 90.0), (50.0, 400.0)] {
            cases.push((lipsum::lipsum(words), Area::new(Px(w), Px(h))));
        }
    }
    cases.push((
        format!("{}\n\n{}", lipsum::lipsum(7), lipsum::lipsum(7)),
        Area::new(Px(400.0), Px(300.0)),
    ));
    cases
}

const VERTICALS: [VerticalAlign; 4] = [
    VerticalAlign::Top,
    VerticalAlign::Middle,
    VerticalAlign::Capline,
    VerticalAlign::Baseline,
];

#[test]
fn accepted_sizes_respect_the_bounds() {
    for (source, area) in cases() {
        for vertical in VERTICALS {
            let mut text = rich_text(&source, area, vertical, Overflow::Word);
            let size = text.render_font_size().unwrap();
            assert!((MIN..=MAX).contains(&size));
            if size > MIN {
                let layout = text.layout().unwrap();
                assert!(layout.fits(area), "{size}px overflows {area:?}");
                for line in layout.lines.iter() {
                    assert!(line.width <= area.width);
                }
            }
        }
    }
}

#[test]
fn chosen_size_is_maximal() {
    for (source, area) in cases() {
        for vertical in VERTICALS {
            let mut text = rich_text(&source, area, vertical, Overflow::Word);
            let size = text.render_font_size().unwrap();
            if size > MIN {
                assert!(fits_at(&mut text, size), "{size}px should fit {area:?}");
            }
            if size < MAX {
                assert!(
                    !fits_at(&mut text, size + 1),
                    "{}px also fits {area:?}, {size}px was chosen",
                    size + 1
                );
            }
        }
    }
}

#[test]
fn binary_search_agrees_with_a_linear_scan() {
    // greedy wrapping with fixed advances only ever gains lines as the size
    // grows, so both searches must land on the same size
    for (source, area) in cases() {
        for overflow in [Overflow::Word, Overflow::Grapheme] {
            let mut text = rich_text(&source, area, VerticalAlign::Top, overflow);
            let searched = text.render_font_size().unwrap();

            let scanned = (MIN + 1..=MAX)
                .rev()
                .find(|&size| fits_at(&mut text, size))
                .unwrap_or(MIN);
            assert_eq!(searched, scanned, "{overflow:?} in {area:?}");
        }
    }
}

#[test]
fn nothing_fits_falls_back_to_the_minimum() {
    let area = Area::new(Px(40.0), Px(8.0));
    let mut text = rich_text(&lipsum::lipsum(30), area, VerticalAlign::Top, Overflow::Word);
    assert_eq!(text.render_font_size().unwrap(), MIN);
    let layout = text.layout().unwrap();
    assert!(!layout.fits(area));
    assert!(!layout.lines.is_empty());
}

#[test]
fn changing_the_area_refits() {
    let source = lipsum::lipsum(10);
    let mut text = rich_text(&source, Area::new(Px(200.0), Px(100.0)), VerticalAlign::Top, Overflow::Word);
    let small = text.render_font_size().unwrap();
    text.set_area(Area::new(Px(800.0), Px(400.0)));
    let large = text.render_font_size().unwrap();
    assert!(large >= small);
    assert_eq!(text.generation(), 2);
}
