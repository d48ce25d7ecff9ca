use super::align::{typographic_height, VerticalAlign};
use super::fragment::{rescale, Fragment};
use super::wrap::{group_atoms, remeasure_atoms, wrap_atoms, Atom, WrappedLine};
use crate::font::FontMetrics;
use crate::units::{Area, Px};
use crate::TextError;
use log::trace;

/// An inclusive range of font sizes for auto-sizing. Never empty and never starts at zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SizeRange {
    min: u32,
    max: u32,
}

impl SizeRange {
    pub fn new(min: u32, max: u32) -> Result<SizeRange, TextError> {
        if min == 0 || min > max {
            return Err(TextError::InvalidSizeRange { min, max });
        }
        Ok(SizeRange { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, size: u32) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        SizeRange { min: 18, max: 72 }
    }
}

/// Height of `line_count` lines measured at `base` metrics and drawn `scale` times larger
pub fn block_height(line_count: usize, base: &FontMetrics, scale: f32, vertical: VerticalAlign) -> Px {
    let total = base.line_height() * (line_count as f32 * scale);
    typographic_height(
        total,
        base.above_capline() * scale,
        base.below_baseline() * scale,
        vertical,
    )
}

/// Whether lines with a block height of `height` fit inside `area`
pub fn fits(lines: &[WrappedLine], height: Px, area: Area) -> bool {
    height <= area.height && lines.iter().all(|line| line.width <= area.width)
}

/// Wrap `fragments` (measured at `base.size`) as if set at `size` and test the result against `area`.
///
/// The wrapped lines are left in `out` whether or not they fit.
pub fn probe_size(
    fragments: &mut [Fragment],
    atoms: &mut [Atom],
    base: &FontMetrics,
    size: u32,
    area: Area,
    vertical: VerticalAlign,
    out: &mut Vec<WrappedLine>,
) -> bool {
    let scale = size as f32 / base.size as f32;
    rescale(fragments, scale);
    remeasure_atoms(fragments, atoms);
    wrap_atoms(fragments, atoms, area.width, out);

    let height = block_height(out.len(), base, scale, vertical);
    let ok = fits(out, height, area);
    trace!(
        "probe size {size}: {} lines, {height} tall, {}",
        out.len(),
        if ok { "fits" } else { "overflows" }
    );
    ok
}

/// Find the largest size in `range` whose layout fits `area`, by binary search.
///
/// `fragments` must have been measured at `range.min()` and `base` must be the
/// metrics at that size. The best layout ends up in `best`; if no size above
/// the minimum fits, that is the wrap at the minimum, whether it fits or not.
/// `candidate` is scratch space for rejected probes.
///
/// The search assumes that once a size overflows every larger size does too.
/// Greedy wrapping makes that hold for ordinary text.
#[allow(clippy::too_many_arguments)]
pub fn auto_fit(
    fragments: &mut [Fragment],
    atoms: &mut Vec<Atom>,
    base: &FontMetrics,
    range: SizeRange,
    area: Area,
    vertical: VerticalAlign,
    candidate: &mut Vec<WrappedLine>,
    best: &mut Vec<WrappedLine>,
) -> u32 {
    rescale(fragments, 1.0);
    group_atoms(fragments, atoms);
    wrap_atoms(fragments, atoms, area.width, best);
    let mut best_size = range.min();

    let (mut lo, mut hi) = (range.min().saturating_add(1), range.max());
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        if probe_size(fragments, atoms, base, mid, area, vertical, candidate) {
            best_size = mid;
            std::mem::swap(best, candidate);
            let Some(next) = mid.checked_add(1) else {
                break;
            };
            lo = next;
        } else {
            hi = mid - 1;
        }
    }

    // leave widths at the chosen size rather than the last one tried
    rescale(fragments, best_size as f32 / base.size as f32);
    remeasure_atoms(fragments, atoms);
    best_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaks::BreakKind;
    use crate::font::{FixedAdvanceFont, FontProvider};
    use crate::span::Span;
    use crate::style::RichState;

    /// `count` words of `len` chars each, separated by spaces, measured at size 16
    /// where every char is 8px wide
    fn words(count: usize, len: usize) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut at = 0;
        for i in 0..count {
            let last = i + 1 == count;
            let chars = if last { len } else { len + 1 };
            let width = Px(8.0 * chars as f32);
            out.push(Fragment {
                text: Span::new(at, at + chars),
                break_symbol: Span::empty_at(at + chars),
                state: RichState::default(),
                brk: if last {
                    BreakKind::NoBreak
                } else {
                    BreakKind::AllowBreak
                },
                base_width: width,
                scaled_width: width,
            });
            at += chars;
        }
        out
    }

    fn base() -> FontMetrics {
        FixedAdvanceFont::default().metrics(16).unwrap_or_default()
    }

    #[test]
    fn size_ranges_reject_empty_and_zero() {
        assert!(SizeRange::new(0, 10).is_err());
        assert!(matches!(
            SizeRange::new(20, 10),
            Err(TextError::InvalidSizeRange { min: 20, max: 10 })
        ));
        let range = SizeRange::new(16, 16).unwrap();
        assert!(range.contains(16));
        assert!(!range.contains(17));
    }

    #[test]
    fn block_height_scales_and_trims() {
        let base = base();
        assert_eq!(block_height(3, &base, 2.0, VerticalAlign::Top), Px(96.0));
        // 2px above the cap line and 4px below the baseline at 16px, doubled
        assert_eq!(block_height(3, &base, 2.0, VerticalAlign::Capline), Px(84.0));
    }

    #[test]
    fn picks_the_largest_size_that_fits_one_line() {
        // "abcd" is 4 chars, 0.5em each: it fits 100px up to size 50
        let mut frags = words(1, 4);
        let (mut atoms, mut candidate, mut best) = (Vec::new(), Vec::new(), Vec::new());
        let range = SizeRange::new(16, 64).unwrap();
        let area = Area::new(Px(100.0), Px(1000.0));
        let size = auto_fit(
            &mut frags, &mut atoms, &base(), range, area, VerticalAlign::Top, &mut candidate,
            &mut best,
        );
        assert_eq!(size, 50);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].width, Px(100.0));
    }

    #[test]
    fn fragments_end_up_scaled_to_the_chosen_size() {
        // the last size tried is 51, which overflows
        let mut frags = words(1, 4);
        let (mut atoms, mut candidate, mut best) = (Vec::new(), Vec::new(), Vec::new());
        let range = SizeRange::new(16, 64).unwrap();
        let area = Area::new(Px(100.0), Px(1000.0));
        let size = auto_fit(
            &mut frags, &mut atoms, &base(), range, area, VerticalAlign::Top, &mut candidate,
            &mut best,
        );
        assert_eq!(size, 50);
        assert_eq!(frags[0].scaled_width, Px(100.0));
        assert_eq!(frags[0].base_width, Px(32.0));
    }

    #[test]
    fn height_limits_the_size() {
        // both words share a line up to size 22; from 23 they need two lines,
        // which are `size` px each and so stop fitting above 30
        let mut frags = words(2, 4);
        let (mut atoms, mut candidate, mut best) = (Vec::new(), Vec::new(), Vec::new());
        let range = SizeRange::new(16, 64).unwrap();
        let area = Area::new(Px(100.0), Px(60.0));
        let size = auto_fit(
            &mut frags, &mut atoms, &base(), range, area, VerticalAlign::Top, &mut candidate,
            &mut best,
        );
        assert_eq!(size, 30);
        assert_eq!(best.len(), 2);
    }

    #[test]
    fn falls_back_to_the_minimum() {
        let mut frags = words(1, 40);
        let (mut atoms, mut candidate, mut best) = (Vec::new(), Vec::new(), Vec::new());
        let range = SizeRange::new(16, 64).unwrap();
        let area = Area::new(Px(100.0), Px(10.0));
        let size = auto_fit(
            &mut frags, &mut atoms, &base(), range, area, VerticalAlign::Top, &mut candidate,
            &mut best,
        );
        assert_eq!(size, 16);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].width, Px(320.0));
    }

    #[test]
    fn probes_report_overflow() {
        let mut frags = words(1, 4);
        let mut atoms = Vec::new();
        group_atoms(&frags, &mut atoms);
        let mut out = Vec::new();
        let area = Area::new(Px(100.0), Px(1000.0));
        assert!(probe_size(&mut frags, &mut atoms, &base(), 50, area, VerticalAlign::Top, &mut out));
        assert!(!probe_size(&mut frags, &mut atoms, &base(), 51, area, VerticalAlign::Top, &mut out));
    }
}
