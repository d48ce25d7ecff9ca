use crate::units::Px;

/// Where each line sits between the left and right edges of the area
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the block of lines sits between the top and bottom of the area.
///
/// The last three align to font features rather than the line boxes: the cap
/// line of the first line, or the baseline of the last one.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
    Capline,
    Midline,
    Baseline,
}

impl VerticalAlign {
    /// Whether the block is measured from the first cap line to the last baseline
    pub fn is_typographic(self) -> bool {
        matches!(
            self,
            VerticalAlign::Capline | VerticalAlign::Midline | VerticalAlign::Baseline
        )
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    pub fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Alignment {
        Alignment {
            horizontal,
            vertical,
        }
    }
}

/// Height of a block of lines as seen by `vertical` alignment. Typographic modes
/// drop the leading above the first cap line and the descent below the last baseline.
pub fn typographic_height(
    total_height: Px,
    above_capline: Px,
    below_baseline: Px,
    vertical: VerticalAlign,
) -> Px {
    if vertical.is_typographic() {
        total_height - (above_capline + below_baseline)
    } else {
        total_height
    }
}

/// Offset of a line of `line_width` from the left edge of an area `bound_width` wide
pub fn horizontal_offset(horizontal: HorizontalAlign, bound_width: Px, line_width: Px) -> Px {
    let factor: f32 = match horizontal {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => 0.5,
        HorizontalAlign::Right => 1.0,
    };
    (bound_width - line_width) * factor
}

/// Offset of the first line box from the top of an area `bound_height` tall.
///
/// `above_capline` and `below_baseline` must already be at the size the block was laid out at.
pub fn vertical_offset(
    vertical: VerticalAlign,
    bound_height: Px,
    total_height: Px,
    above_capline: Px,
    below_baseline: Px,
) -> Px {
    let half: f32 = 0.5;
    match vertical {
        VerticalAlign::Top => Px::ZERO,
        VerticalAlign::Middle => (bound_height - total_height) * half,
        VerticalAlign::Bottom => bound_height - total_height,
        VerticalAlign::Capline => Px::ZERO - above_capline,
        VerticalAlign::Midline => {
            let usable =
                typographic_height(total_height, above_capline, below_baseline, vertical);
            Px::ZERO - above_capline + (bound_height - usable) * half
        }
        VerticalAlign::Baseline => below_baseline + (bound_height - total_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_offsets() {
        let area = Px(100.0);
        let line = Px(40.0);
        assert_eq!(horizontal_offset(HorizontalAlign::Left, area, line), Px(0.0));
        assert_eq!(horizontal_offset(HorizontalAlign::Center, area, line), Px(30.0));
        assert_eq!(horizontal_offset(HorizontalAlign::Right, area, line), Px(60.0));
    }

    #[test]
    fn box_vertical_offsets() {
        let (h, total, above, below) = (Px(100.0), Px(40.0), Px(2.0), Px(4.0));
        assert_eq!(vertical_offset(VerticalAlign::Top, h, total, above, below), Px(0.0));
        assert_eq!(vertical_offset(VerticalAlign::Middle, h, total, above, below), Px(30.0));
        assert_eq!(vertical_offset(VerticalAlign::Bottom, h, total, above, below), Px(60.0));
    }

    #[test]
    fn typographic_vertical_offsets() {
        let (h, total, above, below) = (Px(100.0), Px(40.0), Px(2.0), Px(4.0));
        assert_eq!(vertical_offset(VerticalAlign::Capline, h, total, above, below), Px(-2.0));
        // usable height is 34, so (100 - 34) / 2 - 2
        assert_eq!(vertical_offset(VerticalAlign::Midline, h, total, above, below), Px(31.0));
        assert_eq!(vertical_offset(VerticalAlign::Baseline, h, total, above, below), Px(64.0));
    }

    #[test]
    fn only_typographic_modes_trim_height() {
        let (total, above, below) = (Px(40.0), Px(2.0), Px(4.0));
        assert_eq!(typographic_height(total, above, below, VerticalAlign::Middle), total);
        assert_eq!(
            typographic_height(total, above, below, VerticalAlign::Capline),
            Px(34.0)
        );
    }
}
