use derive_more::{Add, AddAssign, Display, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};

/// World units are meters; text is laid out in pixels at this density.
pub const PIXELS_PER_METER: f32 = 10.0;

/// A horizontal or vertical distance in layout pixels
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Sum,
    Display,
    From,
    Into,
)]
#[display("{_0}px")]
pub struct Px(pub f32);

impl Px {
    pub const ZERO: Px = Px(0.0);

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }

    pub fn abs(self) -> Px {
        Px(self.0.abs())
    }
}

/// Width and height of a text area
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Area {
    pub width: Px,
    pub height: Px,
}

impl Area {
    pub fn new(width: Px, height: Px) -> Area {
        Area { width, height }
    }

    /// Build an area from world-space dimensions given in meters
    pub fn from_meters(width: f32, height: f32) -> Area {
        Area {
            width: meters_to_px(width),
            height: meters_to_px(height),
        }
    }
}

pub fn meters_to_px(meters: f32) -> Px {
    Px(meters * PIXELS_PER_METER)
}

pub fn px_to_meters(px: Px) -> f32 {
    px.0 / PIXELS_PER_METER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_stays_in_pixels() {
        let a = Px(10.0) + Px(2.5);
        assert_eq!(a, Px(12.5));
        let half: f32 = 0.5;
        assert_eq!(a * half, Px(6.25));
        let total: Px = [Px(1.0), Px(2.0), Px(3.0)].into_iter().sum();
        assert_eq!(total, Px(6.0));
        assert_eq!(format!("{}", Px(3.0)), "3px");
    }

    #[test]
    fn meters_round_trip() {
        assert_eq!(meters_to_px(20.0), Px(200.0));
        assert_eq!(px_to_meters(Px(100.0)), 10.0);
        assert_eq!(Area::from_meters(2.0, 1.0), Area::new(Px(20.0), Px(10.0)));
    }
}
