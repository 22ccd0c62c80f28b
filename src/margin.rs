// src/margin.rs - Page margins, stored in centimeters

/// One of the four page sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl std::str::FromStr for MarginSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MarginSide::Left),
            "right" => Ok(MarginSide::Right),
            "top" => Ok(MarginSide::Top),
            "bottom" => Ok(MarginSide::Bottom),
            other => Err(format!("unknown margin side: {}", other)),
        }
    }
}

const MM_PER_CM: f64 = 10.0;

/// Four independent margins. Values arrive in millimeters at the boundary
/// and are stored in centimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left_cm: f64,
    pub right_cm: f64,
    pub top_cm: f64,
    pub bottom_cm: f64,
}

impl Margins {
    pub fn set(&mut self, side: MarginSide, value_mm: f64) {
        let cm = value_mm / MM_PER_CM;
        match side {
            MarginSide::Left => self.left_cm = cm,
            MarginSide::Right => self.right_cm = cm,
            MarginSide::Top => self.top_cm = cm,
            MarginSide::Bottom => self.bottom_cm = cm,
        }
    }

    pub fn get(&self, side: MarginSide) -> f64 {
        match side {
            MarginSide::Left => self.left_cm,
            MarginSide::Right => self.right_cm,
            MarginSide::Top => self.top_cm,
            MarginSide::Bottom => self.bottom_cm,
        }
    }
}
