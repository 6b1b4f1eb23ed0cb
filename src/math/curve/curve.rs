/// Edge from which a level-crossing scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    FromLeft,
    FromRight
}

impl ScanDirection {
    pub fn is_reversed(&self) -> bool {
        *self == ScanDirection::FromRight
    }
}

pub trait Curve {
    /// Interpolated value at `x`, `None` outside the sampled range.
    fn value(&self, x: f64) -> Option<f64>;

    /// Position where the curve, read from the chosen edge, first reaches `level`.
    fn crossing(&self, level: f64, direction: ScanDirection) -> Option<f64>;

    /// Distance between the right-scan and left-scan crossings at `level`.
    fn width(&self, level: f64) -> Option<f64> {
        let right = self.crossing(level, ScanDirection::FromRight)?;
        let left = self.crossing(level, ScanDirection::FromLeft)?;
        Some(right - left)
    }
}

pub trait CurveIntegration {
    /// Definite integral over `[a, b]`; `a > b` flips the sign.
    fn integral(&self, a: f64, b: f64) -> f64;
}
