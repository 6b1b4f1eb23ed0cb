use crate::math::curve::curve::{
    Curve,
    CurveIntegration,
    ScanDirection
};
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::math::trapezoid::trapezoid;

/// Relative distance under which a sample counts as sitting on an
/// integration bound, see [`coincides`].
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// `true` when `x` sits on `bound` within [`BOUNDARY_TOLERANCE`], scaled by
/// the magnitude of `bound` once it exceeds 1.
pub fn coincides(x: f64, bound: f64) -> bool {
    (x - bound).abs() <= BOUNDARY_TOLERANCE * bound.abs().max(1.0)
}

// ─────────────────────────────────────────────
// PiecewiseLinear
// ─────────────────────────────────────────────
//
// Samples are held as two parallel vectors sorted by x (stable, so duplicated
// abscissae keep their input order). Between samples the curve is the straight
// segment joining them; outside [min_x, max_x] it is undefined.

#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinear {
    x_data: Vec<f64>,
    y_data: Vec<f64>
}

impl PiecewiseLinear {
    /// Sort `points` by x and store them. `None` for an empty input.
    pub fn new(mut points: Vec<Point2D>) -> Option<PiecewiseLinear> {
        if points.is_empty() {
            return None;
        }

        points.sort_by(|a, b| a.x().total_cmp(&b.x()));

        let x_data = points.iter().map(|p| p.x()).collect();
        let y_data = points.iter().map(|p| p.y()).collect();
        Some(PiecewiseLinear { x_data, y_data })
    }

    pub fn len(&self) -> usize {
        self.x_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_data.is_empty()
    }

    pub fn x_data(&self) -> &[f64] {
        &self.x_data
    }

    pub fn y_data(&self) -> &[f64] {
        &self.y_data
    }

    pub fn min_y(&self) -> f64 {
        self.y_data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_y(&self) -> f64 {
        self.y_data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Samples with `lower <= x <= upper`, in order.
    pub fn points_within(&self, lower: f64, upper: f64) -> impl Iterator<Item = Point2D> + '_ {
        self.x_data
            .iter()
            .zip(self.y_data.iter())
            .filter(move |&(&x, _)| x >= lower && x <= upper)
            .map(|(&x, &y)| Point2D::new(x, y))
    }

    pub fn translate_x(&mut self, dx: f64) {
        self.x_data.iter_mut().for_each(|x| *x += dx);
    }

    pub fn translate_y(&mut self, dy: f64) {
        self.y_data.iter_mut().for_each(|y| *y += dy);
    }

    /// Divide every ordinate by `divisor` in place.
    pub fn scale_y(&mut self, divisor: f64) {
        self.y_data.iter_mut().for_each(|y| *y /= divisor);
    }

    /// Copy with every ordinate divided by `divisor`.
    pub fn scaled_y(&self, divisor: f64) -> PiecewiseLinear {
        PiecewiseLinear {
            x_data: self.x_data.clone(),
            y_data: self.y_data.iter().map(|y| y / divisor).collect()
        }
    }

    /// Index of the sample a scan reaches after `step` moves from its edge.
    fn scan_index(&self, step: usize, direction: ScanDirection) -> usize {
        if direction.is_reversed() {
            self.len() - 1 - step
        } else {
            step
        }
    }

    /// Trapezoid integral over `lower <= upper`, both inside the sampled range.
    fn integral_within(&self, lower: f64, upper: f64) -> f64 {
        let mut points: Vec<Point2D> = Vec::with_capacity(self.len() + 2);

        let tol_lower = BOUNDARY_TOLERANCE * lower.abs().max(1.0);
        let tol_upper = BOUNDARY_TOLERANCE * upper.abs().max(1.0);

        if !self.x_data.iter().any(|&x| coincides(x, lower)) {
            if let Some(y) = self.value(lower) {
                points.push(Point2D::new(lower, y));
            }
        }
        points.extend(self.points_within(lower - tol_lower, upper + tol_upper));
        if !self.x_data.iter().any(|&x| coincides(x, upper)) {
            if let Some(y) = self.value(upper) {
                points.push(Point2D::new(upper, y));
            }
        }

        trapezoid(&points)
    }
}

// ─────────────────────────────────────────────
// Trait impls
// ─────────────────────────────────────────────

impl NonparametricCurve for PiecewiseLinear {
    fn min_x(&self) -> f64 {
        self.x_data[0]
    }

    fn max_x(&self) -> f64 {
        self.x_data[self.len() - 1]
    }
}

impl Curve for PiecewiseLinear {
    fn value(&self, x: f64) -> Option<f64> {
        if !(x >= self.min_x() && x <= self.max_x()) {
            return None;
        }

        // last sample with x_data[i] <= x, so duplicated abscissae resolve to the later sample
        let i = self.x_data.partition_point(|&xi| xi <= x) - 1;
        if i == self.len() - 1 {
            return Some(self.y_data[i]);
        }

        let lhs_pt = Point2D::new(self.x_data[i], self.y_data[i]);
        let rhs_pt = Point2D::new(self.x_data[i + 1], self.y_data[i + 1]);
        Some(Point2D::lerp_at(&lhs_pt, &rhs_pt, x).y())
    }

    fn crossing(&self, level: f64, direction: ScanDirection) -> Option<f64> {
        let step = (0..self.len())
            .find(|&k| self.y_data[self.scan_index(k, direction)] >= level)?;
        let i = self.scan_index(step, direction);

        if self.y_data[i] == level {
            return Some(self.x_data[i]);
        }
        // the edge sample already lies above the level: nothing brackets it
        if step == 0 {
            return None;
        }

        let j = self.scan_index(step - 1, direction);
        let t = (level - self.y_data[j]) / (self.y_data[i] - self.y_data[j]);
        Some(self.x_data[j] + t * (self.x_data[i] - self.x_data[j]))
    }
}

impl CurveIntegration for PiecewiseLinear {
    /// Trapezoid integral clipped to the sampled range. A bound that no
    /// sample sits on is closed with an interpolated sample at the bound.
    fn integral(&self, a: f64, b: f64) -> f64 {
        if a > b {
            return -self.integral(b, a);
        }

        let lower = a.max(self.min_x());
        let upper = b.min(self.max_x());
        if !(lower < upper) {
            return 0.0;
        }

        self.integral_within(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn curve(pairs: &[[f64; 2]]) -> PiecewiseLinear {
        PiecewiseLinear::new(pairs.iter().map(|&p| Point2D::from(p)).collect()).unwrap()
    }

    fn trapezium() -> PiecewiseLinear {
        curve(&[[-2.25, 0.0], [-0.25, 1.25], [0.75, 1.25], [1.75, 0.0]])
    }

    #[test]
    fn test_new_sorts_by_x() {
        let c = curve(&[[10.0, 20.0], [0.0, 1.0], [5.0, 3.0]]);
        assert_eq!(c.x_data(), &[0.0, 5.0, 10.0]);
        assert_eq!(c.y_data(), &[1.0, 3.0, 20.0]);
        assert!(PiecewiseLinear::new(Vec::new()).is_none());
    }

    #[test]
    fn test_new_keeps_duplicate_order() {
        let c = curve(&[[1.0, 5.0], [0.0, 0.0], [1.0, 7.0]]);
        assert_eq!(c.x_data(), &[0.0, 1.0, 1.0]);
        assert_eq!(c.y_data(), &[0.0, 5.0, 7.0]);
        // later duplicate wins
        assert_eq!(c.value(1.0), Some(7.0));
    }

    #[test]
    fn test_value_interpolates_inside_range() {
        let c = trapezium();
        assert_relative_eq!(c.value(-1.25).unwrap(), 0.625, epsilon = 1e-12);
        assert_relative_eq!(c.value(0.0).unwrap(), 1.25, epsilon = 1e-12);
        assert_eq!(c.value(1.75), Some(0.0));
        assert_eq!(c.value(-2.25), Some(0.0));
        assert!(c.value(1.76).is_none());
        assert!(c.value(f64::NAN).is_none());
    }

    #[test]
    fn test_crossing_from_both_edges() {
        let c = trapezium();
        assert_relative_eq!(c.crossing(0.9, ScanDirection::FromLeft).unwrap(), -0.81, epsilon = 1e-12);
        assert_relative_eq!(c.crossing(0.1, ScanDirection::FromLeft).unwrap(), -2.09, epsilon = 1e-12);
        assert_relative_eq!(c.crossing(0.9, ScanDirection::FromRight).unwrap(), 1.03, epsilon = 1e-12);
        assert_relative_eq!(c.crossing(0.1, ScanDirection::FromRight).unwrap(), 1.67, epsilon = 1e-12);
    }

    #[test]
    fn test_crossing_exact_sample_hit() {
        let c = trapezium();
        assert_eq!(c.crossing(1.25, ScanDirection::FromLeft), Some(-0.25));
        assert_eq!(c.crossing(1.25, ScanDirection::FromRight), Some(0.75));
        assert_eq!(c.crossing(0.0, ScanDirection::FromLeft), Some(-2.25));
    }

    #[test]
    fn test_crossing_missing() {
        let c = trapezium();
        // above the maximum
        assert!(c.crossing(1.3, ScanDirection::FromLeft).is_none());

        // increasing curve: scanning from the right starts above every level
        let rising = curve(&[[0.0, 1.0], [10.0, 20.0], [20.0, 30.0]]);
        assert!(rising.crossing(15.0, ScanDirection::FromRight).is_none());
        assert_relative_eq!(rising.crossing(15.0, ScanDirection::FromLeft).unwrap(), 10.0 * 14.0 / 19.0, epsilon = 1e-12);
        // below the minimum from either side
        assert!(rising.crossing(0.5, ScanDirection::FromLeft).is_none());
        assert!(rising.crossing(f64::NAN, ScanDirection::FromLeft).is_none());
    }

    #[test]
    fn test_width() {
        let c = trapezium();
        assert_relative_eq!(c.width(0.5).unwrap(), 1.35 - (-1.45), epsilon = 1e-12);

        let rising = curve(&[[0.0, 0.0], [10.0, 19.0], [20.0, 29.0]]);
        assert!(rising.width(14.5).is_none());
    }

    #[test]
    fn test_integral_adds_boundary_samples() {
        let c = trapezium();
        assert_relative_eq!(c.integral(f64::NEG_INFINITY, 0.0), 1.5625, epsilon = 1e-12);
        assert_relative_eq!(c.integral(0.0, f64::INFINITY), 1.5625, epsilon = 1e-12);
        assert_relative_eq!(c.integral(-2.25, 1.75), 3.125, epsilon = 1e-12);
    }

    #[test]
    fn test_integral_on_sample_bound_has_no_phantom() {
        let c = curve(&[[-1.0, 2.0], [0.0, 4.0], [1.0, 2.0]]);
        assert_relative_eq!(c.integral(-1.0, 0.0), 3.0, epsilon = 1e-12);
        // a bound a hair away from a sample is treated as the sample itself
        assert_relative_eq!(c.integral(-1.0, 1e-13), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_integral_clipping_and_sign() {
        let c = curve(&[[1.0, 1.0], [3.0, 1.0]]);
        assert_relative_eq!(c.integral(-5.0, 0.0), 0.0);
        assert_relative_eq!(c.integral(0.0, 2.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.integral(2.0, 0.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_translate_and_scale() {
        let mut c = curve(&[[0.0, 2.0], [1.0, 4.0]]);
        c.translate_x(-0.5);
        c.translate_y(-2.0);
        assert_eq!(c.x_data(), &[-0.5, 0.5]);
        assert_eq!(c.y_data(), &[0.0, 2.0]);

        let scaled = c.scaled_y(2.0);
        assert_eq!(scaled.y_data(), &[0.0, 1.0]);
        assert_eq!(c.y_data(), &[0.0, 2.0]);

        c.scale_y(4.0);
        assert_eq!(c.y_data(), &[0.0, 0.5]);
    }
}
