use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;

/// Composite trapezoidal rule over points ordered by `x`.
///
/// Fewer than two points integrate to zero.
pub fn trapezoid(points: &[Point2D]) -> f64 {
    points
        .windows(2)
        .map(|pair| 0.5 * (pair[0].y() + pair[1].y()) * (pair[1].x() - pair[0].x()))
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_trapezoid_of_line_is_exact() {
        let points: Vec<Point2D> = (0..=4)
            .map(|i| Point2D::new(i as f64, 2.0 * i as f64 + 1.0))
            .collect();
        // ∫_0^4 (2x + 1) dx = 20
        assert_relative_eq!(trapezoid(&points), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoid_uneven_spacing() {
        let points = vec![
            Point2D::new(-1.0, 2.5),
            Point2D::new(-0.25, 4.0),
            Point2D::new(0.75, 4.0),
            Point2D::new(1.0, 3.0),
        ];
        assert_relative_eq!(trapezoid(&points), 7.3125, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoid_degenerate_inputs() {
        assert_eq!(trapezoid(&[]), 0.0);
        assert_eq!(trapezoid(&[Point2D::new(3.0, 7.0)]), 0.0);
    }
}
