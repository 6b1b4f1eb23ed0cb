#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn slope(lhs_pt: &Point2D, rhs_pt: &Point2D) -> f64 {
        (rhs_pt.y - lhs_pt.y) / (rhs_pt.x - lhs_pt.x)
    }

    /// Point on the segment `lhs_pt`-`rhs_pt` at abscissa `x`.
    pub fn lerp_at(lhs_pt: &Point2D, rhs_pt: &Point2D, x: f64) -> Point2D {
        let y = lhs_pt.y + Point2D::slope(lhs_pt, rhs_pt) * (x - lhs_pt.x);
        Point2D::new(x, y)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(pair: [f64; 2]) -> Self {
        Point2D::new(pair[0], pair[1])
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(pair: (f64, f64)) -> Self {
        Point2D::new(pair.0, pair.1)
    }
}

pub trait NonparametricCurve {
    fn min_x(&self) -> f64;

    fn max_x(&self) -> f64;
}
