/// Round `x` to `digits` decimals, ties to even.
///
/// Non-finite values pass through unchanged.
pub fn round(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }

    // 10^digits overflows past 1e308, split the power in two
    let (pow1, pow2) = if digits > 22 {
        (10.0_f64.powi((digits - 22) as i32), 1e22)
    } else {
        (10.0_f64.powi(digits as i32), 1.0)
    };

    let y = (x * pow1) * pow2;
    if !y.is_finite() {
        return x;
    }

    let mut z = y.round();
    if (y - z).abs() == 0.5 {
        z = 2.0 * (y / 2.0).round();
    }

    (z / pow2) / pow1
}
