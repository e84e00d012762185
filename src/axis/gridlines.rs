use smallvec::SmallVec;

/// Default ratio between the target value and the lowest accepted gridline total.
pub const DEFAULT_GRIDLINE_TOLERANCE: f64 = 1.2;

const MAX_DIGIT_REDUCTIONS: usize = 16;

/// Finds a round total strictly below `target` and at least `target / tolerance`.
///
/// Starts from the highest power of ten not above `target` and counts whole
/// steps of it while the sum stays below the target; when the sum is still
/// too small the search continues with the next smaller power of ten.
/// Returns `0.0` for non-positive or non-finite targets and for
/// `tolerance <= 1`.
#[must_use]
pub fn nice_gridline_total(target: f64, tolerance: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 || !tolerance.is_finite() || tolerance <= 1.0 {
        return 0.0;
    }

    let bottom = target / tolerance;
    let mut exponent = target.log10().floor() as i32;
    let mut units: u64 = 0;
    let mut total = 0.0;
    for _ in 0..MAX_DIGIT_REDUCTIONS {
        while scaled(units + 1, exponent) < target {
            units += 1;
        }
        total = scaled(units, exponent);
        if total >= bottom {
            return total;
        }
        units *= 10;
        exponent -= 1;
    }
    total
}

/// `units * 10^exponent`, rounded once so that round totals stay exact.
fn scaled(units: u64, exponent: i32) -> f64 {
    let units = units as f64;
    if exponent >= 0 {
        units * 10f64.powi(exponent)
    } else {
        units / 10f64.powi(-exponent)
    }
}

/// Values of `count` evenly spaced gridlines whose top line is the nice total.
///
/// Values are listed bottom-up; the zero baseline is not included.
#[must_use]
pub fn nice_gridline_values(target: f64, count: usize, tolerance: f64) -> SmallVec<[f64; 8]> {
    let total = nice_gridline_total(target, tolerance);
    if total <= 0.0 || count == 0 {
        return SmallVec::new();
    }

    let step = total / count as f64;
    (1..=count).map(|index| step * index as f64).collect()
}
