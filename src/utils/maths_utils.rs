use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// Arithmetic mean. Returns `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Linearly rescale `x` from `[min_x, max_x]` onto `[min_y, max_y]`.
/// A degenerate domain (`min_x == max_x`) maps everything to `min_y`.
pub fn scale(x: f64, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> f64 {
    if min_x == max_x {
        return min_y;
    }
    ((x - min_x) / (max_x - min_x)) * (max_y - min_y) + min_y
}

/// `scale` onto the unit interval.
pub fn scale_unit(x: f64, min_x: f64, max_x: f64) -> f64 {
    scale(x, min_x, max_x, 0.0, 1.0)
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

pub fn get_min_max(vec: &[f64]) -> (f64, f64) {
    let (min_index, max_index) = vec.argminmax();
    (vec[min_index], vec[max_index])
}

/// Min and max of a possibly empty slice.
pub fn min_max_nonempty(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        None
    } else {
        Some(get_min_max(vec))
    }
}
