use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// `ln(1 + e)` of every energy reading.
pub fn log_scaled(energy: ArrayView2<'_, f64>) -> Array2<f64> {
    energy.mapv(f64::ln_1p)
}

/// Total energy of each frame (column).
pub fn frame_totals(energy: ArrayView2<'_, f64>) -> Array1<f64> {
    energy.sum_axis(Axis(0))
}

/// Total energy of each frequency bin (row) across all frames.
pub fn bin_totals(energy: ArrayView2<'_, f64>) -> Array1<f64> {
    energy.sum_axis(Axis(1))
}

/// Replaces exact zeros with `epsilon` so the totals can be used as divisors.
pub fn guard_zero(totals: &Array1<f64>, epsilon: f64) -> Array1<f64> {
    totals.mapv(|total| if total == 0.0 { epsilon } else { total })
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Mean over the finite entries, or 0 when there are none.
pub fn finite_mean(values: ArrayView1<'_, f64>) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Index of the first maximum. A NaN entry wins, as it does for numpy's argmax.
pub fn argmax(values: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            return Some(index);
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
