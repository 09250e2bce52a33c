/// Summary helpers for per-year samples (cloud cover, temperatures).
pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Share of `values` (0..=1) for which `pred` holds.
    pub fn fraction_where(values: &[f64], pred: impl Fn(f64) -> bool) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let hits = values.iter().filter(|&&v| pred(v)).count();
        Some(hits as f64 / values.len() as f64)
    }

    /// Whole percent in `0..=100`; NaN maps to 0.
    pub fn to_percent(value: f64) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, 100.0) as u8
    }
}
