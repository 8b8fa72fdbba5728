pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; zero for an empty sequence.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
    }

    #[test]
    fn mean_averages_every_value() {
        assert_eq!(StatsHelper::mean(&[300.0, 0.0, 330.0]), 210.0);
    }

    #[test]
    fn mean_handles_single_value() {
        assert_eq!(StatsHelper::mean(&[4.0]), 4.0);
    }
}
