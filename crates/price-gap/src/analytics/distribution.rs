use serde::Serialize;

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite, present values.
///
/// Bins span `[min, max]`; the last bin includes its upper edge. When every
/// value is identical the range is widened by 0.5 on each side.
pub fn histogram<I>(values: I, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|value| value.is_finite())
        .collect();

    if bins == 0 || values.is_empty() {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: min + width * index as f64,
            upper: min + width * (index + 1) as f64,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_present_value_once() {
        let bins = histogram([Some(0.0), Some(0.5), Some(1.0), None, Some(0.25)], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), 4);
        assert_eq!(bins[3].count, 1);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 1.0);
    }

    #[test]
    fn constant_values_widen_the_range() {
        let bins = histogram([Some(2.0), Some(2.0)], 2);
        assert_eq!(bins[0].lower, 1.5);
        assert_eq!(bins[1].upper, 2.5);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn empty_input_has_no_bins() {
        assert!(histogram([None, None], DEFAULT_HISTOGRAM_BINS).is_empty());
        assert!(histogram([Some(1.0)], 0).is_empty());
    }
}
