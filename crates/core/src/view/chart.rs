use crate::domain::analysis::{PricePoint, Timeframe};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Plottable series for one timeframe. Gaps (null prices) are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub timeframe: Timeframe,
    pub points: Vec<(String, f64)>,
}

impl ChartSeries {
    /// `None` when no point has a usable price.
    pub fn from_points(timeframe: Timeframe, raw: &[PricePoint]) -> Option<Self> {
        let points: Vec<(String, f64)> = raw
            .iter()
            .filter_map(|p| match p.price {
                Some(price) if price.is_finite() => Some((p.date.clone(), price)),
                _ => None,
            })
            .collect();

        if points.is_empty() {
            return None;
        }
        Some(Self { timeframe, points })
    }

    pub fn first(&self) -> f64 {
        self.points.first().map(|(_, p)| *p).unwrap_or_default()
    }

    pub fn last(&self) -> f64 {
        self.points.last().map(|(_, p)| *p).unwrap_or_default()
    }

    pub fn min(&self) -> f64 {
        self.points.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.points
            .iter()
            .map(|(_, p)| *p)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Change from the first to the last point, in percent. Zero for a flat or
    /// single-point series.
    pub fn change_percent(&self) -> f64 {
        let first = self.first();
        if self.points.len() < 2 || first == 0.0 {
            return 0.0;
        }
        (self.last() - first) / first * 100.0
    }

    pub fn date_range(&self) -> (&str, &str) {
        let first = self.points.first().map(|(d, _)| d.as_str()).unwrap_or("");
        let last = self.points.last().map(|(d, _)| d.as_str()).unwrap_or("");
        (first, last)
    }

    /// Unicode sparkline at most `width` cells wide. Longer series are bucketed
    /// by averaging; shorter ones get one cell per point.
    pub fn sparkline(&self, width: usize) -> String {
        if width == 0 {
            return String::new();
        }

        let values: Vec<f64> = self.points.iter().map(|(_, p)| *p).collect();
        let buckets = downsample(&values, width);

        let (min, max) = (self.min(), self.max());
        let span = max - min;
        buckets
            .into_iter()
            .map(|v| {
                if span <= f64::EPSILON {
                    return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
                }
                let scaled = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                SPARK_LEVELS[(scaled as usize).min(SPARK_LEVELS.len() - 1)]
            })
            .collect()
    }
}

fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }

    (0..width)
        .map(|bucket| {
            let start = bucket * values.len() / width;
            let end = ((bucket + 1) * values.len() / width).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
