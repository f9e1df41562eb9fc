use crate::{style::color::Color, MapError, Result};
use serde::{Deserialize, Serialize};

/// Ordered magnitude thresholds and the colour of each bucket between them.
///
/// With thresholds `t0 < t1 < ... < tn-1` there are `n + 1` buckets:
/// `(-inf, t0)`, `[t0, t1)`, ..., `[tn-1, inf)`. A value sitting exactly on a
/// threshold belongs to the higher bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnitudePalette {
    pub thresholds: Vec<f64>,
    pub colors: Vec<Color>,
}

impl Default for MagnitudePalette {
    fn default() -> Self {
        Self {
            thresholds: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            colors: vec![
                Color::rgb(0x9b, 0xf4, 0x42),
                Color::rgb(0xd4, 0xf4, 0x42),
                Color::rgb(0xf9, 0xf1, 0x04),
                Color::rgb(0xf9, 0xcd, 0x04),
                Color::rgb(0xf9, 0x8b, 0x04),
                Color::rgb(0xf9, 0x25, 0x04),
            ],
        }
    }
}

impl MagnitudePalette {
    /// Index of the bucket `magnitude` falls into. NaN lands in the lowest bucket.
    pub fn bucket(&self, magnitude: f64) -> usize {
        self.thresholds
            .iter()
            .take_while(|threshold| magnitude >= **threshold)
            .count()
    }

    /// Colour for a magnitude
    pub fn classify(&self, magnitude: f64) -> Color {
        let bucket = self.bucket(magnitude).min(self.colors.len().saturating_sub(1));
        self.colors.get(bucket).copied().unwrap_or(Color::BLACK)
    }

    /// Number of colour buckets
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.len() != self.thresholds.len() + 1 {
            return Err(MapError::Config(format!(
                "palette needs one more colour than thresholds ({} colours, {} thresholds)",
                self.colors.len(),
                self.thresholds.len()
            )));
        }
        if self.thresholds.iter().any(|t| !t.is_finite()) {
            return Err(MapError::Config("palette thresholds must be finite".into()));
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MapError::Config("palette thresholds must be increasing".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(palette: &MagnitudePalette, magnitude: f64) -> String {
        palette.classify(magnitude).to_hex()
    }

    #[test]
    fn test_half_open_buckets() {
        let palette = MagnitudePalette::default();
        assert_eq!(hex(&palette, -1.2), "#9bf442");
        assert_eq!(hex(&palette, 0.5), "#9bf442");
        assert_eq!(hex(&palette, 0.999), "#9bf442");
        assert_eq!(hex(&palette, 1.5), "#d4f442");
        assert_eq!(hex(&palette, 2.7), "#f9f104");
        assert_eq!(hex(&palette, 3.1), "#f9cd04");
        assert_eq!(hex(&palette, 4.9), "#f98b04");
        assert_eq!(hex(&palette, 6.0), "#f92504");
        assert_eq!(hex(&palette, 9.5), "#f92504");
    }

    #[test]
    fn test_boundaries_belong_to_higher_bucket() {
        let palette = MagnitudePalette::default();
        for (magnitude, expected) in [
            (1.0, "#d4f442"),
            (2.0, "#f9f104"),
            (3.0, "#f9cd04"),
            (4.0, "#f98b04"),
            (5.0, "#f92504"),
        ] {
            assert_eq!(hex(&palette, magnitude), expected, "magnitude {}", magnitude);
        }
    }

    #[test]
    fn test_bucket_is_monotonic() {
        let palette = MagnitudePalette::default();
        let mut previous = 0;
        let mut magnitude = -2.0;
        while magnitude <= 10.0 {
            let bucket = palette.bucket(magnitude);
            assert!(bucket >= previous);
            previous = bucket;
            magnitude += 0.05;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn test_nan_is_lowest_bucket() {
        let palette = MagnitudePalette::default();
        assert_eq!(palette.bucket(f64::NAN), 0);
    }

    #[test]
    fn test_validate() {
        assert!(MagnitudePalette::default().validate().is_ok());

        let mut short = MagnitudePalette::default();
        short.colors.pop();
        assert!(short.validate().is_err());

        let mut unordered = MagnitudePalette::default();
        unordered.thresholds.swap(0, 1);
        assert!(unordered.validate().is_err());
    }
}
