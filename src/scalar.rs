//! Scalar Encoding: Continuous values as contiguous runs of bits.
//!
//! A scalar encoder maps a real number onto a block of `w` consecutive
//! active bits inside an output of `n` bits. Nearby values share bits, so
//! overlap between two encodings measures how close the values are.
//!
//! # Key Insight: Linear vs Periodic
//!
//! - **Linear** (non-periodic): the run of bits slides from the left edge
//!   (`min_value`) to the right edge (`max_value`). Out-of-range inputs are
//!   clamped to the edges.
//!   - Use for: flags, proximity scores, bounded quantities
//!
//! - **Periodic**: the run wraps around the end of the output, so the
//!   largest values share bits with the smallest ones. Inputs outside
//!   `[min_value, max_value)` wrap.
//!   - Hour 23 is similar to hour 0
//!   - December 31 is similar to January 1
//!
//! # Resolution
//!
//! `radius` is the input distance covered by one full run of `w` bits, so
//! each bit step stands for `radius / w` input units. Two values closer than
//! that resolution fall into the same bucket and encode identically.

use crate::error::{EncoderError, Result};
use crate::similarity::Similarity;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Construction options for a [`ScalarEncoder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarEncoderConfig {
    /// Number of active bits per encoding. Must be odd.
    pub w: usize,
    /// Smallest representable value
    pub min_value: f64,
    /// Largest representable value (exclusive when periodic)
    pub max_value: f64,
    /// Input distance covered by `w` bits
    pub radius: f64,
    /// Whether the value domain wraps around
    #[serde(default)]
    pub periodic: bool,
    /// Field name reported by decode
    #[serde(default)]
    pub name: Option<String>,
}

impl ScalarEncoderConfig {
    /// Non-periodic configuration without a name.
    pub fn new(w: usize, min_value: f64, max_value: f64, radius: f64) -> Self {
        Self {
            w,
            min_value,
            max_value,
            radius,
            periodic: false,
            name: None,
        }
    }

    /// Set periodicity.
    pub fn periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    /// Set the field name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One decoded field: the value ranges an encoding stands for.
///
/// Several disjoint ranges come back when the bit pattern holds more than
/// one run of active bits, or when a periodic run crosses `max_value`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedField {
    /// Ordered `(low, high)` pairs in input space
    pub ranges: Vec<(f64, f64)>,
    /// Human-readable rendering of `ranges`
    pub description: String,
}

/// A bucket's representative value and its encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketInfo {
    /// Reconstructed scalar
    pub value: f64,
    /// Bit pattern produced by encoding `value`
    pub encoding: Vector,
}

/// Encoder for continuous scalar values.
///
/// All derived quantities, including the bucket table used for top-down
/// reconstruction, are computed at construction. The encoder is read-only
/// afterwards.
#[derive(Clone, Debug)]
pub struct ScalarEncoder {
    name: String,
    w: usize,
    min_value: f64,
    max_value: f64,
    periodic: bool,
    radius: f64,
    resolution: f64,
    /// Width of the value domain in input units (plus one resolution step
    /// when non-periodic)
    range: f64,
    halfwidth: usize,
    /// Bits outside the range on each side (non-periodic only)
    padding: usize,
    /// Total output width
    n: usize,
    /// Output width excluding padding
    n_internal: usize,
    bucket_values: Vec<f64>,
    bucket_encodings: Vec<Vector>,
}

impl ScalarEncoder {
    /// Create a new scalar encoder.
    pub fn new(config: ScalarEncoderConfig) -> Result<Self> {
        let ScalarEncoderConfig {
            w,
            min_value,
            max_value,
            radius,
            periodic,
            name,
        } = config;

        if w % 2 == 0 {
            return Err(EncoderError::Config(format!(
                "width must be an odd number, got {}",
                w
            )));
        }
        if !(min_value < max_value) || !min_value.is_finite() || !max_value.is_finite() {
            return Err(EncoderError::Config(format!(
                "min_value ({}) must be less than max_value ({})",
                min_value, max_value
            )));
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(EncoderError::Config(format!(
                "radius must be positive, got {}",
                radius
            )));
        }

        let resolution = radius / w as f64;
        let halfwidth = (w - 1) / 2;
        let padding = if periodic { 0 } else { halfwidth };
        let range_internal = max_value - min_value;
        let range = if periodic {
            range_internal
        } else {
            range_internal + resolution
        };

        let n = (w as f64 * (range / radius) + 2.0 * padding as f64).ceil() as usize;
        if n <= w {
            return Err(EncoderError::Config(format!(
                "output width ({}) must exceed active bits ({}); lower the radius",
                n, w
            )));
        }
        let n_internal = n - 2 * padding;

        let name = name.unwrap_or_else(|| format!("[{}:{}]", min_value, max_value));

        let mut encoder = Self {
            name,
            w,
            min_value,
            max_value,
            periodic,
            radius,
            resolution,
            range,
            halfwidth,
            padding,
            n,
            n_internal,
            bucket_values: Vec::new(),
            bucket_encodings: Vec::new(),
        };
        encoder.build_bucket_table();

        debug!(
            name = %encoder.name,
            w,
            n,
            resolution,
            periodic,
            buckets = encoder.bucket_values.len(),
            "Built scalar encoder"
        );

        Ok(encoder)
    }

    /// Representative value of every bucket plus its encoding.
    ///
    /// Bucket `i` is the value whose encoding `bucket_index` maps to `i`:
    /// the middle of centre bin `i` when periodic, otherwise the value whose
    /// first active bit is `i`.
    fn build_bucket_table(&mut self) {
        self.bucket_values = if self.periodic {
            let step = self.range / self.n_internal as f64;
            (0..self.n_internal)
                .map(|i| self.min_value + (i as f64 + 0.5) * step)
                .collect()
        } else {
            let last = self.first_on_bit(self.max_value).unwrap_or(0).max(0) as usize;
            (0..=last)
                .map(|i| self.min_value + i as f64 * self.resolution)
                .collect()
        };
        self.bucket_encodings = self
            .bucket_values
            .iter()
            .map(|&v| self.encode(v.clamp(self.min_value, self.max_value)))
            .collect();
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output width `n` in bits.
    pub fn width(&self) -> usize {
        self.n
    }

    /// Active bits per encoding.
    pub fn w(&self) -> usize {
        self.w
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Input units per bit step (`radius / w`).
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Number of buckets in the reconstruction table.
    pub fn bucket_count(&self) -> usize {
        self.bucket_values.len()
    }

    /// Representative value of each bucket, by bucket index.
    pub fn bucket_values(&self) -> &[f64] {
        &self.bucket_values
    }

    /// Map a value into the encoder's domain.
    ///
    /// Periodic encoders wrap into `[min, max)`; linear encoders clamp.
    fn bound(&self, value: f64) -> f64 {
        if self.periodic {
            let span = self.max_value - self.min_value;
            let wrapped = (value - self.min_value).rem_euclid(span) + self.min_value;
            // rem_euclid can round up to exactly `span`
            if wrapped >= self.max_value {
                self.min_value
            } else {
                wrapped
            }
        } else {
            value.clamp(self.min_value, self.max_value)
        }
    }

    /// Index of the first active bit (may be negative when periodic).
    ///
    /// Non-finite values count as missing.
    fn first_on_bit(&self, value: f64) -> Option<isize> {
        if !value.is_finite() {
            return None;
        }
        let value = self.bound(value);

        let centerbin = if self.periodic {
            ((value - self.min_value) * self.n_internal as f64 / self.range) as isize
        } else {
            ((value - self.min_value + self.resolution / 2.0) / self.resolution) as isize
                + self.padding as isize
        };

        Some(centerbin - self.halfwidth as isize)
    }

    /// Bucket index of a value.
    ///
    /// Periodic encoders use the centre bit, linear encoders the first
    /// active bit. `None` for missing (non-finite) values.
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        let minbin = self.first_on_bit(value)?;
        let bucket = if self.periodic {
            (minbin + self.halfwidth as isize).rem_euclid(self.n as isize)
        } else {
            minbin
        };
        Some(bucket as usize)
    }

    /// Write the encoding of `value` into `output`, which must be exactly
    /// `width()` long. Missing values leave every bit cleared.
    pub(crate) fn write_bits(&self, value: f64, output: &mut [u8]) {
        debug_assert_eq!(output.len(), self.n);
        output.fill(0);

        let Some(minbin) = self.first_on_bit(value) else {
            return;
        };

        let n = self.n as isize;
        for bit in minbin..minbin + self.w as isize {
            let idx = if self.periodic { bit.rem_euclid(n) } else { bit };
            if let Some(slot) = output.get_mut(idx as usize) {
                *slot = 1;
            }
        }
    }

    /// Encode a scalar value.
    pub fn encode(&self, value: f64) -> Vector {
        let mut output = Vector::zeros(self.n);
        self.write_bits(value, output.data_mut());
        output
    }

    /// Encode into a caller-provided buffer of exactly `width()` bits.
    pub fn encode_into_array(&self, value: f64, output: &mut [u8]) -> Result<()> {
        self.check_len(output.len())?;
        self.write_bits(value, output);
        Ok(())
    }

    fn check_len(&self, got: usize) -> Result<()> {
        if got != self.n {
            return Err(EncoderError::DimensionMismatch {
                expected: self.n,
                got,
            });
        }
        Ok(())
    }

    /// Decode a bit pattern back into value ranges.
    ///
    /// Returns `None` when no bit is active.
    pub fn decode(&self, encoded: &[u8]) -> Result<Option<DecodedField>> {
        self.check_len(encoded.len())?;

        let mut bits: Vec<u8> = encoded.iter().map(|&b| u8::from(b != 0)).collect();
        if !bits.contains(&1) {
            return Ok(None);
        }

        self.fill_holes(&mut bits);

        let ranges: Vec<(f64, f64)> = self
            .find_runs(&bits)
            .into_iter()
            .flat_map(|(start, len)| self.run_to_ranges(start, len))
            .collect();
        let description = describe_ranges(&ranges);

        trace!(name = %self.name, %description, "Decoded scalar field");

        Ok(Some(DecodedField {
            ranges,
            description,
        }))
    }

    /// Fill gaps of up to `halfwidth` zeros enclosed by ones.
    ///
    /// Learned patterns are often sampled sparsely, leaving holes inside
    /// what was a single run.
    fn fill_holes(&self, bits: &mut [u8]) {
        let n = self.n;
        for gap in 1..=self.halfwidth {
            let sub_len = gap + 2;
            let starts = if self.periodic {
                n
            } else if sub_len <= n {
                n - sub_len + 1
            } else {
                0
            };

            for j in 0..starts {
                let idx = |k: usize| (j + k) % n;
                let matches = bits[idx(0)] == 1
                    && bits[idx(sub_len - 1)] == 1
                    && (1..sub_len - 1).all(|k| bits[idx(k)] == 0);
                if matches {
                    for k in 0..sub_len {
                        bits[idx(k)] = 1;
                    }
                }
            }
        }
    }

    /// Runs of ones as `(start, length)`.
    ///
    /// When periodic, a run touching the right edge absorbs one starting at
    /// bit 0.
    fn find_runs(&self, bits: &[u8]) -> Vec<(usize, usize)> {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for (i, &b) in bits.iter().enumerate() {
            if b == 0 {
                continue;
            }
            match runs.last_mut() {
                Some((start, len)) if *start + *len == i => *len += 1,
                _ => runs.push((i, 1)),
            }
        }

        if self.periodic && runs.len() > 1 {
            let (first_start, first_len) = runs[0];
            let last = runs.len() - 1;
            let (last_start, last_len) = runs[last];
            if first_start == 0 && last_start + last_len == self.n {
                runs[last].1 += first_len;
                runs.remove(0);
            }
        }

        runs
    }

    /// Convert a bit position to input space.
    fn position_to_value(&self, pos: usize) -> f64 {
        let pos = pos as f64 - self.padding as f64;
        if self.periodic {
            pos * self.range / self.n_internal as f64 + self.min_value
        } else {
            pos * self.resolution + self.min_value
        }
    }

    fn run_to_ranges(&self, start: usize, len: usize) -> Vec<(f64, f64)> {
        let (left, right) = if len <= self.w {
            let centre = start + len / 2;
            (centre, centre)
        } else {
            (start + self.halfwidth, start + len - 1 - self.halfwidth)
        };

        let mut in_min = self.position_to_value(left);
        let mut in_max = self.position_to_value(right);

        if self.periodic && in_min >= self.max_value {
            in_min -= self.range;
            in_max -= self.range;
        }

        in_min = in_min.max(self.min_value);
        in_max = in_max.max(self.min_value);

        if self.periodic && in_max >= self.max_value {
            vec![
                (in_min, self.max_value),
                (self.min_value, in_max - self.range),
            ]
        } else {
            vec![(in_min.min(self.max_value), in_max.min(self.max_value))]
        }
    }

    /// Representative value and encoding of a bucket.
    pub fn bucket_info(&self, bucket: usize) -> Result<BucketInfo> {
        match (
            self.bucket_values.get(bucket),
            self.bucket_encodings.get(bucket),
        ) {
            (Some(&value), Some(encoding)) => Ok(BucketInfo {
                value,
                encoding: encoding.clone(),
            }),
            _ => Err(EncoderError::BucketOutOfRange {
                field: self.name.clone(),
                bucket: Some(bucket),
                buckets: self.bucket_values.len(),
            }),
        }
    }

    /// Best-matching bucket for a bit pattern.
    ///
    /// Picks the bucket whose encoding overlaps `encoded` most; the lowest
    /// index wins ties.
    pub fn top_down_compute(&self, encoded: &[u8]) -> Result<BucketInfo> {
        self.check_len(encoded.len())?;

        let mut best = 0;
        let mut best_overlap = 0;
        for (i, encoding) in self.bucket_encodings.iter().enumerate() {
            let overlap = Similarity::overlap(encoding.data(), encoded);
            if overlap > best_overlap {
                best = i;
                best_overlap = overlap;
            }
        }

        self.bucket_info(best)
    }

    /// Closeness of an actual value to an expected one.
    ///
    /// With `fractional`, returns `1 - err / (max - min)` floored at 0;
    /// otherwise the raw error. Periodic encoders measure the shorter way
    /// round.
    pub fn closeness(&self, expected: f64, actual: f64, fractional: bool) -> f64 {
        let span = self.max_value - self.min_value;
        let mut err = if self.periodic {
            let e = (expected - self.min_value).rem_euclid(span);
            let a = (actual - self.min_value).rem_euclid(span);
            let err = (e - a).abs();
            err.min(span - err)
        } else {
            (expected - actual).abs()
        };

        if fractional {
            err = (err / span).min(1.0);
            1.0 - err
        } else {
            err
        }
    }
}

/// Render ranges as `"a-b, c"` with two decimals.
fn describe_ranges(ranges: &[(f64, f64)]) -> String {
    ranges
        .iter()
        .map(|&(low, high)| {
            if low != high {
                format!("{:.2}-{:.2}", low, high)
            } else {
                format!("{:.2}", low)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_of_day() -> ScalarEncoder {
        ScalarEncoder::new(
            ScalarEncoderConfig::new(5, 0.0, 24.0, 4.0)
                .periodic(true)
                .name("time of day"),
        )
        .unwrap()
    }

    fn holiday() -> ScalarEncoder {
        ScalarEncoder::new(ScalarEncoderConfig::new(5, 0.0, 1.0, 1.0).name("holiday")).unwrap()
    }

    fn bits_at(n: usize, active: &[usize]) -> Vec<u8> {
        Vector::from_active(n, active).into_data()
    }

    #[test]
    fn test_output_widths() {
        let cases = [
            (3, 0.0, 366.0, 91.5, true, 12),
            (1, 0.0, 7.0, 1.0, true, 7),
            (3, 0.0, 1.0, 1.0, false, 6),
            (5, 0.0, 24.0, 4.0, true, 30),
            (5, 0.0, 1.0, 1.0, false, 10),
            (21, 0.0, 1.0, 1.0, false, 42),
        ];
        for (w, min, max, radius, periodic, n) in cases {
            let enc =
                ScalarEncoder::new(ScalarEncoderConfig::new(w, min, max, radius).periodic(periodic))
                    .unwrap();
            assert_eq!(enc.width(), n, "w={} range={}..{}", w, min, max);
        }
    }

    #[test]
    fn test_invalid_configs() {
        assert!(ScalarEncoder::new(ScalarEncoderConfig::new(4, 0.0, 1.0, 1.0)).is_err());
        assert!(ScalarEncoder::new(ScalarEncoderConfig::new(0, 0.0, 1.0, 1.0)).is_err());
        assert!(ScalarEncoder::new(ScalarEncoderConfig::new(3, 1.0, 1.0, 1.0)).is_err());
        assert!(ScalarEncoder::new(ScalarEncoderConfig::new(3, 0.0, 1.0, 0.0)).is_err());
        assert!(ScalarEncoder::new(ScalarEncoderConfig::new(3, 0.0, f64::NAN, 1.0)).is_err());

        let err = ScalarEncoder::new(ScalarEncoderConfig::new(2, 0.0, 1.0, 1.0)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_default_name() {
        let enc = ScalarEncoder::new(ScalarEncoderConfig::new(3, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(enc.name(), "[0:1]");
    }

    #[test]
    fn test_encode_periodic() {
        let enc = time_of_day();
        let v = enc.encode(14.0 + 55.0 / 60.0);
        assert_eq!(v.active_indices(), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_encode_periodic_wraps_at_edge() {
        let enc = time_of_day();
        let v = enc.encode(23.9);
        assert_eq!(v.active_indices(), vec![0, 1, 27, 28, 29]);
    }

    #[test]
    fn test_out_of_range_wraps_or_clamps() {
        let tod = time_of_day();
        assert_eq!(tod.encode(25.0), tod.encode(1.0));
        assert_eq!(tod.encode(-1.0), tod.encode(23.0));

        let hol = holiday();
        assert_eq!(hol.encode(2.0), hol.encode(1.0));
        assert_eq!(hol.encode(-0.5), hol.encode(0.0));
    }

    #[test]
    fn test_linear_edges() {
        let enc = holiday();
        assert_eq!(enc.encode(0.0), [1, 1, 1, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(enc.encode(1.0), [0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(enc.encode(2.0 / 3.0), [0, 0, 0, 1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_missing_value() {
        let enc = time_of_day();
        assert_eq!(enc.encode(f64::NAN).nnz(), 0);
        assert_eq!(enc.bucket_index(f64::NAN), None);
    }

    #[test]
    fn test_encode_into_array_checks_length() {
        let enc = holiday();
        let mut short = vec![0u8; 9];
        assert!(matches!(
            enc.encode_into_array(1.0, &mut short),
            Err(EncoderError::DimensionMismatch {
                expected: 10,
                got: 9
            })
        ));

        let mut out = vec![1u8; 10];
        enc.encode_into_array(0.0, &mut out).unwrap();
        assert_eq!(out, vec![1, 1, 1, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_single_run() {
        let enc = time_of_day();
        let decoded = enc.decode(&bits_at(30, &[16, 17, 18, 19, 20])).unwrap().unwrap();
        assert_eq!(decoded.ranges.len(), 1);
        assert!((decoded.ranges[0].0 - 14.4).abs() < 1e-9);
        assert!((decoded.ranges[0].1 - 14.4).abs() < 1e-9);
        assert_eq!(decoded.description, "14.40");
    }

    #[test]
    fn test_decode_merges_wrapped_run() {
        let enc = time_of_day();
        let decoded = enc.decode(&bits_at(30, &[0, 1, 27, 28, 29])).unwrap().unwrap();
        assert_eq!(decoded.ranges.len(), 1);
        assert!((decoded.ranges[0].0 - 23.2).abs() < 1e-9);
    }

    #[test]
    fn test_decode_multiple_runs() {
        let enc = time_of_day();
        let decoded = enc
            .decode(&bits_at(30, &[0, 1, 2, 3, 4, 15, 16, 17, 18, 19]))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.ranges.len(), 2);
        assert!((decoded.ranges[0].0 - 1.6).abs() < 1e-9);
        assert!((decoded.ranges[1].0 - 13.6).abs() < 1e-9);
        assert_eq!(decoded.description, "1.60, 13.60");
    }

    #[test]
    fn test_decode_long_run_spans_range() {
        let enc = holiday();
        let decoded = enc
            .decode(&bits_at(10, &[0, 1, 2, 3, 4, 5, 6, 7]))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.ranges.len(), 1);
        let (low, high) = decoded.ranges[0];
        assert!(low.abs() < 1e-9);
        assert!((high - 0.6).abs() < 1e-9);
        assert_eq!(decoded.description, "0.00-0.60");
    }

    #[test]
    fn test_decode_fills_holes() {
        let enc = time_of_day();
        let full = enc.decode(&bits_at(30, &[16, 17, 18, 19, 20])).unwrap();
        let holed = enc.decode(&bits_at(30, &[16, 17, 19, 20])).unwrap();
        assert_eq!(full, holed);
    }

    #[test]
    fn test_decode_empty_and_wrong_length() {
        let enc = time_of_day();
        assert_eq!(enc.decode(&[0u8; 30]).unwrap(), None);
        assert!(matches!(
            enc.decode(&[0u8; 12]),
            Err(EncoderError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_bucket_tables() {
        let season = ScalarEncoder::new(
            ScalarEncoderConfig::new(3, 0.0, 366.0, 91.5).periodic(true),
        )
        .unwrap();
        assert_eq!(season.bucket_count(), 12);
        assert!((season.bucket_values()[0] - 15.25).abs() < 1e-9);
        assert!((season.bucket_values()[10] - 320.25).abs() < 1e-9);

        let hol = holiday();
        assert_eq!(hol.bucket_count(), 6);
        assert!((hol.bucket_values()[5] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_round_trip() {
        let enc = time_of_day();
        let value = 14.0 + 55.0 / 60.0;
        let bucket = enc.bucket_index(value).unwrap();
        assert_eq!(bucket, 18);

        let info = enc.bucket_info(bucket).unwrap();
        assert!((info.value - 14.8).abs() < 1e-9);
        assert!((info.value - value).abs() < enc.resolution());
        assert_eq!(info.encoding, enc.encode(value));
    }

    #[test]
    fn test_bucket_round_trip_uneven_periodic() {
        // n = ceil(w * range / radius) leaves bins narrower than radius / w
        for (w, max, radius) in [(5, 366.0, 100.0), (3, 24.0, 5.0), (7, 7.0, 3.0)] {
            let config = ScalarEncoderConfig::new(w, 0.0, max, radius).periodic(true);
            let enc = ScalarEncoder::new(config).unwrap();
            assert_eq!(enc.bucket_count(), enc.width());

            for step in 0..=1000 {
                let value = max * step as f64 / 1000.0;
                let bucket = enc.bucket_index(value).unwrap();
                let info = enc.bucket_info(bucket).unwrap_or_else(|e| {
                    panic!("w={} radius={} value={}: {}", w, radius, value, e)
                });
                assert_eq!(
                    info.encoding,
                    enc.encode(value),
                    "w={} radius={} value={} bucket={}",
                    w,
                    radius,
                    value,
                    bucket
                );
                let err = (info.value - value).abs();
                assert!(
                    err.min(max - err) < enc.resolution(),
                    "w={} radius={}: {} reconstructed as {}",
                    w,
                    radius,
                    value,
                    info.value
                );
            }
        }
    }

    #[test]
    fn test_bucket_round_trip_uneven_linear() {
        // (max - min) / resolution + 1/2 lands exactly on a whole number
        let enc = ScalarEncoder::new(ScalarEncoderConfig::new(3, 0.0, 1.0, 2.0)).unwrap();
        for value in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let bucket = enc.bucket_index(value).unwrap();
            let info = enc.bucket_info(bucket).unwrap();
            assert_eq!(info.encoding, enc.encode(value), "value {}", value);
        }
    }

    #[test]
    fn test_bucket_out_of_range() {
        let enc = holiday();
        assert!(matches!(
            enc.bucket_info(6),
            Err(EncoderError::BucketOutOfRange {
                bucket: Some(6),
                buckets: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_top_down_compute() {
        let enc = time_of_day();
        let encoded = enc.encode(14.0 + 55.0 / 60.0);
        let info = enc.top_down_compute(encoded.data()).unwrap();
        assert!((info.value - 14.8).abs() < 1e-9);
        assert_eq!(info.encoding, encoded);

        let weekend = ScalarEncoder::new(ScalarEncoderConfig::new(3, 0.0, 1.0, 1.0)).unwrap();
        let info = weekend.top_down_compute(&[1, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(info.value, 0.0);
    }

    #[test]
    fn test_closeness() {
        let enc = time_of_day();
        // 23:00 and 01:00 are two hours apart across midnight
        assert!((enc.closeness(23.0, 1.0, false) - 2.0).abs() < 1e-9);
        assert!((enc.closeness(23.0, 1.0, true) - (1.0 - 2.0 / 24.0)).abs() < 1e-9);

        let hol = holiday();
        assert!((hol.closeness(1.0, 0.25, true) - 0.25).abs() < 1e-9);
        assert_eq!(hol.closeness(0.0, 5.0, true), 0.0);
    }
}
