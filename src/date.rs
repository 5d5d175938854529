//! Date Encoding: timestamps as concatenated scalar encodings.
//!
//! A [`DateEncoder`] pulls several scalars out of a timestamp (day of year,
//! weekday, weekend flag, custom-day flag, holiday proximity, time of day)
//! and encodes each with its own [`ScalarEncoder`]. The sub-encodings are
//! laid end to end, in configuration order, into one fixed-width vector.
//!
//! ```text
//!  season      day of week   weekend   time of day
//! [000000000111][0001000]   [111000]  [000000000000000011111000000000]
//!  offset 0     offset 12    offset 19 offset 25
//! ```
//!
//! Decoding walks the same layout backwards: each slice goes to its
//! sub-encoder, which reports the value ranges its bits stand for.

use crate::calendar::{self, CustomDaySet, HOLIDAY_DAY, HOLIDAY_MONTH};
use crate::config::DateEncoderConfig;
use crate::error::{EncoderError, Result};
use crate::field::{FieldKind, SubField, SubFieldRegistry};
use crate::input::DateInput;
use crate::scalar::{BucketInfo, DecodedField, ScalarEncoder};
use crate::vector::Vector;
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Per-field decode output.
///
/// Fields whose bit slice is all zeros map to `None` ("no data").
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DecodeResult {
    fields: HashMap<String, Option<DecodedField>>,
    order: Vec<String>,
}

impl DecodeResult {
    /// Decoded ranges for a field; `None` if the field is unknown or had
    /// no active bits.
    pub fn get(&self, name: &str) -> Option<&DecodedField> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Whether the field was part of the decode, with or without data.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in layout order.
    pub fn field_names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fields in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&DecodedField>)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.get(name)))
    }

    /// `name:[ranges], name:[ranges]` over the fields that carry data.
    pub fn to_description_string(&self) -> String {
        self.iter()
            .filter_map(|(name, field)| {
                field.map(|f| format!("{}:[{}]", name, f.description))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Encoder for calendar timestamps.
///
/// Immutable after construction; every method takes `&self`, so one
/// encoder can be shared across threads.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use date_encoder::{DateEncoder, DateEncoderConfig};
///
/// let encoder = DateEncoder::new(
///     DateEncoderConfig::default().season(3).day_of_week(1).weekend(3).time_of_day(5),
/// )?;
///
/// let when = NaiveDate::from_ymd_opt(2010, 11, 4).unwrap().and_hms_opt(14, 55, 0).unwrap();
/// let bits = encoder.encode(when);
/// assert_eq!(bits.dimensions(), encoder.width());
///
/// let decoded = encoder.decode(bits.data())?;
/// println!("{}", decoded.to_description_string());
/// # Ok::<(), date_encoder::EncoderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DateEncoder {
    name: String,
    registry: SubFieldRegistry,
    custom_days: Option<CustomDaySet>,
    config: DateEncoderConfig,
}

impl DateEncoder {
    /// Build an encoder. Fails without side effects on any invalid field.
    pub fn new(config: DateEncoderConfig) -> Result<Self> {
        let mut registry = SubFieldRegistry::new();
        let mut custom_days = None;

        for kind in FieldKind::ALL {
            let (spec, encoder_name) = if kind == FieldKind::CustomDays {
                match config.custom_days.resolve()? {
                    Some(resolved) => {
                        custom_days = Some(resolved.days);
                        (resolved.spec, resolved.label)
                    }
                    None => continue,
                }
            } else {
                match config.field(kind).resolve(kind)? {
                    Some(spec) => {
                        let name = spec.name.clone();
                        (spec, name)
                    }
                    None => continue,
                }
            };

            let encoder =
                ScalarEncoder::new(spec.encoder_config(&encoder_name)).map_err(|e| match e {
                    EncoderError::Config(msg) => {
                        EncoderError::Config(format!("{}: {}", kind.config_key(), msg))
                    }
                    other => other,
                })?;
            registry.push(kind, spec.name, encoder);
        }

        debug!(
            name = %config.name,
            fields = registry.len(),
            width = registry.width(),
            "Built date encoder"
        );

        Ok(Self {
            name: config.name.clone(),
            registry,
            custom_days,
            config,
        })
    }

    /// Build from a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(DateEncoderConfig::from_json(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DateEncoderConfig {
        &self.config
    }

    /// Total output width in bits.
    pub fn width(&self) -> usize {
        self.registry.width()
    }

    /// The configured sub-fields, in layout order.
    pub fn fields(&self) -> &SubFieldRegistry {
        &self.registry
    }

    pub fn custom_days(&self) -> Option<&CustomDaySet> {
        self.custom_days.as_ref()
    }

    /// `(field name, bit offset)` for every configured field.
    pub fn description(&self) -> Vec<(String, usize)> {
        self.registry
            .iter()
            .map(|f| (f.name().to_string(), f.offset()))
            .collect()
    }

    /// `(offset, width)` of a field, by description or sub-encoder name.
    pub fn field_description(&self, name: &str) -> Option<(usize, usize)> {
        self.registry.find(name).map(|f| (f.offset(), f.width()))
    }

    /// Sub-encoder names, qualified as `prefix.name` when `prefix` is not
    /// empty.
    pub fn scalar_names(&self, prefix: &str) -> Vec<String> {
        self.registry
            .iter()
            .map(|f| qualify(prefix, f.encoder().name()))
            .collect()
    }

    /// The scalar fed to each sub-encoder; `None` for missing input.
    pub fn scalars(&self, input: impl Into<DateInput>) -> Option<Vec<f64>> {
        let input = input.into();
        let ts = input.timestamp()?;
        Some(
            self.registry
                .iter()
                .map(|f| self.scalar_for(f.kind(), ts))
                .collect(),
        )
    }

    fn scalar_for(&self, kind: FieldKind, ts: &NaiveDateTime) -> f64 {
        match kind {
            FieldKind::Season => calendar::day_of_year(ts),
            FieldKind::DayOfWeek => calendar::weekday_index(ts.weekday()) as f64,
            FieldKind::Weekend => flag(calendar::is_weekend(ts)),
            FieldKind::CustomDays => flag(
                self.custom_days
                    .map_or(false, |days| days.contains(ts.weekday())),
            ),
            FieldKind::Holiday => calendar::holiday_proximity(ts, HOLIDAY_MONTH, HOLIDAY_DAY),
            FieldKind::TimeOfDay => calendar::time_of_day(ts),
        }
    }

    /// Encode a timestamp. Missing input gives an all-zero vector.
    pub fn encode(&self, input: impl Into<DateInput>) -> Vector {
        let mut output = Vector::zeros(self.width());
        self.write_fields(input.into(), output.data_mut());
        output
    }

    /// Encode into a caller-provided buffer of exactly `width()` bits.
    pub fn encode_into_array(&self, input: impl Into<DateInput>, output: &mut [u8]) -> Result<()> {
        self.check_len(output.len())?;
        self.write_fields(input.into(), output);
        Ok(())
    }

    /// Encode a JSON value: `null` or a timestamp string.
    pub fn encode_json(&self, value: &Value) -> Result<Vector> {
        let input = DateInput::try_from(value)?;
        Ok(self.encode(input))
    }

    fn write_fields(&self, input: DateInput, output: &mut [u8]) {
        let Some(ts) = input.timestamp() else {
            output.fill(0);
            return;
        };

        for field in &self.registry {
            let value = self.scalar_for(field.kind(), ts);
            field
                .encoder()
                .write_bits(value, &mut output[field.bit_range()]);
        }
        trace!(%ts, width = output.len(), "Encoded date");
    }

    fn check_len(&self, got: usize) -> Result<()> {
        if got != self.width() {
            return Err(EncoderError::DimensionMismatch {
                expected: self.width(),
                got,
            });
        }
        Ok(())
    }

    /// Decode a full-width bit vector into per-field value ranges.
    pub fn decode(&self, encoded: &[u8]) -> Result<DecodeResult> {
        self.check_len(encoded.len())?;

        let mut result = DecodeResult::default();
        for field in &self.registry {
            let name = qualify(&self.name, field.encoder().name());
            let decoded = field.encoder().decode(&encoded[field.bit_range()])?;
            result.fields.insert(name.clone(), decoded);
            result.order.push(name);
        }

        Ok(result)
    }

    /// Bucket index per field; all `None` for missing input.
    pub fn bucket_indices(&self, input: impl Into<DateInput>) -> Vec<Option<usize>> {
        match self.scalars(input) {
            Some(values) => self
                .registry
                .iter()
                .zip(values)
                .map(|(f, v)| f.encoder().bucket_index(v))
                .collect(),
            None => vec![None; self.registry.len()],
        }
    }

    /// Reconstructed value and encoding for one bucket index per field.
    pub fn bucket_info(&self, buckets: &[Option<usize>]) -> Result<Vec<BucketInfo>> {
        if buckets.len() != self.registry.len() {
            return Err(EncoderError::DimensionMismatch {
                expected: self.registry.len(),
                got: buckets.len(),
            });
        }

        self.registry
            .iter()
            .zip(buckets)
            .map(|(field, bucket)| match bucket {
                Some(b) => field.encoder().bucket_info(*b),
                None => Err(EncoderError::BucketOutOfRange {
                    field: field.encoder().name().to_string(),
                    bucket: None,
                    buckets: field.encoder().bucket_count(),
                }),
            })
            .collect()
    }

    /// Best-matching bucket per field for a full-width bit vector.
    pub fn top_down_compute(&self, encoded: &[u8]) -> Result<Vec<BucketInfo>> {
        self.check_len(encoded.len())?;
        self.registry
            .iter()
            .map(|f| f.encoder().top_down_compute(&encoded[f.bit_range()]))
            .collect()
    }

    /// Per-field closeness between expected and actual scalars.
    pub fn closeness_scores(
        &self,
        expected: &[f64],
        actual: &[f64],
        fractional: bool,
    ) -> Result<Vec<f64>> {
        for got in [expected.len(), actual.len()] {
            if got != self.registry.len() {
                return Err(EncoderError::DimensionMismatch {
                    expected: self.registry.len(),
                    got,
                });
            }
        }

        Ok(self
            .registry
            .iter()
            .zip(expected.iter().zip(actual))
            .map(|(f, (&e, &a))| f.encoder().closeness(e, a, fractional))
            .collect())
    }

    /// Render a full-width vector with a space between fields.
    pub fn format_bits(&self, encoded: &[u8]) -> Result<String> {
        self.check_len(encoded.len())?;
        Ok(self
            .registry
            .iter()
            .map(|f| render_slice(&encoded[f.bit_range()]))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// The sub-field owning bit `index`.
    pub fn field_at(&self, index: usize) -> Option<&SubField> {
        self.registry
            .iter()
            .find(|f| f.bit_range().contains(&index))
    }
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn render_slice(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b != 0 { '1' } else { '0' }).collect()
}
