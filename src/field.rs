//! Sub-field layout.
//!
//! Each enabled aspect of a date (season, day of week, ...) becomes one
//! [`SubField`]: a scalar encoder plus the offset of its bits inside the
//! composite vector. The [`SubFieldRegistry`] keeps them in configuration
//! order, which is also the bit layout order and the decode order.

use crate::error::{EncoderError, Result};
use crate::scalar::{ScalarEncoder, ScalarEncoderConfig};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::Range;

/// The aspects of a timestamp that can be encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Season,
    DayOfWeek,
    Weekend,
    CustomDays,
    Holiday,
    TimeOfDay,
}

impl FieldKind {
    /// Every kind, in bit layout order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Season,
        FieldKind::DayOfWeek,
        FieldKind::Weekend,
        FieldKind::CustomDays,
        FieldKind::Holiday,
        FieldKind::TimeOfDay,
    ];

    /// Value domain `(min, max)` of the field's scalar.
    pub fn domain(self) -> (f64, f64) {
        match self {
            // Leap years are ignored: every year has 366 slots
            FieldKind::Season => (0.0, 366.0),
            FieldKind::DayOfWeek => (0.0, 7.0),
            FieldKind::Weekend | FieldKind::CustomDays | FieldKind::Holiday => (0.0, 1.0),
            FieldKind::TimeOfDay => (0.0, 24.0),
        }
    }

    pub fn is_periodic(self) -> bool {
        matches!(
            self,
            FieldKind::Season | FieldKind::DayOfWeek | FieldKind::TimeOfDay
        )
    }

    /// Radius used when only a width is configured.
    pub fn default_radius(self) -> f64 {
        match self {
            // One season
            FieldKind::Season => 91.5,
            // Morning, afternoon, evening, ...
            FieldKind::TimeOfDay => 4.0,
            _ => 1.0,
        }
    }

    /// Name listed in the encoder description.
    pub fn description_name(self) -> &'static str {
        match self {
            FieldKind::Season => "season",
            FieldKind::DayOfWeek => "day of week",
            FieldKind::Weekend => "weekend",
            FieldKind::CustomDays => "customdays",
            FieldKind::Holiday => "holiday",
            FieldKind::TimeOfDay => "time of day",
        }
    }

    /// Key used by the config JSON.
    pub fn config_key(self) -> &'static str {
        match self {
            FieldKind::Season => "season",
            FieldKind::DayOfWeek => "dayOfWeek",
            FieldKind::Weekend => "weekend",
            FieldKind::CustomDays => "customDays",
            FieldKind::Holiday => "holiday",
            FieldKind::TimeOfDay => "timeOfDay",
        }
    }
}

/// How one field is configured.
///
/// Only `Disabled` (or a bare width of 0) turns a field off; a
/// `WithRadius(0, _)` pair is an invalid width, not a disabled field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FieldConfig {
    #[default]
    Disabled,
    /// Width with the field's default radius
    Simple(usize),
    /// Width and explicit radius
    WithRadius(usize, f64),
}

impl FieldConfig {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, FieldConfig::Disabled | FieldConfig::Simple(0))
    }

    /// Resolve against a field kind. `None` when disabled.
    pub fn resolve(self, kind: FieldKind) -> Result<Option<FieldSpec>> {
        let (width, radius) = match self {
            FieldConfig::Disabled | FieldConfig::Simple(0) => return Ok(None),
            FieldConfig::Simple(width) => (width, kind.default_radius()),
            FieldConfig::WithRadius(width, radius) => (width, radius),
        };

        if width == 0 {
            return Err(EncoderError::Config(format!(
                "{}: width must be positive when a radius is given",
                kind.config_key()
            )));
        }

        Ok(Some(FieldSpec {
            kind,
            width,
            radius,
            periodic: kind.is_periodic(),
            name: kind.description_name().to_string(),
        }))
    }

    /// Parse the JSON shapes `0`, `width` and `[width, radius]`.
    pub fn from_json(key: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Number(_) => Ok(FieldConfig::from(json_width(key, value)?)),
            Value::Array(items) => match items.as_slice() {
                [width, radius] => {
                    let width = json_width(key, width)?;
                    let radius = radius.as_f64().ok_or_else(|| {
                        EncoderError::Config(format!("{}: radius must be a number", key))
                    })?;
                    Ok(FieldConfig::WithRadius(width, radius))
                }
                _ => Err(EncoderError::Config(format!(
                    "{}: expected [width, radius], got {} elements",
                    key,
                    items.len()
                ))),
            },
            other => Err(EncoderError::Config(format!(
                "{}: expected 0, a width or [width, radius], got {}",
                key, other
            ))),
        }
    }
}

/// Read a non-negative integer width from JSON.
pub(crate) fn json_width(key: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| {
            EncoderError::Config(format!(
                "{}: width must be a non-negative integer, got {}",
                key, value
            ))
        })
}

impl From<usize> for FieldConfig {
    fn from(width: usize) -> Self {
        if width == 0 {
            FieldConfig::Disabled
        } else {
            FieldConfig::Simple(width)
        }
    }
}

impl From<(usize, f64)> for FieldConfig {
    fn from((width, radius): (usize, f64)) -> Self {
        FieldConfig::WithRadius(width, radius)
    }
}

impl Serialize for FieldConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            FieldConfig::Disabled => serializer.serialize_u64(0),
            FieldConfig::Simple(width) => serializer.serialize_u64(width as u64),
            FieldConfig::WithRadius(width, radius) => (width, radius).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldConfig::from_json("field", &value).map_err(D::Error::custom)
    }
}

/// A resolved, enabled field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    /// Active bits of the sub-encoder
    pub width: usize,
    pub radius: f64,
    pub periodic: bool,
    pub name: String,
}

impl FieldSpec {
    /// Scalar encoder options for this field, named `encoder_name`.
    pub fn encoder_config(&self, encoder_name: &str) -> ScalarEncoderConfig {
        let (min, max) = self.kind.domain();
        ScalarEncoderConfig::new(self.width, min, max, self.radius)
            .periodic(self.periodic)
            .name(encoder_name)
    }
}

/// One configured sub-encoder and where its bits go.
#[derive(Clone, Debug)]
pub struct SubField {
    kind: FieldKind,
    name: String,
    encoder: ScalarEncoder,
    offset: usize,
}

impl SubField {
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Description name (e.g. `"day of week"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoder(&self) -> &ScalarEncoder {
        &self.encoder
    }

    /// First bit of this field in the composite vector.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.encoder.width()
    }

    /// Bit positions owned by this field.
    pub fn bit_range(&self) -> Range<usize> {
        self.offset..self.offset + self.encoder.width()
    }
}

/// Ordered sub-fields with contiguous, non-overlapping bit ranges.
#[derive(Clone, Debug, Default)]
pub struct SubFieldRegistry {
    fields: Vec<SubField>,
    width: usize,
}

impl SubFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-field at the current end of the layout.
    pub fn push(&mut self, kind: FieldKind, name: impl Into<String>, encoder: ScalarEncoder) {
        let offset = self.width;
        self.width += encoder.width();
        self.fields.push(SubField {
            kind,
            name: name.into(),
            encoder,
            offset,
        });
    }

    /// Total width of all sub-fields.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubField> {
        self.fields.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SubField> {
        self.fields.get(index)
    }

    /// Look up by description name or sub-encoder name.
    pub fn find(&self, name: &str) -> Option<&SubField> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.encoder.name() == name)
    }
}

impl<'a> IntoIterator for &'a SubFieldRegistry {
    type Item = &'a SubField;
    type IntoIter = std::slice::Iter<'a, SubField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
