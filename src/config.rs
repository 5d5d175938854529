//! Encoder configuration.
//!
//! A [`DateEncoderConfig`] can be built in code:
//!
//! ```rust
//! use date_encoder::DateEncoderConfig;
//!
//! let config = DateEncoderConfig::default()
//!     .season(3)
//!     .time_of_day((5, 4.0))
//!     .custom_days(21, ["sat", "sun"]);
//! ```
//!
//! or read from JSON, using the same shapes per field:
//!
//! ```json
//! {"season": 3, "timeOfDay": [5, 4.0], "customDays": [21, ["sat", "sun"]]}
//! ```
//!
//! Every field accepts `0` (disabled), a width, or `[width, radius]`.
//! `customDays` accepts `0`, `[width, "day"]` or `[width, ["day", ...]]`.

use crate::calendar::CustomDaySet;
use crate::error::{EncoderError, Result};
use crate::field::{json_width, FieldConfig, FieldKind, FieldSpec};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Day names for the custom-days field: one name or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DaySpec {
    One(String),
    Many(Vec<String>),
}

impl DaySpec {
    pub fn names(&self) -> Vec<&str> {
        match self {
            DaySpec::One(name) => vec![name.as_str()],
            DaySpec::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Names joined by spaces, as given. Used as the sub-encoder name.
    pub fn label(&self) -> String {
        self.names().join(" ")
    }
}

impl From<&str> for DaySpec {
    fn from(name: &str) -> Self {
        DaySpec::One(name.to_string())
    }
}

impl From<String> for DaySpec {
    fn from(name: String) -> Self {
        DaySpec::One(name)
    }
}

impl From<Vec<String>> for DaySpec {
    fn from(names: Vec<String>) -> Self {
        DaySpec::Many(names)
    }
}

impl From<Vec<&str>> for DaySpec {
    fn from(names: Vec<&str>) -> Self {
        DaySpec::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DaySpec {
    fn from(names: [&str; N]) -> Self {
        DaySpec::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Configuration of the custom-days field.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CustomDaysConfig {
    #[default]
    Disabled,
    Enabled { width: usize, days: DaySpec },
}

/// A resolved custom-days field.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCustomDays {
    pub spec: FieldSpec,
    pub days: CustomDaySet,
    /// Sub-encoder name: the day names as configured
    pub label: String,
}

impl CustomDaysConfig {
    pub fn is_enabled(&self) -> bool {
        matches!(self, CustomDaysConfig::Enabled { .. })
    }

    /// Parse `0`, `[width, "day"]` or `[width, ["day", ...]]`.
    pub fn from_json(value: &Value) -> Result<Self> {
        const KEY: &str = "customDays";
        let malformed = || {
            EncoderError::Config(format!(
                "{}: provide [width, day] or [width, [days...]], got {}",
                KEY, value
            ))
        };

        match value {
            Value::Number(n) if n.as_u64() == Some(0) => Ok(CustomDaysConfig::Disabled),
            Value::Array(items) => match items.as_slice() {
                [width, days] => {
                    let width = json_width(KEY, width)?;
                    let days = match days {
                        Value::String(name) => DaySpec::One(name.clone()),
                        Value::Array(names) => DaySpec::Many(
                            names
                                .iter()
                                .map(|n| n.as_str().map(str::to_string).ok_or_else(malformed))
                                .collect::<Result<Vec<_>>>()?,
                        ),
                        _ => return Err(malformed()),
                    };
                    Ok(CustomDaysConfig::Enabled { width, days })
                }
                _ => Err(malformed()),
            },
            _ => Err(malformed()),
        }
    }

    /// Resolve into a field spec and day set. `None` when disabled.
    pub fn resolve(&self) -> Result<Option<ResolvedCustomDays>> {
        let CustomDaysConfig::Enabled { width, days } = self else {
            return Ok(None);
        };

        if *width == 0 {
            return Err(EncoderError::Config(
                "customDays: width must be positive".to_string(),
            ));
        }

        let day_set = CustomDaySet::parse(&days.names())?;
        let kind = FieldKind::CustomDays;

        Ok(Some(ResolvedCustomDays {
            spec: FieldSpec {
                kind,
                width: *width,
                radius: kind.default_radius(),
                periodic: kind.is_periodic(),
                name: kind.description_name().to_string(),
            },
            days: day_set,
            label: days.label(),
        }))
    }
}

impl Serialize for CustomDaysConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CustomDaysConfig::Disabled => serializer.serialize_u64(0),
            CustomDaysConfig::Enabled { width, days } => (width, days).serialize(serializer),
        }
    }
}

/// Configuration of a [`DateEncoder`](crate::DateEncoder).
///
/// All fields default to disabled.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEncoderConfig {
    pub season: FieldConfig,
    pub day_of_week: FieldConfig,
    pub weekend: FieldConfig,
    pub custom_days: CustomDaysConfig,
    pub holiday: FieldConfig,
    pub time_of_day: FieldConfig,
    /// Prefix for decoded field names; empty for none
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl DateEncoderConfig {
    pub fn season(mut self, config: impl Into<FieldConfig>) -> Self {
        self.season = config.into();
        self
    }

    pub fn day_of_week(mut self, config: impl Into<FieldConfig>) -> Self {
        self.day_of_week = config.into();
        self
    }

    pub fn weekend(mut self, config: impl Into<FieldConfig>) -> Self {
        self.weekend = config.into();
        self
    }

    pub fn custom_days(mut self, width: usize, days: impl Into<DaySpec>) -> Self {
        self.custom_days = CustomDaysConfig::Enabled {
            width,
            days: days.into(),
        };
        self
    }

    pub fn holiday(mut self, config: impl Into<FieldConfig>) -> Self {
        self.holiday = config.into();
        self
    }

    pub fn time_of_day(mut self, config: impl Into<FieldConfig>) -> Self {
        self.time_of_day = config.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The width/radius configuration of a scalar field.
    ///
    /// Custom days are configured separately and report `Disabled` here.
    pub fn field(&self, kind: FieldKind) -> FieldConfig {
        match kind {
            FieldKind::Season => self.season,
            FieldKind::DayOfWeek => self.day_of_week,
            FieldKind::Weekend => self.weekend,
            FieldKind::CustomDays => FieldConfig::Disabled,
            FieldKind::Holiday => self.holiday,
            FieldKind::TimeOfDay => self.time_of_day,
        }
    }

    /// Parse a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build from an already-parsed JSON object. Unknown keys are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(EncoderError::Config(format!(
                "expected a JSON object, got {}",
                value
            )));
        };

        let mut config = Self::default();
        for (key, item) in map {
            match key.as_str() {
                "season" => config.season = FieldConfig::from_json(key, item)?,
                "dayOfWeek" => config.day_of_week = FieldConfig::from_json(key, item)?,
                "weekend" => config.weekend = FieldConfig::from_json(key, item)?,
                "customDays" => config.custom_days = CustomDaysConfig::from_json(item)?,
                "holiday" => config.holiday = FieldConfig::from_json(key, item)?,
                "timeOfDay" => config.time_of_day = FieldConfig::from_json(key, item)?,
                "name" => {
                    config.name = item
                        .as_str()
                        .ok_or_else(|| EncoderError::Config("name must be a string".to_string()))?
                        .to_string()
                }
                other => {
                    return Err(EncoderError::Config(format!(
                        "unknown configuration key {:?}",
                        other
                    )))
                }
            }
        }

        Ok(config)
    }
}

impl<'de> Deserialize<'de> for DateEncoderConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}
