//! # Date Encoder: timestamps as binary feature vectors
//!
//! Turns calendar timestamps into fixed-width binary vectors in which
//! similar moments share active bits, and decodes such vectors back into
//! value ranges. Built for sequence learners that compare inputs by bit
//! overlap.
//!
//! ## Quick Start
//!
//! ```rust
//! use date_encoder::{DateEncoder, DateEncoderConfig, Similarity};
//!
//! let encoder = DateEncoder::new(
//!     DateEncoderConfig::default()
//!         .season(3)
//!         .day_of_week(1)
//!         .weekend(3)
//!         .time_of_day(5),
//! )?;
//!
//! let afternoon = encoder.encode("2010-11-04 14:55".parse::<date_encoder::DateInput>()?);
//! let later = encoder.encode("2010-11-04 15:30".parse::<date_encoder::DateInput>()?);
//! println!("shared bits: {}", Similarity::overlap(afternoon.data(), later.data()));
//!
//! let decoded = encoder.decode(afternoon.data())?;
//! println!("{}", decoded.to_description_string());
//! # Ok::<(), date_encoder::EncoderError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Scalar encoder**: a run of `w` active bits whose position tracks a value
//! - **Sub-field**: one aspect of a date (season, weekday, ...) with its own scalar encoder
//! - **Layout**: sub-fields concatenated in a fixed order, each at a known offset
//! - **Decode**: per sub-field value ranges recovered from the active bits
//! - **Buckets**: the discrete values each sub-field can represent

pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod field;
pub mod input;
pub mod scalar;
pub mod similarity;
pub mod vector;

// Re-exports for convenience
pub use calendar::CustomDaySet;
pub use config::{CustomDaysConfig, DateEncoderConfig, DaySpec};
pub use date::{DateEncoder, DecodeResult};
pub use error::{EncoderError, Result};
pub use field::{FieldConfig, FieldKind, SubField, SubFieldRegistry};
pub use input::DateInput;
pub use scalar::{BucketInfo, DecodedField, ScalarEncoder, ScalarEncoderConfig};
pub use similarity::{Metric, Similarity};
pub use vector::Vector;
