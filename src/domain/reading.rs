// Reading domain model - one ingested measurement event
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidReading {
    #[error("user_id must not be empty")]
    EmptyUserId,
    #[error("measurement must not be empty")]
    EmptyMeasurement,
}

/// A single data point as submitted by a device: one measurement name, one
/// `user_id` tag and one float field named `field1`. The timestamp is
/// assigned at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub user_id: String,
    pub measurement: String,
    pub field1: f64,
}

impl Reading {
    pub fn new(user_id: String, measurement: String, field1: f64) -> Result<Self, InvalidReading> {
        if user_id.trim().is_empty() {
            return Err(InvalidReading::EmptyUserId);
        }
        if measurement.trim().is_empty() {
            return Err(InvalidReading::EmptyMeasurement);
        }
        Ok(Self {
            user_id,
            measurement,
            field1,
        })
    }
}
