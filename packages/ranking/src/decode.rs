//! Decoding of candidate records at the engine boundary.
//!
//! The engine accepts any [`CandidateRecord`]. Typed [`Candidate`]s decode
//! infallibly; loosely-typed JSON rows (`[lat, lng, count, avg_fine,
//! types, label]`) are checked field by field, and the first bad row aborts
//! the whole ranking call.

use parkwise_ranking_models::Candidate;
use serde_json::Value;

/// Number of fields in a positional candidate row.
pub const CANDIDATE_FIELD_COUNT: usize = 6;

/// Numeric payload of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateFields {
    pub latitude: f64,
    pub longitude: f64,
    pub violation_count: i64,
    pub average_fine: f64,
    pub violation_type_count: i64,
}

/// Errors from decoding a single candidate row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The row is not a 6-element array.
    #[error("candidate entries must be 6-field rows, got {found}")]
    Shape {
        /// Description of what was found instead.
        found: String,
    },

    /// A numeric field could not be decoded.
    #[error("candidate field '{field}' must be {expected}, got {found}")]
    Field {
        /// Name of the offending field.
        field: &'static str,
        /// What the field should have been.
        expected: &'static str,
        /// What was found instead.
        found: String,
    },
}

/// A record the ranking engine can consume.
pub trait CandidateRecord {
    /// Extracts the numeric fields.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the record has the wrong shape or a field
    /// has the wrong type.
    fn decode(&self) -> Result<CandidateFields, DecodeError>;

    /// The location label, if present and textual.
    fn location_label(&self) -> Option<&str>;
}

impl CandidateRecord for Candidate {
    fn decode(&self) -> Result<CandidateFields, DecodeError> {
        Ok(CandidateFields {
            latitude: self.latitude,
            longitude: self.longitude,
            violation_count: self.violation_count,
            average_fine: self.average_fine,
            violation_type_count: self.violation_type_count,
        })
    }

    fn location_label(&self) -> Option<&str> {
        self.location_label.as_deref()
    }
}

impl CandidateRecord for Value {
    fn decode(&self) -> Result<CandidateFields, DecodeError> {
        let fields = match self.as_array() {
            Some(fields) if fields.len() == CANDIDATE_FIELD_COUNT => fields,
            Some(fields) => {
                return Err(DecodeError::Shape {
                    found: format!("{} fields", fields.len()),
                });
            }
            None => {
                return Err(DecodeError::Shape {
                    found: describe(self),
                });
            }
        };

        Ok(CandidateFields {
            latitude: float_field(&fields[0], "latitude")?,
            longitude: float_field(&fields[1], "longitude")?,
            violation_count: int_field(&fields[2], "violation_count")?,
            average_fine: float_field(&fields[3], "average_fine")?,
            violation_type_count: int_field(&fields[4], "violation_type_count")?,
        })
    }

    fn location_label(&self) -> Option<&str> {
        self.get(CANDIDATE_FIELD_COUNT - 1).and_then(Value::as_str)
    }
}

fn float_field(value: &Value, field: &'static str) -> Result<f64, DecodeError> {
    value.as_f64().ok_or_else(|| DecodeError::Field {
        field,
        expected: "a number",
        found: describe(value),
    })
}

fn int_field(value: &Value, field: &'static str) -> Result<i64, DecodeError> {
    value.as_i64().ok_or_else(|| DecodeError::Field {
        field,
        expected: "an integer",
        found: describe(value),
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(a) => format!("array of {}", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_positional_row() {
        let row = json!([41.88, -87.62, 12, 55.5, 3, "100 N STATE ST"]);
        let fields = row.decode().unwrap();
        assert_eq!(
            fields,
            CandidateFields {
                latitude: 41.88,
                longitude: -87.62,
                violation_count: 12,
                average_fine: 55.5,
                violation_type_count: 3,
            }
        );
        assert_eq!(row.location_label(), Some("100 N STATE ST"));
    }

    #[test]
    fn integer_coordinates_are_numbers() {
        let row = json!([41, -87, 1, 50, 1, null]);
        let fields = row.decode().unwrap();
        assert!((fields.latitude - 41.0).abs() < f64::EPSILON);
        assert!((fields.average_fine - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_text_label_is_absent_not_an_error() {
        let row = json!([41.0, -87.0, 1, 50.0, 1, 42]);
        assert!(row.decode().is_ok());
        assert_eq!(row.location_label(), None);

        let row = json!([41.0, -87.0, 1, 50.0, 1, null]);
        assert_eq!(row.location_label(), None);
    }

    #[test]
    fn rejects_wrong_arity() {
        let row = json!([41.0, -87.0, 1, 50.0, 1]);
        assert_eq!(
            row.decode().unwrap_err(),
            DecodeError::Shape {
                found: "5 fields".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_array() {
        let row = json!({"lat": 41.0});
        assert!(matches!(row.decode(), Err(DecodeError::Shape { .. })));
    }

    #[test]
    fn rejects_fractional_count() {
        let row = json!([41.0, -87.0, 1.5, 50.0, 1, "X"]);
        assert!(matches!(
            row.decode(),
            Err(DecodeError::Field {
                field: "violation_count",
                ..
            })
        ));
    }

    #[test]
    fn rejects_textual_coordinate() {
        let row = json!(["41.0", -87.0, 1, 50.0, 1, "X"]);
        let err = row.decode().unwrap_err();
        assert!(err.to_string().contains("latitude"), "{err}");
    }

    #[test]
    fn typed_candidate_always_decodes() {
        let candidate = Candidate::new(41.0, -87.0, 4, 25.0, 2, "CLARK ST");
        assert_eq!(candidate.decode().unwrap().violation_count, 4);
        assert_eq!(candidate.location_label(), Some("CLARK ST"));
    }
}
