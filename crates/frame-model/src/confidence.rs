//! Per-digit confidence output of the classifier.

use digitlens_common::{DigitlensError, DigitlensResult};
use serde::{Deserialize, Serialize};

/// Number of digit classes.
pub const DIGIT_CLASSES: usize = 10;

/// An ordered sequence of exactly ten confidences, index = digit.
///
/// Each element is in `[0, 1]`. The vector need not sum to one; the model
/// contract only bounds individual elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceVector([f32; DIGIT_CLASSES]);

impl ConfidenceVector {
    /// Validate raw model output into a confidence vector.
    ///
    /// Fails when the output is not exactly ten elements or any element is
    /// non-finite or outside `[0, 1]` — malformed output is an inference
    /// failure, not a display problem.
    pub fn from_model_output(values: &[f32]) -> DigitlensResult<Self> {
        let values: [f32; DIGIT_CLASSES] = values.try_into().map_err(|_| {
            DigitlensError::inference(format!(
                "Model produced {} confidences, expected {DIGIT_CLASSES}",
                values.len()
            ))
        })?;
        for (digit, &v) in values.iter().enumerate() {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(DigitlensError::inference(format!(
                    "Confidence for digit {digit} out of range: {v}"
                )));
            }
        }
        Ok(Self(values))
    }

    /// A flat vector assigning every class the same confidence.
    pub fn uniform() -> Self {
        Self([1.0 / DIGIT_CLASSES as f32; DIGIT_CLASSES])
    }

    pub fn values(&self) -> &[f32; DIGIT_CLASSES] {
        &self.0
    }

    /// Confidence for one digit class.
    pub fn confidence(&self, digit: u8) -> f32 {
        self.0[digit as usize]
    }

    /// Arg-max digit and its confidence.
    ///
    /// Ties break toward the lowest index: only a strictly greater value
    /// displaces the current winner.
    pub fn top_digit(&self) -> (u8, f32) {
        let mut best = 0usize;
        for (i, &v) in self.0.iter().enumerate().skip(1) {
            if v > self.0[best] {
                best = i;
            }
        }
        (best as u8, self.0[best])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(ConfidenceVector::from_model_output(&[0.5; 9]).is_err());
        assert!(ConfidenceVector::from_model_output(&[0.5; 11]).is_err());
        assert!(ConfidenceVector::from_model_output(&[0.5; 10]).is_ok());
    }

    #[test]
    fn rejects_out_of_range_elements() {
        let mut values = [0.1; 10];
        values[3] = 1.2;
        assert!(ConfidenceVector::from_model_output(&values).is_err());
        values[3] = -0.1;
        assert!(ConfidenceVector::from_model_output(&values).is_err());
        values[3] = f32::NAN;
        assert!(ConfidenceVector::from_model_output(&values).is_err());
    }

    #[test]
    fn does_not_require_sum_to_one() {
        let values = [1.0; 10];
        assert!(ConfidenceVector::from_model_output(&values).is_ok());
    }

    #[test]
    fn top_digit_picks_maximum() {
        let mut values = [0.0; 10];
        values[7] = 0.93;
        let vector = ConfidenceVector::from_model_output(&values).unwrap();
        assert_eq!(vector.top_digit(), (7, 0.93));
    }

    #[test]
    fn top_digit_ties_break_toward_lowest_index() {
        let values = [0.1, 0.9, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let vector = ConfidenceVector::from_model_output(&values).unwrap();
        assert_eq!(vector.top_digit().0, 1);
    }
}
