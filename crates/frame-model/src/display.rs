//! Updates delivered from the recognition pipeline to a display sink.

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceVector;

/// One display update, tagged with the frame it was computed from.
///
/// The sequence number lets sinks apply last-write-wins ordering: two
/// classifications may be in flight concurrently and complete out of order,
/// and an older result must never overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    /// Sequence number of the source frame, monotonically increasing.
    pub seq: u64,

    /// What to render.
    pub kind: DisplayKind,
}

/// The renderable payload of a display update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplayKind {
    /// All ten per-digit confidences.
    Confidences(ConfidenceVector),

    /// Only the winning digit.
    TopDigit { digit: u8, confidence: f32 },
}

impl DisplayUpdate {
    pub fn confidences(seq: u64, vector: ConfidenceVector) -> Self {
        Self {
            seq,
            kind: DisplayKind::Confidences(vector),
        }
    }

    pub fn top_digit(seq: u64, vector: ConfidenceVector) -> Self {
        let (digit, confidence) = vector.top_digit();
        Self {
            seq,
            kind: DisplayKind::TopDigit { digit, confidence },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_serialize_with_sequence_tag() {
        let update = DisplayUpdate::confidences(3, ConfidenceVector::uniform());
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("\"seq\":3"));
        let back: DisplayUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn top_digit_update_carries_winner() {
        let mut values = [0.0; 10];
        values[4] = 0.8;
        let vector = ConfidenceVector::from_model_output(&values).unwrap();
        let update = DisplayUpdate::top_digit(9, vector);
        assert_eq!(update.seq, 9);
        assert_eq!(
            update.kind,
            DisplayKind::TopDigit {
                digit: 4,
                confidence: 0.8
            }
        );
    }
}
