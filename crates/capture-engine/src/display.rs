//! Presentation: confidence labels and display sinks.

use std::sync::{Arc, Mutex};

use digitlens_frame_model::{ConfidenceVector, DisplayKind, DisplayUpdate};

/// Render the ten per-digit labels, `"3: 97%"` style.
///
/// Percentages are formatted with zero decimals, matching the viewfinder
/// labels of the original demo.
pub fn format_confidence_labels(vector: &ConfidenceVector) -> [String; 10] {
    std::array::from_fn(|digit| {
        format!("{digit}: {:.0}%", vector.values()[digit] * 100.0)
    })
}

/// Render only the winning digit, `"7 (93%)"` style.
pub fn format_top_label(digit: u8, confidence: f32) -> String {
    format!("{digit} ({:.0}%)", confidence * 100.0)
}

/// Admission control for out-of-order display updates.
///
/// Two classifications may be in flight at once and complete out of order;
/// a sink must never let a stale result overwrite a newer one. The gate
/// admits an update only when its sequence number is at least the newest
/// already admitted (last-write-wins).
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceGate {
    newest: Option<u64>,
}

impl SequenceGate {
    pub fn admit(&mut self, seq: u64) -> bool {
        match self.newest {
            Some(newest) if seq < newest => false,
            _ => {
                self.newest = Some(seq);
                true
            }
        }
    }
}

/// Trait for display surfaces fed by the frame loop.
pub trait DisplaySink: Send {
    /// Present one update. Implementations apply their own sequence gating
    /// and must tolerate out-of-order delivery.
    fn present(&mut self, update: &DisplayUpdate);
}

/// Sink that prints labels to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    gate: SequenceGate,
}

impl DisplaySink for ConsoleSink {
    fn present(&mut self, update: &DisplayUpdate) {
        if !self.gate.admit(update.seq) {
            return;
        }
        match &update.kind {
            DisplayKind::Confidences(vector) => {
                for label in format_confidence_labels(vector) {
                    println!("{label}");
                }
            }
            DisplayKind::TopDigit { digit, confidence } => {
                println!("{}", format_top_label(*digit, *confidence));
            }
        }
    }
}

/// Sink that records admitted updates in memory.
///
/// Cloning shares the underlying buffer, so a test can keep one handle
/// while the session owns the other.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    gate: Arc<Mutex<SequenceGate>>,
    updates: Arc<Mutex<Vec<DisplayUpdate>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the updates admitted so far.
    pub fn updates(&self) -> Vec<DisplayUpdate> {
        // Gate and buffer stay valid across a panic, so a poisoned lock
        // is recoverable.
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DisplaySink for MemorySink {
    fn present(&mut self, update: &DisplayUpdate) {
        let mut gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        if !gate.admit(update.seq) {
            return;
        }
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(update.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_with(digit: usize, confidence: f32) -> ConfidenceVector {
        let mut values = [0.0f32; 10];
        values[digit] = confidence;
        ConfidenceVector::from_model_output(&values).unwrap()
    }

    #[test]
    fn labels_are_percentage_formatted() {
        let labels = format_confidence_labels(&vector_with(3, 0.965));
        assert_eq!(labels[3], "3: 96%");
        assert_eq!(labels[0], "0: 0%");
        assert_eq!(labels.len(), 10);
    }

    #[test]
    fn top_label_names_digit_and_percent() {
        assert_eq!(format_top_label(7, 0.93), "7 (93%)");
    }

    #[test]
    fn gate_rejects_stale_sequence_numbers() {
        let mut gate = SequenceGate::default();
        assert!(gate.admit(1));
        assert!(gate.admit(3));
        assert!(!gate.admit(2));
        // Re-presenting the newest frame is idempotent, not stale.
        assert!(gate.admit(3));
        assert!(gate.admit(4));
    }

    #[test]
    fn memory_sink_drops_out_of_order_updates() {
        let mut sink = MemorySink::new();
        sink.present(&DisplayUpdate::top_digit(2, vector_with(1, 0.9)));
        sink.present(&DisplayUpdate::top_digit(1, vector_with(2, 0.9)));
        sink.present(&DisplayUpdate::top_digit(3, vector_with(3, 0.9)));

        let seqs: Vec<u64> = sink.updates().iter().map(|u| u.seq).collect();
        assert_eq!(seqs, vec![2, 3]);
    }

    #[test]
    fn memory_sink_recovers_from_a_poisoned_lock() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.present(&DisplayUpdate::top_digit(0, vector_with(1, 0.9)));

        // Panic while holding the buffer lock to poison it.
        let poisoner = sink.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.updates.lock().unwrap();
            panic!("poisoning sink lock");
        })
        .join();

        writer.present(&DisplayUpdate::top_digit(1, vector_with(2, 0.9)));
        assert_eq!(sink.updates().len(), 2);
    }

    #[test]
    fn memory_sink_clones_share_state() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.present(&DisplayUpdate::top_digit(0, vector_with(5, 0.8)));
        assert_eq!(sink.updates().len(), 1);
    }
}
