use egui::Pos2;

use super::{Gesture, InputEvent, PointerPhase};
use crate::config::EditorConfig;

/// Configuration for tap recognition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Longest press still counted as a tap, in milliseconds
    pub max_tap_duration_ms: u64,
    /// Furthest the centroid may travel during a tap
    pub max_tap_travel: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for GestureConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            max_tap_duration_ms: config.tap_max_duration_ms,
            max_tap_travel: config.tap_max_travel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchSequence {
    started_ms: u64,
    start: Pos2,
    max_pointers: usize,
    travel: f32,
}

/// Turns raw multi-pointer begin/update/end events into [`Gesture::Tap`].
///
/// A sequence starts at the first `Begin` and ends at the `End` that leaves no
/// pointer down. It is a tap if at least two pointers took part, it lasted no
/// longer than the configured duration and it stayed within the travel limit.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    sequence: Option<TouchSequence>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            sequence: None,
        }
    }

    /// Feeds one event; returns a gesture when a sequence completes as a tap
    pub fn process(&mut self, event: &InputEvent) -> Option<Gesture> {
        match event.phase {
            PointerPhase::Begin => {
                match &mut self.sequence {
                    Some(sequence) => sequence.max_pointers = sequence.max_pointers.max(event.pointer_count),
                    None => {
                        self.sequence = Some(TouchSequence {
                            started_ms: event.timestamp_ms,
                            start: event.pos,
                            max_pointers: event.pointer_count,
                            travel: 0.0,
                        })
                    }
                }
                None
            }
            PointerPhase::Update => {
                if let Some(sequence) = &mut self.sequence {
                    sequence.max_pointers = sequence.max_pointers.max(event.pointer_count);
                    sequence.travel = sequence.travel.max(sequence.start.distance(event.pos));
                }
                None
            }
            PointerPhase::End => {
                // Lifting one of several fingers reports the remaining count
                if event.pointer_count > 1 {
                    return None;
                }
                let sequence = self.sequence.take()?;
                let duration = event.timestamp_ms.saturating_sub(sequence.started_ms);
                let is_tap = sequence.max_pointers >= 2
                    && duration <= self.config.max_tap_duration_ms
                    && sequence.travel <= self.config.max_tap_travel;
                if is_tap {
                    log::debug!("{}-finger tap after {} ms", sequence.max_pointers, duration);
                    Some(Gesture::Tap {
                        pointers: sequence.max_pointers,
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Forgets the sequence in progress
    pub fn reset(&mut self) {
        self.sequence = None;
    }
}
