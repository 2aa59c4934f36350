//! Demo synthesis backend
//!
//! Deterministic stand-in for a neural backend so the assistant can be run
//! end-to-end without model files: each unit becomes a short sine tone whose
//! pitch and length follow the unit's text. Swap in a real
//! `SynthesisBackend` implementation to produce speech.

use std::f32::consts::PI;

use aria_tts::{BackendError, CancelFlag, ModelHandle, ReferenceAudio, SynthesisBackend};

pub struct ToneBackend {
    sample_rate: u32,
}

impl ToneBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl SynthesisBackend for ToneBackend {
    fn run(
        &self,
        unit: &str,
        _reference: &ReferenceAudio,
        _model: &ModelHandle,
        cancel: &CancelFlag,
    ) -> Result<Option<Vec<f32>>, BackendError> {
        let chars = unit.chars().filter(|c| !c.is_whitespace()).count();
        if chars == 0 {
            return Ok(None);
        }

        let duration_ms = (chars as u64 * 80).min(2_000);
        let total = (u64::from(self.sample_rate) * duration_ms / 1_000) as usize;
        let freq = 220.0 + (chars % 8) as f32 * 55.0;

        let mut samples = Vec::with_capacity(total);
        for i in 0..total {
            if i % 1_024 == 0 && cancel.is_set() {
                return Err(BackendError::Cancelled);
            }
            let t = i as f32 / self.sample_rate as f32;
            samples.push((2.0 * PI * freq * t).sin() * 0.3);
        }
        Ok(Some(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn run(unit: &str) -> Result<Option<Vec<f32>>, BackendError> {
        let backend = ToneBackend::new(32_000);
        backend.run(
            unit,
            &ReferenceAudio::new("prompt.wav", "hello"),
            &(Arc::new(()) as ModelHandle),
            &CancelFlag::new(),
        )
    }

    #[test]
    fn tone_length_follows_text_length() {
        let short = run("hi").unwrap().unwrap();
        let long = run("a considerably longer sentence").unwrap().unwrap();
        assert!(long.len() > short.len());
        // 2 chars * 80 ms at 32 kHz.
        assert_eq!(short.len(), 5_120);
    }

    #[test]
    fn whitespace_only_units_produce_nothing() {
        assert!(run("   ").unwrap().is_none());
    }

    #[test]
    fn cancellation_aborts_generation() {
        let backend = ToneBackend::new(32_000);
        let cancel = CancelFlag::new();
        cancel.set();
        let result = backend.run(
            "some text",
            &ReferenceAudio::new("prompt.wav", "hello"),
            &(Arc::new(()) as ModelHandle),
            &cancel,
        );
        assert!(matches!(result, Err(BackendError::Cancelled)));
    }

    #[test]
    fn samples_stay_in_range() {
        let samples = run("range check").unwrap().unwrap();
        assert!(samples.iter().all(|s| s.abs() <= 0.3 + f32::EPSILON));
    }
}
