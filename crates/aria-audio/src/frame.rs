/// One synthesized unit of audio: mono f32 samples at a fixed sample rate.
///
/// Produced by a single inference call and immutable once handed to the
/// sinks.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioFrame {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u128 * 1000 / self.sample_rate as u128) as u64
    }

    /// Wire representation: little-endian 16-bit PCM bytes.
    pub fn to_pcm16_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for sample in f32_to_pcm16(&self.samples) {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

/// Symmetric mapping: -1.0 -> -32768, +1.0 -> 32767, out-of-range clamped.
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&x| {
            let x = x.clamp(-1.0, 1.0);
            if x >= 0.0 {
                (x * 32767.0).round() as i16
            } else {
                (x * 32768.0).round() as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm16_conversion_clamps() {
        let pcm = f32_to_pcm16(&[-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0]);
        assert_eq!(pcm[0], -32768);
        assert_eq!(pcm[1], -32768);
        assert_eq!(pcm[3], 0);
        assert_eq!(pcm[5], 32767);
        assert_eq!(pcm[6], 32767);
    }

    #[test]
    fn wire_bytes_are_little_endian() {
        let frame = AudioFrame::new(vec![0.0, 1.0], 32_000);
        let bytes = frame.to_pcm16_bytes();
        assert_eq!(bytes, vec![0x00, 0x00, 0xFF, 0x7F]);
    }

    #[test]
    fn duration_follows_sample_rate() {
        let frame = AudioFrame::new(vec![0.0; 32_000], 32_000);
        assert_eq!(frame.duration_ms(), 1000);
        let half = AudioFrame::new(vec![0.0; 16_000], 32_000);
        assert_eq!(half.duration_ms(), 500);
    }
}
