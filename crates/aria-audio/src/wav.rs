use std::path::Path;

use aria_foundation::AudioError;

use crate::frame::f32_to_pcm16;

/// Write mono f32 samples as a 16-bit PCM WAV file, overwriting any existing
/// file at `path`.
pub fn write_wav_mono16(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| AudioError::Wav(e.to_string()))?;
    for sample in f32_to_pcm16(samples) {
        writer
            .write_sample(sample)
            .map_err(|e| AudioError::Wav(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioError::Wav(e.to_string()))?;
    tracing::debug!(
        samples = samples.len(),
        "Wrote {} at {} Hz",
        path.display(),
        sample_rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_file_is_readable_and_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let samples = [0.0f32, 0.5, -0.5, 1.0, -1.0];
        write_wav_mono16(&path, 32_000, &samples).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 32_000);
        assert_eq!(spec.bits_per_sample, 16);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, f32_to_pcm16(&samples));
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        write_wav_mono16(&path, 32_000, &[0.0; 100]).unwrap();
        write_wav_mono16(&path, 32_000, &[0.0; 10]).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 10);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let err = write_wav_mono16(Path::new("/nonexistent/dir/out.wav"), 32_000, &[0.0]);
        assert!(matches!(err, Err(AudioError::Wav(_))));
    }
}
