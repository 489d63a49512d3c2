//! Audio Test Fixtures
//!
//! Programmatically generated WAV clips, so tests carry no binary files.
//!
//! Canonical clips are 16 kHz, 16-bit signed PCM, mono. The stereo 44.1 kHz
//! generator produces the kind of phone recording the normalizer must fold
//! down.

use std::f32::consts::PI;
use std::io::Cursor;

/// Canonical sample rate for recognition
pub const SAMPLE_RATE: u32 = 16000;

/// Sample rate of typical phone recordings
pub const PHONE_SAMPLE_RATE: u32 = 44100;

pub const MS_100: usize = 1600; // 100ms at 16kHz
pub const SECOND: usize = 16000; // 1 second at 16kHz

fn wav_spec(channels: u16, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode interleaved samples as an in-memory WAV file.
pub fn encode_wav(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec(channels, sample_rate))
            .expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Write interleaved samples as a WAV file on disk.
pub fn write_wav(path: &std::path::Path, samples: &[i16], channels: u16, sample_rate: u32) {
    let mut writer =
        hound::WavWriter::create(path, wav_spec(channels, sample_rate)).expect("wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Generate silence (zeros)
pub fn generate_silence(duration_samples: usize) -> Vec<i16> {
    vec![0i16; duration_samples]
}

/// Generate a sine wave tone at `sample_rate`
pub fn generate_sine_wave(
    duration_samples: usize,
    frequency: f32,
    amplitude: f32,
    sample_rate: u32,
) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    (0..duration_samples)
        .map(|i| ((angular_freq * i as f32).sin() * max_amplitude) as i16)
        .collect()
}

/// One second of canonical silence, as WAV bytes
pub fn canonical_silence_wav() -> Vec<u8> {
    encode_wav(&generate_silence(SECOND), 1, SAMPLE_RATE)
}

/// Stereo 44.1 kHz tone, as WAV bytes
pub fn stereo_phone_wav(duration_ms: usize) -> Vec<u8> {
    let frames = PHONE_SAMPLE_RATE as usize * duration_ms / 1000;
    let mono = generate_sine_wave(frames, 440.0, 0.3, PHONE_SAMPLE_RATE);
    let interleaved: Vec<i16> = mono.iter().flat_map(|&s| [s, s]).collect();
    encode_wav(&interleaved, 2, PHONE_SAMPLE_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_silence_header() {
        let bytes = canonical_silence_wav();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.duration() as usize, SECOND);
    }

    #[test]
    fn test_stereo_phone_wav_header() {
        let bytes = stereo_phone_wav(100);
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, PHONE_SAMPLE_RATE);
    }
}
