use super::backend::AudioChunk;
use anyhow::{Context, Result};
use std::io::Cursor;

/// Encode accumulated capture chunks into a single in-memory WAV artifact.
///
/// Chunks are written in the order given, which is their arrival order; no
/// chunk is dropped or reordered. An empty chunk list still yields a valid
/// (header-only) WAV file, so a recording stopped immediately after start
/// produces a well-formed artifact.
pub fn encode_wav(chunks: &[AudioChunk], fallback_sample_rate: u32) -> Result<Vec<u8>> {
    let sample_rate = chunks
        .first()
        .map(|c| c.sample_rate)
        .unwrap_or(fallback_sample_rate);

    let spec = hound::WavSpec {
        channels: 1, // Capture backends downmix to mono
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("failed to create WAV writer")?;

        for chunk in chunks {
            for &sample in &chunk.samples {
                writer
                    .write_sample(sample)
                    .context("failed to write WAV sample")?;
            }
        }

        writer.finalize().context("failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}
