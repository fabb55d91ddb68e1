//! Generation front half of a run: seed and size in, packed bit streams out.
//!
//! Everything here is pure. The same [`ResolvedConfig`] always yields the same
//! streams.

use crate::bits::{BitStream, pack};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::generator::{Generator, GeneratorInfo, Sequence};
use crate::generators::default_generators;

/// One generator's output for a run.
#[derive(Debug, Clone)]
pub struct GeneratedStream {
    pub info: GeneratorInfo,
    pub sequence: Sequence,
    pub bits: BitStream,
}

/// Generate and pack one sequence.
pub fn generate_stream(generator: &dyn Generator, seed: i64, size: usize) -> Result<GeneratedStream> {
    let sequence = generator.generate(seed, size)?;
    let bits = pack(&sequence)?;
    log::debug!(
        "{}: {} values -> {} bits",
        generator.label(),
        sequence.len(),
        bits.len()
    );
    Ok(GeneratedStream {
        info: generator.info().clone(),
        sequence,
        bits,
    })
}

/// Run every generator in order against the same seed and size.
pub fn generate_streams(
    config: &ResolvedConfig,
    generators: &[Box<dyn Generator>],
) -> Result<Vec<GeneratedStream>> {
    generators
        .iter()
        .map(|g| generate_stream(g.as_ref(), config.seed, config.size))
        .collect()
}

/// Generate the LCG and Mersenne Twister streams for `config`.
pub fn generate_default_streams(config: &ResolvedConfig) -> Result<Vec<GeneratedStream>> {
    generate_streams(config, &default_generators(config.lcg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bit_width;
    use crate::error::Error;

    #[test]
    fn test_default_streams_seed_42() {
        let streams = generate_default_streams(&ResolvedConfig::new(42, 10)).unwrap();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].info.label, "LCG");
        assert_eq!(streams[0].sequence.len(), 10);
        assert_eq!(streams[0].bits.len(), 62);
        assert_eq!(streams[1].info.label, "Mersenne Twister");
        assert_eq!(streams[1].bits.len(), 80);
    }

    #[test]
    fn test_lcg_length_is_sum_of_widths() {
        for size in [0usize, 1, 5, 33, 500] {
            let streams = generate_default_streams(&ResolvedConfig::new(9, size)).unwrap();
            let lcg = &streams[0];
            let expected: usize = lcg
                .sequence
                .values()
                .iter()
                .map(|&v| bit_width(v, lcg.info.packing).unwrap())
                .sum();
            assert_eq!(lcg.bits.len(), expected);
            assert_eq!(streams[1].bits.len(), 8 * size);
        }
    }

    #[test]
    fn test_zero_size_gives_empty_streams() {
        let streams = generate_default_streams(&ResolvedConfig::new(1, 0)).unwrap();
        assert!(streams.iter().all(|s| s.bits.is_empty()));
    }

    #[test]
    fn test_negative_seed_fails_on_mersenne() {
        let err = generate_default_streams(&ResolvedConfig::new(-1, 4)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
