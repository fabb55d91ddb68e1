//! # prngscope-core
//!
//! Deterministic sequence generation and bit packing for randomness testing.
//!
//! `prngscope-core` produces integer sequences from two generators, a weak
//! linear congruential generator and the MT19937 Mersenne Twister, and turns
//! them into flat bit streams ready for a statistical test battery.
//!
//! ## Quick Start
//!
//! ```
//! use prngscope_core::{ResolvedConfig, generate_default_streams};
//!
//! let streams = generate_default_streams(&ResolvedConfig::new(42, 10)).unwrap();
//! assert_eq!(streams[0].info.label, "LCG");
//! assert_eq!(streams[0].sequence.values()[0], 56);
//! assert_eq!(streams[1].bits.len(), 80);
//! ```
//!
//! ## Architecture
//!
//! Config → Generator → Sequence → pack → BitStream → (test battery, heat map)
//!
//! Every generator implements the [`Generator`] trait. A [`Sequence`] carries
//! its generator's [`BitPacking`], so [`pack`] needs no other context. The
//! [`HeatmapGrid`] is a read-only view over a finished [`BitStream`].

pub mod bits;
pub mod config;
pub mod error;
pub mod generator;
pub mod generators;
pub mod heatmap;
pub mod pipeline;

pub use bits::{BitPacking, BitStream, bit_width, pack};
pub use config::{ResolvedConfig, RunConfig, parse_integer};
pub use error::{Error, Result};
pub use generator::{Generator, GeneratorInfo, GeneratorKind, Sequence};
pub use generators::{LcgGenerator, LcgParams, MersenneGenerator, default_generators};
pub use heatmap::HeatmapGrid;
pub use pipeline::{GeneratedStream, generate_default_streams, generate_stream, generate_streams};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
