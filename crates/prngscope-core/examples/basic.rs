//! Basic generation example.
//!
//! Generates both sequences for a seed, packs them into bit streams,
//! and prints the first bits of each along with its heat-map shape.
//!
//! Run: `cargo run --example basic`

use prngscope_core::{HeatmapGrid, ResolvedConfig, generate_default_streams};

fn main() {
    let config = ResolvedConfig::new(42, 1000);

    let streams = match generate_default_streams(&config) {
        Ok(streams) => streams,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for stream in &streams {
        let bits = stream.bits.to_bit_string();
        println!("{} ({})", stream.info.label, stream.info.packing);
        println!("  first values: {:?}", &stream.sequence.values()[..8]);
        println!("  bits: {} ({} ones)", stream.bits.len(), stream.bits.ones());
        println!("  head: {}", &bits[..64]);

        let grid = HeatmapGrid::render(&stream.bits);
        println!(
            "  heat map: {side}x{side}, {} padding cells\n",
            grid.padding(),
            side = grid.side()
        );
    }
}
