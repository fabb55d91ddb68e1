use prngscope_core::GeneratedStream;

use super::InputArgs;

pub fn run(input: &InputArgs) {
    let streams = super::generate_or_exit(input);
    print!("{}", render(&streams));
}

fn render(streams: &[GeneratedStream]) -> String {
    let mut out = String::new();
    for stream in streams {
        out.push_str(&format!("{} sequence: {:?}\n", stream.info.label, stream.sequence.values()));
        out.push_str(&format!(
            "{} bit length: {} ({} ones, packing {})\n",
            stream.info.label,
            stream.bits.len(),
            stream.bits.ones(),
            stream.info.packing
        ));
        out.push_str(&format!(
            "{} binary sequence: {}\n\n",
            stream.info.label,
            stream.bits.to_bit_string()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prngscope_core::{ResolvedConfig, generate_default_streams};

    #[test]
    fn test_render_seed_1() {
        let streams = generate_default_streams(&ResolvedConfig::new(1, 10)).unwrap();
        let text = render(&streams);
        assert!(text.starts_with(
            "LCG sequence: [15, 29, 43, 57, 71, 85, 99, 113, 0, 14]\nLCG bit length: 54 ("
        ));
        assert!(text.contains(
            "LCG binary sequence: 111111101101011111001100011110101011100011111000101110\n"
        ));
        assert!(text.contains("Mersenne Twister bit length: 80 ("));
    }
}
