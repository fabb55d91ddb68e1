//! Square density grids for visualizing bit streams.
//!
//! A stream of `L` bits becomes a `side x side` grid with
//! `side = ceil(sqrt(L))`. The stream is zero-padded at the end up to
//! `side²` cells and laid out row-major. The grid is a read-only view built
//! from a borrowed stream; nothing flows back into the pipeline.

use crate::bits::BitStream;

/// Row-major square grid of 0/1 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapGrid {
    side: usize,
    source_len: usize,
    cells: Vec<u8>,
}

/// Smallest `s` with `s * s >= n`.
fn ceil_sqrt(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as usize;
    while s * s < n {
        s += 1;
    }
    while s > 0 && (s - 1) * (s - 1) >= n {
        s -= 1;
    }
    s
}

impl HeatmapGrid {
    /// Reshape `stream` into a square grid, zero-padding the tail.
    pub fn render(stream: &BitStream) -> Self {
        let side = ceil_sqrt(stream.len());
        let mut cells = stream.as_bits().to_vec();
        cells.resize(side * side, 0);
        Self {
            side,
            source_len: stream.len(),
            cells,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of zero cells appended after the stream.
    pub fn padding(&self) -> usize {
        self.cells.len() - self.source_len
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.side && col < self.side {
            Some(self.cells[row * self.side + col])
        } else {
            None
        }
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks(0) panics, so an empty grid yields no rows.
        self.cells.chunks(self.side.max(1)).take(self.side)
    }

    /// Mean cell density over a `rows x cols` block partition, in `[0, 1]`.
    ///
    /// The target size is clamped to the grid side, so a small grid is
    /// returned cell for cell.
    pub fn downsample(&self, rows: usize, cols: usize) -> Vec<Vec<f64>> {
        if self.side == 0 || rows == 0 || cols == 0 {
            return Vec::new();
        }
        let rows = rows.min(self.side);
        let cols = cols.min(self.side);
        (0..rows)
            .map(|r| {
                let r0 = r * self.side / rows;
                let r1 = ((r + 1) * self.side / rows).max(r0 + 1);
                (0..cols)
                    .map(|c| {
                        let c0 = c * self.side / cols;
                        let c1 = ((c + 1) * self.side / cols).max(c0 + 1);
                        let mut ones = 0usize;
                        for row in r0..r1 {
                            let line = &self.cells[row * self.side..(row + 1) * self.side];
                            ones += line[c0..c1].iter().map(|&b| b as usize).sum::<usize>();
                        }
                        ones as f64 / ((r1 - r0) * (c1 - c0)) as f64
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(n: usize) -> BitStream {
        BitStream::from_bits((0..n).map(|_| 1u8))
    }

    #[test]
    fn test_ceil_sqrt() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(ceil_sqrt(5), 3);
        assert_eq!(ceil_sqrt(10_000), 100);
        assert_eq!(ceil_sqrt(10_001), 101);
    }

    #[test]
    fn test_shape_and_padding() {
        for len in [1usize, 2, 3, 4, 5, 17, 54, 62, 80, 1000] {
            let grid = HeatmapGrid::render(&stream(len));
            let side = grid.side();
            assert_eq!(side, (len as f64).sqrt().ceil() as usize);
            assert_eq!(grid.cells().len(), side * side);
            assert_eq!(grid.padding(), side * side - len);
            assert!(grid.cells()[len..].iter().all(|&c| c == 0));
            assert!(grid.cells()[..len].iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn test_empty_stream() {
        let grid = HeatmapGrid::render(&BitStream::default());
        assert_eq!(grid.side(), 0);
        assert_eq!(grid.padding(), 0);
        assert_eq!(grid.rows().count(), 0);
        assert!(grid.downsample(10, 10).is_empty());
    }

    #[test]
    fn test_row_major_layout() {
        let grid = HeatmapGrid::render(&BitStream::from_bits([1, 0, 0, 1, 1]));
        assert_eq!(grid.side(), 3);
        let rows: Vec<&[u8]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1u8, 0, 0][..], &[1u8, 1, 0][..], &[0u8, 0, 0][..]]);
        assert_eq!(grid.get(1, 1), Some(1));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_downsample_density() {
        // 4x4 grid: top half ones, bottom half zeros.
        let bits: Vec<u8> = (0..16).map(|i| u8::from(i < 8)).collect();
        let grid = HeatmapGrid::render(&BitStream::from_bits(bits));
        let d = grid.downsample(2, 2);
        assert_eq!(d, vec![vec![1.0, 1.0], vec![0.0, 0.0]]);
        let d = grid.downsample(1, 1);
        assert_eq!(d, vec![vec![0.5]]);
    }

    #[test]
    fn test_downsample_clamps_to_side() {
        let grid = HeatmapGrid::render(&stream(9));
        let d = grid.downsample(50, 50);
        assert_eq!(d.len(), 3);
        assert!(d.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_render_does_not_modify_stream() {
        let s = BitStream::from_bits([1, 0, 1]);
        let before = s.clone();
        let _ = HeatmapGrid::render(&s);
        assert_eq!(s, before);
    }
}
