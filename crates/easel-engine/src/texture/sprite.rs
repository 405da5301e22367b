/// Sprite-sheet grid: `columns x rows` equally sized cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteGrid {
    pub columns: u32,
    pub rows: u32,
}

impl SpriteGrid {
    /// Returns `None` when either dimension is zero.
    pub fn new(columns: u32, rows: u32) -> Option<Self> {
        (columns > 0 && rows > 0).then_some(Self { columns, rows })
    }

    /// Size of one cell in UV units.
    #[inline]
    pub fn cell_uv(&self) -> [f32; 2] {
        [1.0 / self.columns as f32, 1.0 / self.rows as f32]
    }

    /// Size of one cell in texels for a `width x height` image.
    #[inline]
    pub fn cell_size(&self, width: u32, height: u32) -> [f32; 2] {
        [
            width as f32 / self.columns as f32,
            height as f32 / self.rows as f32,
        ]
    }

    /// Remaps `base` UVs (covering the whole image) into cell `(ix, iy)`.
    ///
    /// `uv' = base * cell + cell * index` per axis. Indices past the grid are not
    /// clamped; with repeat addressing they wrap around the sheet.
    pub fn remap(&self, base: &[[f32; 2]], ix: u32, iy: u32) -> Vec<[f32; 2]> {
        let [cw, ch] = self.cell_uv();
        base.iter()
            .map(|&[u, v]| [u * cw + cw * ix as f32, v * ch + ch * iy as f32])
            .collect()
    }
}

/// Cell selection over a fixed set of base UVs.
///
/// Every selection is remapped from the base captured at construction, so switching
/// cells never compounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    grid: SpriteGrid,
    base: Vec<[f32; 2]>,
    cell: (u32, u32),
}

impl SpriteSheet {
    /// Starts at cell `(0, 0)`.
    pub fn new(grid: SpriteGrid, base: Vec<[f32; 2]>) -> Self {
        Self {
            grid,
            base,
            cell: (0, 0),
        }
    }

    /// Selects cell `(ix, iy)` and returns the UVs to upload.
    pub fn select(&mut self, ix: u32, iy: u32) -> Vec<[f32; 2]> {
        self.cell = (ix, iy);
        self.uv()
    }

    /// UVs of the selected cell.
    pub fn uv(&self) -> Vec<[f32; 2]> {
        self.grid.remap(&self.base, self.cell.0, self.cell.1)
    }

    #[inline]
    pub fn cell(&self) -> (u32, u32) {
        self.cell
    }

    #[inline]
    pub fn grid(&self) -> SpriteGrid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

    fn close(a: &[[f32; 2]], b: &[[f32; 2]]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| (x[0] - y[0]).abs() < 1e-6 && (x[1] - y[1]).abs() < 1e-6)
    }

    #[test]
    fn zero_split_is_rejected() {
        assert!(SpriteGrid::new(0, 1).is_none());
        assert!(SpriteGrid::new(3, 0).is_none());
        assert!(SpriteGrid::new(1, 1).is_some());
    }

    #[test]
    fn single_cell_keeps_base_uvs() {
        let grid = SpriteGrid::new(1, 1).unwrap();
        assert!(close(&grid.remap(&QUAD, 0, 0), &QUAD));
    }

    #[test]
    fn selects_cell_in_four_by_two_sheet() {
        let grid = SpriteGrid::new(4, 2).unwrap();
        let uv = grid.remap(&QUAD, 2, 1);
        assert!(close(
            &uv,
            &[[0.5, 1.0], [0.75, 1.0], [0.5, 0.5], [0.75, 0.5]]
        ));
    }

    #[test]
    fn initial_cell_is_origin() {
        let sheet = SpriteSheet::new(SpriteGrid::new(2, 2).unwrap(), QUAD.to_vec());
        assert_eq!(sheet.cell(), (0, 0));
        assert!(close(
            &sheet.uv(),
            &[[0.0, 0.5], [0.5, 0.5], [0.0, 0.0], [0.5, 0.0]]
        ));
    }

    #[test]
    fn reselecting_does_not_compound() {
        let grid = SpriteGrid::new(2, 2).unwrap();
        let fresh = SpriteSheet::new(grid, QUAD.to_vec()).select(1, 1);

        let mut sheet = SpriteSheet::new(grid, QUAD.to_vec());
        sheet.select(1, 1);
        sheet.select(0, 0);
        let again = sheet.select(1, 1);

        assert_eq!(sheet.cell(), (1, 1));
        assert!(close(&again, &fresh));
        assert!(close(
            &again,
            &[[0.5, 1.0], [1.0, 1.0], [0.5, 0.5], [1.0, 0.5]]
        ));
    }

    #[test]
    fn cell_size_in_texels() {
        let grid = SpriteGrid::new(4, 2).unwrap();
        assert_eq!(grid.cell_size(256, 64), [64.0, 32.0]);
    }
}
