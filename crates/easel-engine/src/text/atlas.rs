/// Side length of the square glyph atlas, in texels.
pub const ATLAS_SIZE: u32 = 1024;

/// Texels left empty around each glyph.
pub const GLYPH_PADDING: u32 = 1;

/// Shelf allocator for the glyph atlas.
///
/// Glyphs fill a row left to right; a glyph that does not fit starts a new row below
/// the tallest glyph of the current one. Space is never reclaimed.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(size: u32, padding: u32) -> Self {
        Self {
            size,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
        }
    }

    /// Reserves a `w x h` region and returns its top-left corner, or `None` when the
    /// atlas is full.
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * self.padding > self.size || h + 2 * self.padding > self.size {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_y + h + self.padding > self.size {
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(at)
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self::new(ATLAS_SIZE, GLYPH_PADDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_glyph_starts_after_padding() {
        let mut p = ShelfPacker::new(64, 1);
        assert_eq!(p.place(10, 12), Some((1, 1)));
        assert_eq!(p.place(5, 5), Some((12, 1)));
    }

    #[test]
    fn wraps_to_new_shelf_below_tallest_glyph() {
        let mut p = ShelfPacker::new(32, 1);
        assert_eq!(p.place(20, 8), Some((1, 1)));
        assert_eq!(p.place(5, 3), Some((22, 1)));
        // 28 + 10 + 1 > 32: next shelf starts at 1 + 8 + 1
        assert_eq!(p.place(10, 4), Some((1, 10)));
    }

    #[test]
    fn reports_full_atlas() {
        let mut p = ShelfPacker::new(16, 1);
        assert!(p.place(14, 14).is_some());
        assert_eq!(p.place(14, 14), None);
    }

    #[test]
    fn rejects_glyph_larger_than_atlas() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(15, 2), None);
        // Still usable afterwards.
        assert_eq!(p.place(2, 2), Some((1, 1)));
    }
}
