use std::ops::{Index, IndexMut};

use crate::units::{Height, Width};


/// The wall segments anchored at one corner of the grid: the horizontal segment running east
/// from the corner and the vertical segment running south from it.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct WallFlags {
    bits: u8,
}

impl WallFlags {
    pub const NONE: WallFlags = WallFlags { bits: 0 };
    pub const HORIZONTAL: WallFlags = WallFlags { bits: 0b01 };
    pub const VERTICAL: WallFlags = WallFlags { bits: 0b10 };
    pub const BOTH: WallFlags = WallFlags { bits: 0b11 };

    #[inline]
    pub fn contains(self, flags: WallFlags) -> bool {
        self.bits & flags.bits == flags.bits
    }

    #[inline]
    pub fn set(&mut self, flags: WallFlags, present: bool) {
        if present {
            self.bits |= flags.bits;
        } else {
            self.bits &= !flags.bits;
        }
    }
}

/// Dense (width + 1) * (height + 1) array of corners. The extra row and column pad the south
/// and east boundaries so every cell has all four of its corners.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct WallMap {
    corners: Vec<WallFlags>,
    corner_columns: usize,
    corner_rows: usize,
}

impl WallMap {
    pub fn new(width: Width, height: Height) -> WallMap {
        let (Width(w), Height(h)) = (width, height);
        let corner_columns = w + 1;
        let corner_rows = h + 1;
        WallMap {
            corners: vec![WallFlags::NONE; corner_columns * corner_rows],
            corner_columns,
            corner_rows,
        }
    }

    pub fn fill(&mut self, flags: WallFlags) {
        for corner in self.corners.iter_mut() {
            *corner = flags;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<WallFlags> {
        self.corner_index(x, y).map(|index| self.corners[index])
    }

    #[inline]
    fn corner_index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.corner_columns && y < self.corner_rows {
            Some(y * self.corner_columns + x)
        } else {
            None
        }
    }

    #[inline]
    fn checked_corner_index(&self, x: usize, y: usize) -> usize {
        self.corner_index(x, y).unwrap_or_else(|| {
            panic!("corner ({}, {}) outside {}x{} wall map",
                   x,
                   y,
                   self.corner_columns,
                   self.corner_rows)
        })
    }
}

impl Index<(usize, usize)> for WallMap {
    type Output = WallFlags;

    fn index(&self, (x, y): (usize, usize)) -> &WallFlags {
        let index = self.checked_corner_index(x, y);
        &self.corners[index]
    }
}

impl IndexMut<(usize, usize)> for WallMap {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut WallFlags {
        let index = self.checked_corner_index(x, y);
        &mut self.corners[index]
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn flags() {
        let mut flags = WallFlags::NONE;
        assert!(!flags.contains(WallFlags::HORIZONTAL));
        flags.set(WallFlags::VERTICAL, true);
        assert!(flags.contains(WallFlags::VERTICAL));
        assert!(!flags.contains(WallFlags::HORIZONTAL));
        assert!(!flags.contains(WallFlags::BOTH));
        flags.set(WallFlags::HORIZONTAL, true);
        assert_eq!(flags, WallFlags::BOTH);
        flags.set(WallFlags::VERTICAL, false);
        assert_eq!(flags, WallFlags::HORIZONTAL);
    }

    #[test]
    fn corner_grid_is_padded() {
        let map = WallMap::new(Width(3), Height(2));
        assert_eq!(map.get(3, 2), Some(WallFlags::NONE));
        assert_eq!(map.get(4, 0), None);
        assert_eq!(map.get(0, 3), None);
    }

    #[test]
    fn fill_and_index() {
        let mut map = WallMap::new(Width(2), Height(2));
        map.fill(WallFlags::BOTH);
        assert_eq!(map[(2, 2)], WallFlags::BOTH);

        map[(1, 1)].set(WallFlags::HORIZONTAL, false);
        assert_eq!(map[(1, 1)], WallFlags::VERTICAL);
        assert_eq!(map[(0, 1)], WallFlags::BOTH);
    }

    #[test]
    fn zero_sized_map_still_has_a_corner_row() {
        let map = WallMap::new(Width(0), Height(0));
        assert_eq!(map.get(0, 0), Some(WallFlags::NONE));
        assert_eq!(map.get(1, 0), None);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let map = WallMap::new(Width(1), Height(1));
        let _flags = map[(2, 0)];
    }
}
