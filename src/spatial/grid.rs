//! Generic dense grid on a torus
//!
//! Every coordinate that reaches a grid goes through [`wrap`] first, so the
//! index helpers only ever see in-range cells. An out-of-range index after
//! wrapping is a programming error and trips a debug assertion.

use crate::core::types::GridPos;

/// Wrap a coordinate onto `[0, extent)`
///
/// Idempotent for in-range values; `extent` maps to `0` and `-1` to `extent - 1`.
#[inline]
pub fn wrap(v: i32, extent: u32) -> u32 {
    debug_assert!(extent > 0, "cannot wrap onto an empty axis");
    v.rem_euclid(extent as i32) as u32
}

/// Generic 2D grid, row-major, with toroidal addressing
#[derive(Debug, Clone)]
pub struct Grid<T: Clone> {
    pub width: u32,
    pub height: u32,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap both axes independently
    #[inline]
    pub fn wrap_pos(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            wrap(pos.x, self.width) as i32,
            wrap(pos.y, self.height) as i32,
        )
    }

    /// Linear index of a cell that is already in range
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Linear index for any coordinate, wrapping first
    #[inline]
    pub fn wrapped_index(&self, pos: GridPos) -> usize {
        self.index(wrap(pos.x, self.width), wrap(pos.y, self.height))
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> &T {
        &self.data[self.wrapped_index(pos)]
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> &mut T {
        let idx = self.wrapped_index(pos);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) {
        let idx = self.wrapped_index(pos);
        self.data[idx] = value;
    }

    pub fn cells(&self) -> &[T] {
        &self.data
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Rows top to bottom, each `width` long
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.width as usize)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
