//! Grass field - the renewable resource layer grazers feed on
//!
//! Each cell holds a grass value in `[0, max_growth]`. Regrowth adds a fixed
//! amount to every cell once per tick; grazing takes it away again. Depletion
//! floors at zero, so the bound holds at every point of a tick, not just
//! between ticks.

use rayon::prelude::*;

use crate::core::config::FieldConfig;
use crate::core::types::GridPos;
use crate::spatial::grid::Grid;

#[derive(Debug, Clone)]
pub struct ResourceField {
    grid: Grid<f32>,
    initial_growth: f32,
    max_growth: f32,
    regrowth_rate: f32,
    parallel_threshold: usize,
}

impl ResourceField {
    /// Create a field with every cell at full initial growth
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height, config.initial_growth),
            initial_growth: config.initial_growth,
            max_growth: config.max_growth,
            regrowth_rate: config.regrowth_rate,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Reset every cell to the initial growth value
    pub fn init(&mut self) {
        let initial = self.initial_growth;
        self.grid.cells_mut().iter_mut().for_each(|g| *g = initial);
    }

    /// One regrowth pass over the whole field
    ///
    /// Every cell moves by `regrowth_rate` towards the cap, independently of
    /// its neighbours, so the pass is safe to split across threads.
    pub fn regrow(&mut self) {
        let rate = self.regrowth_rate;
        let cap = self.max_growth;
        let cells = self.grid.cells_mut();
        if cells.len() >= self.parallel_threshold {
            cells.par_iter_mut().for_each(|g| *g = (*g + rate).min(cap));
        } else {
            cells.iter_mut().for_each(|g| *g = (*g + rate).min(cap));
        }
    }

    /// Grass at a cell; coordinates wrap
    #[inline]
    pub fn sample(&self, pos: GridPos) -> f32 {
        *self.grid.get(pos)
    }

    /// Remove up to `amount` of grass from a cell, never going below zero
    #[inline]
    pub fn deplete(&mut self, pos: GridPos, amount: f32) {
        let g = self.grid.get_mut(pos);
        *g = (*g - amount).max(0.0);
    }

    /// Overwrite a cell, clamped into `[0, max_growth]`
    pub fn set(&mut self, pos: GridPos, value: f32) {
        self.grid.set(pos, value.clamp(0.0, self.max_growth));
    }

    /// Wrap a coordinate onto this field
    #[inline]
    pub fn wrap(&self, pos: GridPos) -> GridPos {
        self.grid.wrap_pos(pos)
    }

    /// Grass as a fraction of the cap, for colouring a cell
    pub fn intensity(&self, pos: GridPos) -> f32 {
        if self.max_growth > 0.0 {
            self.sample(pos) / self.max_growth
        } else {
            0.0
        }
    }

    /// Read-only rows for renderers
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.grid.rows()
    }

    pub fn cells(&self) -> &[f32] {
        self.grid.cells()
    }

    pub fn total(&self) -> f64 {
        self.grid.cells().iter().map(|&g| g as f64).sum()
    }

    pub fn mean(&self) -> f64 {
        self.total() / self.grid.len() as f64
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn max_growth(&self) -> f32 {
        self.max_growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> FieldConfig {
        FieldConfig {
            width,
            height,
            initial_growth: 100.0,
            max_growth: 255.0,
            regrowth_rate: 1.0,
            ..FieldConfig::default()
        }
    }

    #[test]
    fn test_field_starts_at_initial_growth() {
        let field = ResourceField::new(&config(8, 4));
        assert!(field.cells().iter().all(|&g| g == 100.0));
        assert_eq!(field.width(), 8);
        assert_eq!(field.height(), 4);
    }

    #[test]
    fn test_regrow_adds_rate_up_to_cap() {
        let mut cfg = config(4, 4);
        cfg.initial_growth = 254.5;
        let mut field = ResourceField::new(&cfg);
        field.regrow();
        assert!(field.cells().iter().all(|&g| g == 255.0));
        field.regrow();
        assert!(field.cells().iter().all(|&g| g == 255.0));
    }

    #[test]
    fn test_parallel_and_serial_regrowth_agree() {
        let mut serial_cfg = config(64, 32);
        serial_cfg.parallel_threshold = usize::MAX;
        let mut parallel_cfg = config(64, 32);
        parallel_cfg.parallel_threshold = 0;

        let mut serial = ResourceField::new(&serial_cfg);
        let mut parallel = ResourceField::new(&parallel_cfg);
        for (i, pos) in [(0, 0), (5, 7), (63, 31)].into_iter().enumerate() {
            let p = GridPos::new(pos.0, pos.1);
            serial.deplete(p, 30.0 * (i as f32 + 1.0));
            parallel.deplete(p, 30.0 * (i as f32 + 1.0));
        }
        serial.regrow();
        parallel.regrow();
        assert_eq!(serial.cells(), parallel.cells());
    }

    #[test]
    fn test_deplete_floors_at_zero() {
        let mut field = ResourceField::new(&config(4, 4));
        field.deplete(GridPos::new(1, 1), 40.0);
        assert_eq!(field.sample(GridPos::new(1, 1)), 60.0);
        field.deplete(GridPos::new(1, 1), 1000.0);
        assert_eq!(field.sample(GridPos::new(1, 1)), 0.0);
    }

    #[test]
    fn test_sample_and_deplete_wrap() {
        let mut field = ResourceField::new(&config(4, 4));
        field.deplete(GridPos::new(-1, 4), 10.0);
        assert_eq!(field.sample(GridPos::new(3, 0)), 90.0);
    }

    #[test]
    fn test_init_restores_growth() {
        let mut field = ResourceField::new(&config(4, 4));
        field.deplete(GridPos::new(0, 0), 50.0);
        field.init();
        assert_eq!(field.sample(GridPos::new(0, 0)), 100.0);
    }

    #[test]
    fn test_intensity_and_totals() {
        let mut field = ResourceField::new(&config(2, 2));
        field.set(GridPos::new(0, 0), 255.0);
        assert_eq!(field.intensity(GridPos::new(0, 0)), 1.0);
        assert!((field.total() - 555.0).abs() < 1e-6);
        assert!((field.mean() - 138.75).abs() < 1e-6);
    }
}
