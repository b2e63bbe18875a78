//! Dense occupancy grids for prey lookups
//!
//! One slot per cell, holding at most one agent id. A later `place` into an
//! occupied slot overwrites the earlier reference; the displaced agent stays
//! alive in the population store but cannot be found spatially until it moves
//! again. `clear` empties a slot unconditionally.
//!
//! Radius queries cost O(r²) regardless of population size, which is what makes
//! a hundred thousand grazers tractable.

use crate::core::types::{AgentId, GridPos, Species};
use crate::spatial::grid::Grid;

/// Single-species occupancy grid
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    slots: Grid<Option<AgentId>>,
}

impl OccupancyIndex {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            slots: Grid::new(width, height, None),
        }
    }

    pub fn place(&mut self, pos: GridPos, id: AgentId) {
        self.slots.set(pos, Some(id));
    }

    pub fn clear(&mut self, pos: GridPos) {
        self.slots.set(pos, None);
    }

    pub fn occupant(&self, pos: GridPos) -> Option<AgentId> {
        *self.slots.get(pos)
    }

    /// Occupants of the square window `[x-r, x+r) x [y-r, y+r)`
    ///
    /// Rows are scanned top to bottom, cells left to right; each axis wraps on
    /// its own.
    pub fn query_radius(&self, center: GridPos, radius: u32) -> Vec<AgentId> {
        let mut found = Vec::new();
        self.query_radius_into(center, radius, &mut found);
        found
    }

    /// Same as [`query_radius`](Self::query_radius), appending into a reusable buffer
    pub fn query_radius_into(&self, center: GridPos, radius: u32, out: &mut Vec<AgentId>) {
        let r = radius as i32;
        for dy in -r..r {
            for dx in -r..r {
                if let Some(id) = self.occupant(center.offset(dx, dy)) {
                    out.push(id);
                }
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.cells().iter().filter(|slot| slot.is_some()).count()
    }

    /// Every occupied slot with its cell coordinate
    pub fn iter_occupied(&self) -> impl Iterator<Item = (GridPos, AgentId)> + '_ {
        let width = self.slots.width as usize;
        self.slots
            .cells()
            .iter()
            .enumerate()
            .filter_map(move |(idx, slot)| {
                slot.map(|id| {
                    let pos = GridPos::new((idx % width) as i32, (idx / width) as i32);
                    (pos, id)
                })
            })
    }
}

/// Occupancy grids for every prey species
///
/// Predators are never indexed since nothing queries for them.
#[derive(Debug, Clone)]
pub struct PreyOccupancy {
    sheep: OccupancyIndex,
    goat: OccupancyIndex,
}

impl PreyOccupancy {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            sheep: OccupancyIndex::new(width, height),
            goat: OccupancyIndex::new(width, height),
        }
    }

    pub fn layer(&self, species: Species) -> Option<&OccupancyIndex> {
        match species {
            Species::Sheep => Some(&self.sheep),
            Species::Goat => Some(&self.goat),
            Species::Wolf => None,
        }
    }

    fn layer_mut(&mut self, species: Species) -> Option<&mut OccupancyIndex> {
        match species {
            Species::Sheep => Some(&mut self.sheep),
            Species::Goat => Some(&mut self.goat),
            Species::Wolf => None,
        }
    }

    /// No-op for species that are not indexed
    pub fn place(&mut self, species: Species, pos: GridPos, id: AgentId) {
        if let Some(layer) = self.layer_mut(species) {
            layer.place(pos, id);
        }
    }

    /// No-op for species that are not indexed
    pub fn clear(&mut self, species: Species, pos: GridPos) {
        if let Some(layer) = self.layer_mut(species) {
            layer.clear(pos);
        }
    }

    pub fn query_radius(&self, species: Species, center: GridPos, radius: u32) -> Vec<AgentId> {
        self.layer(species)
            .map(|layer| layer.query_radius(center, radius))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_clear() {
        let mut index = OccupancyIndex::new(10, 10);
        index.place(GridPos::new(2, 3), AgentId(1));
        assert_eq!(index.occupant(GridPos::new(2, 3)), Some(AgentId(1)));

        index.clear(GridPos::new(2, 3));
        assert_eq!(index.occupant(GridPos::new(2, 3)), None);
        assert_eq!(index.occupied_count(), 0);
    }

    #[test]
    fn test_later_place_overwrites() {
        let mut index = OccupancyIndex::new(10, 10);
        index.place(GridPos::new(5, 5), AgentId(1));
        index.place(GridPos::new(5, 5), AgentId(2));
        assert_eq!(index.occupant(GridPos::new(5, 5)), Some(AgentId(2)));
        assert_eq!(index.occupied_count(), 1);
    }

    #[test]
    fn test_query_window_is_half_open() {
        let mut index = OccupancyIndex::new(20, 20);
        let center = GridPos::new(10, 10);
        // x - r and y - r are inside the window
        index.place(GridPos::new(8, 8), AgentId(1));
        // x + r is outside
        index.place(GridPos::new(12, 10), AgentId(2));
        // x + r - 1 is inside
        index.place(GridPos::new(11, 11), AgentId(3));

        let found = index.query_radius(center, 2);
        assert_eq!(found, vec![AgentId(1), AgentId(3)]);
    }

    #[test]
    fn test_query_wraps_axes_independently() {
        let mut index = OccupancyIndex::new(20, 10);
        // Near the top-left corner, query reaches the opposite edges
        index.place(GridPos::new(19, 9), AgentId(1));
        index.place(GridPos::new(19, 1), AgentId(2));
        index.place(GridPos::new(1, 9), AgentId(3));

        let mut found = index.query_radius(GridPos::new(0, 0), 2);
        found.sort();
        assert_eq!(found, vec![AgentId(1), AgentId(2), AgentId(3)]);
    }

    #[test]
    fn test_query_visits_each_cell_once() {
        let mut index = OccupancyIndex::new(12, 12);
        for y in 0..12 {
            for x in 0..12 {
                index.place(GridPos::new(x, y), AgentId((y * 12 + x) as u32));
            }
        }
        let found = index.query_radius(GridPos::new(0, 0), 6);
        assert_eq!(found.len(), 144);
        let mut dedup = found.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 144);
    }

    #[test]
    fn test_iter_occupied_reports_coordinates() {
        let mut index = OccupancyIndex::new(7, 3);
        index.place(GridPos::new(6, 2), AgentId(4));
        let all: Vec<_> = index.iter_occupied().collect();
        assert_eq!(all, vec![(GridPos::new(6, 2), AgentId(4))]);
    }

    #[test]
    fn test_predators_are_not_indexed() {
        let mut prey = PreyOccupancy::new(10, 10);
        prey.place(Species::Wolf, GridPos::new(1, 1), AgentId(1));
        assert!(prey.layer(Species::Wolf).is_none());
        assert!(prey
            .query_radius(Species::Wolf, GridPos::new(1, 1), 2)
            .is_empty());

        prey.place(Species::Goat, GridPos::new(1, 1), AgentId(2));
        assert_eq!(
            prey.query_radius(Species::Goat, GridPos::new(1, 1), 2),
            vec![AgentId(2)]
        );
        assert!(prey
            .query_radius(Species::Sheep, GridPos::new(1, 1), 2)
            .is_empty());
    }
}
