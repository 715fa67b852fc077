//! Decaying occupancy heat map
//!
//! A fixed grid over the arena records how long the controlled tank has
//! lingered in each cell. Cells near walls and corners are pre-seeded hot and
//! accumulate faster, so the tactical positioner steers bots away from edges
//! and from their own recent camping spots.

use crate::game::constants::heat::*;
use crate::game::state::ArenaBounds;
use crate::util::vec2::Vec2;

/// One cell of the heat grid
#[derive(Debug, Clone, Copy)]
pub struct HeatCell {
    /// World-space center of the cell
    pub center: Vec2,
    /// Heat scalar, always within [0, MAX_HEAT]
    pub heat: f32,
}

/// Decaying spatial grid recording recent occupancy
#[derive(Debug, Clone)]
pub struct HeatMap {
    bounds: ArenaBounds,
    resolution: usize,
    cell_size: f32,
    inv_cell_size: f32,
    cells: Vec<HeatCell>,
}

impl HeatMap {
    /// Build a grid over the arena, pre-seeded hot along walls and corners.
    pub fn new(bounds: ArenaBounds, resolution: usize) -> Self {
        let cell_size = (bounds.max.x - bounds.min.x) / resolution as f32;
        let mut cells = Vec::with_capacity(resolution * resolution);

        for iz in 0..resolution {
            for ix in 0..resolution {
                let center = Vec2::new(
                    bounds.min.x + (ix as f32 + 0.5) * cell_size,
                    bounds.min.z + (iz as f32 + 0.5) * cell_size,
                );
                cells.push(HeatCell {
                    center,
                    heat: seed_heat(&bounds, center),
                });
            }
        }

        Self {
            bounds,
            resolution,
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells,
        }
    }

    /// Advance the map one tick: decay everything, then accumulate heat in
    /// and around the cell the tank occupies.
    pub fn update(&mut self, position: Vec2, dt: f32) {
        self.decay(dt);
        self.accumulate(position, dt);
    }

    /// Linear decay of all cells toward zero
    pub fn decay(&mut self, dt: f32) {
        let amount = DECAY_RATE * dt;
        for cell in &mut self.cells {
            cell.heat = (cell.heat - amount).max(0.0);
        }
    }

    /// Accumulate heat where the tank sits, amplified near walls and corners,
    /// with a linear-falloff share spilling into neighboring cells.
    pub fn accumulate(&mut self, position: Vec2, dt: f32) {
        let Some(occupied) = self.index_of(position) else {
            return;
        };

        let gained = GENERATION_RATE * dt * self.proximity_factor(position);

        self.cells[occupied].heat = (self.cells[occupied].heat + gained).min(MAX_HEAT);

        let occupied_center = self.cells[occupied].center;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if i == occupied {
                continue;
            }
            let dist = cell.center.distance_to(occupied_center);
            if dist < NEIGHBOR_FALLOFF_RADIUS {
                let share = gained * NEIGHBOR_SHARE * (1.0 - dist / NEIGHBOR_FALLOFF_RADIUS);
                cell.heat = (cell.heat + share).min(MAX_HEAT);
            }
        }
    }

    /// Heat at a world position. Out-of-grid lookups read as cold rather
    /// than failing, so boundary rounding can never break a tick.
    pub fn heat_at(&self, position: Vec2) -> f32 {
        self.index_of(position)
            .map(|i| self.cells[i].heat)
            .unwrap_or(0.0)
    }

    /// Hottest cell value currently on the map
    pub fn max_heat(&self) -> f32 {
        self.cells.iter().map(|c| c.heat).fold(0.0, f32::max)
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn index_of(&self, position: Vec2) -> Option<usize> {
        let ix = ((position.x - self.bounds.min.x) * self.inv_cell_size).floor() as i32;
        let iz = ((position.z - self.bounds.min.z) * self.inv_cell_size).floor() as i32;
        let res = self.resolution as i32;
        if ix < 0 || ix >= res || iz < 0 || iz >= res {
            return None;
        }
        Some((iz * res + ix) as usize)
    }

    /// Accumulation multiplier: 1.0 in the open, rising toward EDGE_AMPLIFY
    /// at a wall and CORNER_AMPLIFY at a corner.
    fn proximity_factor(&self, position: Vec2) -> f32 {
        let mut factor: f32 = 1.0;

        let wall_dist = self.bounds.distance_to_nearest_wall(position);
        if wall_dist < EDGE_ZONE {
            factor = factor.max(1.0 + (EDGE_AMPLIFY - 1.0) * (1.0 - wall_dist / EDGE_ZONE));
        }

        let (_, corner_dist) = self.bounds.nearest_corner(position);
        if corner_dist < CORNER_ZONE {
            factor = factor.max(1.0 + (CORNER_AMPLIFY - 1.0) * (1.0 - corner_dist / CORNER_ZONE));
        }

        factor
    }
}

/// Pre-seed heat for a cell center: walls and, more strongly, corners start
/// hot with linear falloff across their zones.
fn seed_heat(bounds: &ArenaBounds, center: Vec2) -> f32 {
    let mut heat = 0.0;

    let wall_dist = bounds.distance_to_nearest_wall(center);
    if wall_dist < EDGE_ZONE {
        heat += WALL_SEED * (1.0 - wall_dist / EDGE_ZONE);
    }

    let (_, corner_dist) = bounds.nearest_corner(center);
    if corner_dist < CORNER_ZONE {
        heat += CORNER_SEED * (1.0 - corner_dist / CORNER_ZONE);
    }

    heat.min(MAX_HEAT)
}
