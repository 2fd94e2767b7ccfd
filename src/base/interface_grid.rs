use super::Grid;
use crate::StrError;

/// Holds the lower-dimensional grid representing one fracture
///
/// Each interface cell represents a fracture patch and couples exactly one
/// low-side and one high-side bulk cell; the map is fixed for the lifetime
/// of the grid. The unit normal of every interface cell points from the
/// low side to the high side, and the displacement jump is defined as
/// `[u] = u_high - u_low`. Swapping the sides flips the sign of the jump,
/// so the side convention is checked against the bulk geometry.
pub struct InterfaceGrid {
    /// Maps each interface cell to its (low, high) bulk neighbor cells
    pub cell_map: Vec<(usize, usize)>,

    /// Interface cell centers
    pub centers: Vec<[f64; 2]>,

    /// Unit normals, low → high
    pub normals: Vec<[f64; 2]>,

    /// Interface cell measures (length in 2D)
    pub areas: Vec<f64>,

    /// Pairs of interface cells connected along the fracture
    pub neighbors: Vec<(usize, usize)>,
}

impl InterfaceGrid {
    /// Returns the number of interface cells
    pub fn num_cells(&self) -> usize {
        self.cell_map.len()
    }

    /// Returns the unit tangent of an interface cell (normal rotated by 90°)
    pub fn tangent(&self, cell: usize) -> [f64; 2] {
        let n = self.normals[cell];
        [-n[1], n[0]]
    }

    /// Checks the topology and the low/high side convention against the bulk grid
    pub fn validate(&self, grid: &Grid) -> Result<(), StrError> {
        let num_cells = self.cell_map.len();
        if num_cells == 0 {
            return Err("interface grid must have at least one cell");
        }
        if self.centers.len() != num_cells || self.normals.len() != num_cells || self.areas.len() != num_cells {
            return Err("interface geometry arrays must match the number of interface cells");
        }
        for (j, (low, high)) in self.cell_map.iter().enumerate() {
            if *low >= grid.num_cells() || *high >= grid.num_cells() {
                return Err("cell_map references a bulk cell out of bounds");
            }
            if low == high {
                return Err("cell_map must reference two distinct bulk cells");
            }
            if self.areas[j] <= 0.0 {
                return Err("interface cell areas must be positive");
            }
            let n = self.normals[j];
            let mag = f64::sqrt(n[0] * n[0] + n[1] * n[1]);
            if f64::abs(mag - 1.0) > 1e-10 {
                return Err("interface normals must have unit length");
            }
            // side convention: the normal must point from the low cell towards the high cell
            let cl = grid.cell_centers[*low];
            let ch = grid.cell_centers[*high];
            let dot = n[0] * (ch[0] - cl[0]) + n[1] * (ch[1] - cl[1]);
            if dot <= 0.0 {
                return Err("cell_map low/high sides are inconsistent with the interface normal");
            }
        }
        for (a, b) in &self.neighbors {
            if *a >= num_cells || *b >= num_cells {
                return Err("interface neighbor index is out of bounds");
            }
            if a == b {
                return Err("interface neighbors must be two distinct cells");
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
