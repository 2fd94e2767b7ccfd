use super::{Face, Grid, InterfaceGrid};
use crate::StrError;

/// Holds sample grids for tests and examples
///
/// Real simulations obtain their grids from an external mesher driven by
/// the mesh-size targets in [crate::base::Config]; the structured grids
/// here serve tests and small verification problems.
pub struct SampleGrids {}

impl SampleGrids {
    /// Generates a Cartesian grid on [0,lx] × [0,ly] with nx × ny cells
    pub fn cartesian_2d(nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Grid, StrError> {
        if nx < 1 || ny < 1 {
            return Err("nx and ny must be at least 1");
        }
        if lx <= 0.0 || ly <= 0.0 {
            return Err("lx and ly must be positive");
        }
        let (grid, _) = SampleGrids::cartesian_with_gap(nx, ny, lx, ly, None)?;
        Ok(grid)
    }

    /// Generates a strip with one straight horizontal fracture at mid height
    ///
    /// The fracture spans face centers with x in [x_frac_min, x_frac_max];
    /// ny must be even so the fracture lies on a cell row boundary. The
    /// low side of every interface cell is the bottom cell and the normal
    /// points upward (+y).
    pub fn strip_with_horizontal_fracture(
        nx: usize,
        ny: usize,
        lx: f64,
        ly: f64,
        x_frac_min: f64,
        x_frac_max: f64,
    ) -> Result<(Grid, InterfaceGrid), StrError> {
        if nx < 1 || ny < 2 {
            return Err("nx must be at least 1 and ny at least 2");
        }
        if ny % 2 != 0 {
            return Err("ny must be even to place the fracture at mid height");
        }
        if lx <= 0.0 || ly <= 0.0 {
            return Err("lx and ly must be positive");
        }
        if x_frac_min >= x_frac_max {
            return Err("the fracture must have a positive extent");
        }
        let (grid, ifc) = SampleGrids::cartesian_with_gap(nx, ny, lx, ly, Some((x_frac_min, x_frac_max)))?;
        let ifc = match ifc {
            Some(ifc) => ifc,
            None => return Err("the fracture must cover at least one face"),
        };
        ifc.validate(&grid)?;
        Ok((grid, ifc))
    }

    fn cartesian_with_gap(
        nx: usize,
        ny: usize,
        lx: f64,
        ly: f64,
        frac_range: Option<(f64, f64)>,
    ) -> Result<(Grid, Option<InterfaceGrid>), StrError> {
        let dx = lx / (nx as f64);
        let dy = ly / (ny as f64);
        let cell = |ix: usize, iy: usize| iy * nx + ix;

        // cells
        let mut centers = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                centers.push([(ix as f64 + 0.5) * dx, (iy as f64 + 0.5) * dy]);
            }
        }
        let volumes = vec![dx * dy; nx * ny];

        // vertical faces (normal along x)
        let mut faces = Vec::new();
        for iy in 0..ny {
            for ix in 0..=nx {
                let center = [ix as f64 * dx, (iy as f64 + 0.5) * dy];
                if ix == 0 {
                    faces.push(Face {
                        low: cell(0, iy),
                        high: None,
                        center,
                        normal: [-1.0, 0.0],
                        area: dy,
                    });
                } else if ix == nx {
                    faces.push(Face {
                        low: cell(nx - 1, iy),
                        high: None,
                        center,
                        normal: [1.0, 0.0],
                        area: dy,
                    });
                } else {
                    faces.push(Face {
                        low: cell(ix - 1, iy),
                        high: Some(cell(ix, iy)),
                        center,
                        normal: [1.0, 0.0],
                        area: dy,
                    });
                }
            }
        }

        // horizontal faces (normal along y); faces along the fracture line
        // become interface cells instead
        let iy_frac = ny / 2;
        let mut cell_map = Vec::new();
        let mut ifc_centers = Vec::new();
        let mut ifc_normals = Vec::new();
        let mut ifc_areas = Vec::new();
        let mut included = Vec::new();
        for iy in 0..=ny {
            for ix in 0..nx {
                let center = [(ix as f64 + 0.5) * dx, iy as f64 * dy];
                if iy == 0 {
                    faces.push(Face {
                        low: cell(ix, 0),
                        high: None,
                        center,
                        normal: [0.0, -1.0],
                        area: dx,
                    });
                } else if iy == ny {
                    faces.push(Face {
                        low: cell(ix, ny - 1),
                        high: None,
                        center,
                        normal: [0.0, 1.0],
                        area: dx,
                    });
                } else {
                    let in_fracture = match frac_range {
                        Some((x0, x1)) => iy == iy_frac && center[0] >= x0 && center[0] <= x1,
                        None => false,
                    };
                    if in_fracture {
                        cell_map.push((cell(ix, iy - 1), cell(ix, iy)));
                        ifc_centers.push(center);
                        ifc_normals.push([0.0, 1.0]);
                        ifc_areas.push(dx);
                        included.push(ix);
                    } else {
                        faces.push(Face {
                            low: cell(ix, iy - 1),
                            high: Some(cell(ix, iy)),
                            center,
                            normal: [0.0, 1.0],
                            area: dx,
                        });
                    }
                }
            }
        }

        let grid = Grid::new(centers, volumes, faces)?;
        if frac_range.is_none() {
            return Ok((grid, None));
        }
        if cell_map.is_empty() {
            return Err("the fracture must cover at least one face");
        }

        // fracture-tangential connections between consecutive interface cells
        let mut neighbors = Vec::new();
        for j in 1..included.len() {
            if included[j] == included[j - 1] + 1 {
                neighbors.push((j - 1, j));
            }
        }

        let ifc = InterfaceGrid {
            cell_map,
            centers: ifc_centers,
            normals: ifc_normals,
            areas: ifc_areas,
            neighbors,
        };
        Ok((grid, Some(ifc)))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SampleGrids;
    use russell_lab::approx_eq;

    #[test]
    fn cartesian_2d_captures_errors() {
        assert_eq!(
            SampleGrids::cartesian_2d(0, 2, 1.0, 1.0).err(),
            Some("nx and ny must be at least 1")
        );
        assert_eq!(
            SampleGrids::cartesian_2d(2, 2, -1.0, 1.0).err(),
            Some("lx and ly must be positive")
        );
    }

    #[test]
    fn cartesian_2d_works() {
        let grid = SampleGrids::cartesian_2d(3, 2, 3.0, 2.0).unwrap();
        assert_eq!(grid.num_cells(), 6);
        // vertical: 4 * 2; horizontal: 3 * 3
        assert_eq!(grid.num_faces(), 17);
        assert_eq!(grid.num_boundary_faces(), 10);
        approx_eq(grid.cell_volumes[0], 1.0, 1e-15);
        approx_eq(grid.cell_centers[4][0], 1.5, 1e-15);
        approx_eq(grid.cell_centers[4][1], 1.5, 1e-15);
    }

    #[test]
    fn fractured_strip_captures_errors() {
        assert_eq!(
            SampleGrids::strip_with_horizontal_fracture(2, 3, 2.0, 1.0, 0.0, 2.0).err(),
            Some("ny must be even to place the fracture at mid height")
        );
        assert_eq!(
            SampleGrids::strip_with_horizontal_fracture(2, 2, 2.0, 1.0, 1.0, 1.0).err(),
            Some("the fracture must have a positive extent")
        );
        assert_eq!(
            SampleGrids::strip_with_horizontal_fracture(4, 2, 2.0, 1.0, 1.9, 2.0).err(),
            Some("the fracture must cover at least one face")
        );
    }

    #[test]
    fn fractured_strip_works() {
        // full-span fracture: every mid-height horizontal face becomes an interface cell
        let (grid, ifc) = SampleGrids::strip_with_horizontal_fracture(4, 2, 2.0, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(grid.num_cells(), 8);
        assert_eq!(ifc.num_cells(), 4);
        assert_eq!(ifc.neighbors, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(ifc.cell_map[0], (0, 4));
        approx_eq(ifc.areas[0], 0.5, 1e-15);
        // the bulk grid has no face crossing the fracture
        for face in &grid.faces {
            if let Some(high) = face.high {
                let pair = (face.low, high);
                assert!(!ifc.cell_map.contains(&pair));
            }
        }

        // partial fracture: only faces with center x in [0, 1]
        let (_, ifc) = SampleGrids::strip_with_horizontal_fracture(4, 2, 2.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(ifc.num_cells(), 2);
        assert_eq!(ifc.neighbors, &[(0, 1)]);
    }
}
