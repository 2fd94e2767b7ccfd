use crate::StrError;

/// Holds the data of one face: neighbor cells and geometry
///
/// The unit normal points from the low cell to the high cell; on boundary
/// faces (no high cell) it points outward.
#[derive(Clone, Debug)]
pub struct Face {
    /// Low-side neighbor cell
    pub low: usize,

    /// High-side neighbor cell (None on the boundary)
    pub high: Option<usize>,

    /// Face center
    pub center: [f64; 2],

    /// Unit normal, low → high (outward on the boundary)
    pub normal: [f64; 2],

    /// Face measure (length in 2D)
    pub area: f64,
}

/// Holds a read-only cell/face description of a two-dimensional mesh
///
/// The grid is immutable after construction. Fracture surfaces are not
/// represented by faces here; the two sides of a fracture are connected
/// only through an [crate::base::InterfaceGrid].
pub struct Grid {
    /// Space dimension (only 2D grids are supported)
    pub ndim: usize,

    /// Cell centers (num_cells)
    pub cell_centers: Vec<[f64; 2]>,

    /// Cell volumes (num_cells)
    pub cell_volumes: Vec<f64>,

    /// Faces with neighbor and geometry data
    pub faces: Vec<Face>,
}

impl Grid {
    /// Allocates a new instance, checking the topology and geometry
    pub fn new(cell_centers: Vec<[f64; 2]>, cell_volumes: Vec<f64>, faces: Vec<Face>) -> Result<Grid, StrError> {
        let num_cells = cell_centers.len();
        if num_cells == 0 {
            return Err("grid must have at least one cell");
        }
        if cell_volumes.len() != num_cells {
            return Err("number of cell volumes must equal the number of cells");
        }
        if cell_volumes.iter().any(|v| *v <= 0.0) {
            return Err("cell volumes must be positive");
        }
        for face in &faces {
            if face.low >= num_cells {
                return Err("face low cell index is out of bounds");
            }
            if let Some(high) = face.high {
                if high >= num_cells {
                    return Err("face high cell index is out of bounds");
                }
                if high == face.low {
                    return Err("face must connect two distinct cells");
                }
            }
            if face.area <= 0.0 {
                return Err("face areas must be positive");
            }
            let mag = f64::sqrt(face.normal[0] * face.normal[0] + face.normal[1] * face.normal[1]);
            if f64::abs(mag - 1.0) > 1e-10 {
                return Err("face normals must have unit length");
            }
        }
        Ok(Grid {
            ndim: 2,
            cell_centers,
            cell_volumes,
            faces,
        })
    }

    /// Returns the number of cells
    pub fn num_cells(&self) -> usize {
        self.cell_centers.len()
    }

    /// Returns the number of faces
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Tells whether a face lies on the boundary or not
    pub fn is_boundary(&self, face: usize) -> bool {
        self.faces[face].high.is_none()
    }

    /// Returns the number of boundary faces
    pub fn num_boundary_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.high.is_none()).count()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
