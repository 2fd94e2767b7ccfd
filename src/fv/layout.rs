use crate::base::{Grid, InterfaceGrid, Variable};
use crate::StrError;

/// Holds the layout of the global unknown vector
///
/// The unknowns are the ordered concatenation of the variable blocks:
/// bulk displacement u (ndim per bulk cell), bulk pressure p (one per bulk
/// cell), fracture pressure p_f (one per interface cell, all fractures
/// concatenated), and mortar contact traction λ (ndim per interface cell,
/// components in the local normal/tangent frame).
pub struct DofLayout {
    /// Space dimension
    pub ndim: usize,

    /// Number of bulk cells
    pub n_cell: usize,

    /// Total number of interface cells over all fractures
    pub n_ifc: usize,

    /// Offset of the first interface cell of each fracture
    ifc_offsets: Vec<usize>,

    /// Total number of equations
    pub n_equation: usize,
}

impl DofLayout {
    /// Allocates a new instance
    pub fn new(grid: &Grid, interfaces: &[InterfaceGrid]) -> Result<DofLayout, StrError> {
        if grid.num_cells() == 0 {
            return Err("grid must have at least one cell");
        }
        let ndim = grid.ndim;
        let n_cell = grid.num_cells();
        let mut ifc_offsets = Vec::with_capacity(interfaces.len());
        let mut n_ifc = 0;
        for ifc in interfaces {
            ifc_offsets.push(n_ifc);
            n_ifc += ifc.num_cells();
        }
        let n_equation = ndim * n_cell + n_cell + n_ifc + ndim * n_ifc;
        Ok(DofLayout {
            ndim,
            n_cell,
            n_ifc,
            ifc_offsets,
            n_equation,
        })
    }

    /// Returns the global index of an interface cell
    pub fn ifc_index(&self, fracture: usize, local: usize) -> usize {
        self.ifc_offsets[fracture] + local
    }

    /// Returns the equation number of a displacement component
    pub fn eq_u(&self, cell: usize, comp: usize) -> usize {
        cell * self.ndim + comp
    }

    /// Returns the equation number of a bulk pressure
    pub fn eq_p(&self, cell: usize) -> usize {
        self.ndim * self.n_cell + cell
    }

    /// Returns the equation number of a fracture pressure
    pub fn eq_pf(&self, ifc: usize) -> usize {
        self.ndim * self.n_cell + self.n_cell + ifc
    }

    /// Returns the equation number of a mortar traction component
    /// (comp 0 = normal, comp 1 = tangential)
    pub fn eq_lam(&self, ifc: usize, comp: usize) -> usize {
        self.ndim * self.n_cell + self.n_cell + self.n_ifc + ifc * self.ndim + comp
    }

    /// Returns the first equation number of a variable block
    pub fn offset(&self, var: Variable) -> usize {
        match var {
            Variable::U => 0,
            Variable::P => self.ndim * self.n_cell,
            Variable::Pf => self.ndim * self.n_cell + self.n_cell,
            Variable::Lam => self.ndim * self.n_cell + self.n_cell + self.n_ifc,
        }
    }

    /// Returns the number of equations of a variable block
    pub fn var_dim(&self, var: Variable) -> usize {
        match var {
            Variable::U => self.ndim * self.n_cell,
            Variable::P => self.n_cell,
            Variable::Pf => self.n_ifc,
            Variable::Lam => self.ndim * self.n_ifc,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::DofLayout;
    use crate::base::{SampleGrids, Variable};

    #[test]
    fn new_works_without_interfaces() {
        let grid = SampleGrids::cartesian_2d(3, 2, 3.0, 2.0).unwrap();
        let layout = DofLayout::new(&grid, &[]).unwrap();
        assert_eq!(layout.ndim, 2);
        assert_eq!(layout.n_cell, 6);
        assert_eq!(layout.n_ifc, 0);
        assert_eq!(layout.n_equation, 12 + 6);
        assert_eq!(layout.eq_u(0, 1), 1);
        assert_eq!(layout.eq_u(5, 0), 10);
        assert_eq!(layout.eq_p(0), 12);
        assert_eq!(layout.offset(Variable::P), 12);
        assert_eq!(layout.var_dim(Variable::Pf), 0);
        assert_eq!(layout.var_dim(Variable::Lam), 0);
    }

    #[test]
    fn new_works_with_interfaces() {
        let (grid, ifc) = SampleGrids::strip_with_horizontal_fracture(4, 2, 2.0, 1.0, 0.0, 2.0).unwrap();
        let interfaces = [ifc];
        let layout = DofLayout::new(&grid, &interfaces).unwrap();
        assert_eq!(layout.n_cell, 8);
        assert_eq!(layout.n_ifc, 4);
        // u: 16, p: 8, p_f: 4, λ: 8
        assert_eq!(layout.n_equation, 36);
        assert_eq!(layout.offset(Variable::Pf), 24);
        assert_eq!(layout.offset(Variable::Lam), 28);
        assert_eq!(layout.eq_pf(layout.ifc_index(0, 2)), 26);
        assert_eq!(layout.eq_lam(0, 0), 28);
        assert_eq!(layout.eq_lam(3, 1), 35);
    }
}
