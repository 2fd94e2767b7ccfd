use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{CooMatrix, Genie, LinSolver, Sym};

/// Holds the global linear system of one Newton iteration
///
/// The system is K mdu = R where mdu is the negative update of the
/// unknowns, so the Newton step is uu -= mdu.
pub struct LinearSystem<'a> {
    /// Total number of equations
    pub n_equation: usize,

    /// Upper bound of the number of matrix entries
    pub nnz_sup: usize,

    /// Global residual vector R
    pub rr: Vector,

    /// Global Jacobian matrix K
    pub kk: CooMatrix,

    /// Linear solver
    pub solver: LinSolver<'a>,

    /// Negative update mdu = -Δu
    pub mdu: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    pub fn new(n_equation: usize, nnz_sup: usize, genie: Genie) -> Result<Self, StrError> {
        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            rr: Vector::new(n_equation),
            kk: CooMatrix::new(n_equation, n_equation, nnz_sup, Sym::No)?,
            solver: LinSolver::new(genie)?,
            mdu: Vector::new(n_equation),
        })
    }

    /// Returns mutable access to the coefficient matrix triplets
    pub fn coo_mut(&mut self) -> Result<&mut CooMatrix, StrError> {
        Ok(&mut self.kk)
    }

    /// Factorizes the coefficient matrix
    pub fn factorize(&mut self) -> Result<(), StrError> {
        self.solver.actual.factorize(&self.kk, None)
    }

    /// Solves the system (must be called after factorize)
    pub fn solve(&mut self) -> Result<(), StrError> {
        self.solver.actual.solve(&mut self.mdu, &self.rr, false)
    }

    /// Appends one entry with the given value to every diagonal position
    ///
    /// Must be called exactly once after every assembly (with zero in the
    /// regular case) so the number of entries, and thus the sparsity
    /// pattern seen by the factorization, never changes. A nonzero value
    /// recovers from a singular factorization.
    pub fn perturb_diagonal(&mut self, eps: f64) -> Result<(), StrError> {
        let coo = &mut self.kk;
        for i in 0..self.n_equation {
            coo.put(i, i, eps)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearSystem;
    use russell_lab::approx_eq;
    use russell_sparse::Genie;

    #[test]
    fn new_works() {
        let ls = LinearSystem::new(4, 20, Genie::Umfpack).unwrap();
        assert_eq!(ls.n_equation, 4);
        assert_eq!(ls.rr.dim(), 4);
        assert_eq!(ls.mdu.dim(), 4);
    }

    #[test]
    fn factorize_and_solve_work() {
        // [2 1; 1 3] x = [3; 5] has the solution x = [0.8; 1.4]
        let mut ls = LinearSystem::new(2, 8, Genie::Umfpack).unwrap();
        let coo = ls.coo_mut().unwrap();
        coo.put(0, 0, 2.0).unwrap();
        coo.put(0, 1, 1.0).unwrap();
        coo.put(1, 0, 1.0).unwrap();
        coo.put(1, 1, 3.0).unwrap();
        ls.rr[0] = 3.0;
        ls.rr[1] = 5.0;
        ls.factorize().unwrap();
        ls.solve().unwrap();
        approx_eq(ls.mdu[0], 0.8, 1e-14);
        approx_eq(ls.mdu[1], 1.4, 1e-14);
    }

    #[test]
    fn perturb_diagonal_rescues_a_singular_matrix() {
        // the zero matrix cannot be factorized; a perturbed diagonal can;
        // both attempts carry the same number of entries
        let mut ls = LinearSystem::new(2, 8, Genie::Umfpack).unwrap();
        let coo = ls.coo_mut().unwrap();
        coo.put(0, 1, 0.0).unwrap();
        coo.put(1, 0, 0.0).unwrap();
        ls.perturb_diagonal(0.0).unwrap();
        assert!(ls.factorize().is_err());

        let coo = ls.coo_mut().unwrap();
        coo.reset();
        coo.put(0, 1, 0.0).unwrap();
        coo.put(1, 0, 0.0).unwrap();
        ls.perturb_diagonal(1.0).unwrap();
        ls.factorize().unwrap();
        ls.rr[0] = 2.0;
        ls.solve().unwrap();
        approx_eq(ls.mdu[0], 2.0, 1e-14);
    }
}
