//! Bounded linear programs and a dense two-phase simplex solver.
//!
//! Problems are posed as
//!
//! ```text
//! minimize    cᵀx
//! subject to  A·x = b
//!             lᵢ ≤ xᵢ ≤ uᵢ   (uᵢ optional, lᵢ = uᵢ fixes the variable)
//! ```
//!
//! ## Workflow
//! 1. Standardize — substitute fixed variables, shift lower bounds to zero,
//!    turn finite upper bounds into slack rows
//! 2. Phase 1 — minimize the sum of artificial variables; a positive
//!    optimum means the constraints admit no point
//! 3. Drive remaining artificials out of the basis (redundant rows keep theirs)
//! 4. Phase 2 — minimize the real objective over the feasible basis
//!
//! Both phases use Bland's rule, so the solver never cycles and returns the
//! same answer for the same input.

use faer::Mat;
use serde::{Deserialize, Serialize};

use stance_types::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_PIVOT_TOLERANCE, DEFAULT_TOLERANCE,
};
use stance_types::{StanceError, StanceResult};

/// Lower and optional upper bound of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableBounds {
    /// Finite lower bound.
    pub lower: f64,
    /// Upper bound; `None` is unbounded above.
    pub upper: Option<f64>,
}

impl VariableBounds {
    /// `[0, ∞)`.
    pub fn non_negative() -> Self {
        Self {
            lower: 0.0,
            upper: None,
        }
    }

    /// `[value, value]`.
    pub fn fixed(value: f64) -> Self {
        Self {
            lower: value,
            upper: Some(value),
        }
    }

    /// `[lower, upper]`.
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    /// Returns true if the variable can take exactly one value.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.upper == Some(self.lower)
    }

    /// Upper bound if it is finite.
    #[inline]
    fn finite_upper(&self) -> Option<f64> {
        self.upper.filter(|u| u.is_finite())
    }
}

/// A linear program with equality constraints and per-variable bounds.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// Objective coefficients `c` (length = variable count).
    pub objective: Vec<f64>,
    /// Equality constraint matrix `A` (constraint count × variable count).
    pub constraints: Mat<f64>,
    /// Right-hand side `b` (length = constraint count).
    pub rhs: Vec<f64>,
    /// Bounds per variable.
    pub bounds: Vec<VariableBounds>,
}

impl LinearProgram {
    /// Creates a program and checks that its parts are consistent.
    pub fn new(
        objective: Vec<f64>,
        constraints: Mat<f64>,
        rhs: Vec<f64>,
        bounds: Vec<VariableBounds>,
    ) -> StanceResult<Self> {
        let lp = Self {
            objective,
            constraints,
            rhs,
            bounds,
        };
        lp.validate()?;
        Ok(lp)
    }

    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.rhs.len()
    }

    /// Checks dimensions, finiteness and bound ordering.
    pub fn validate(&self) -> StanceResult<()> {
        let n = self.variable_count();
        let m = self.constraint_count();

        if self.constraints.nrows() != m || self.constraints.ncols() != n {
            return Err(StanceError::InvalidProgram(format!(
                "Constraint matrix is {}×{}, expected {}×{}",
                self.constraints.nrows(),
                self.constraints.ncols(),
                m,
                n
            )));
        }
        if self.bounds.len() != n {
            return Err(StanceError::InvalidProgram(format!(
                "Bounds length ({}) != variable count ({})",
                self.bounds.len(),
                n
            )));
        }
        if self.objective.iter().chain(&self.rhs).any(|v| !v.is_finite()) {
            return Err(StanceError::InvalidProgram(
                "Objective and right-hand side must be finite".into(),
            ));
        }
        for i in 0..m {
            for j in 0..n {
                if !self.constraints[(i, j)].is_finite() {
                    return Err(StanceError::InvalidProgram(format!(
                        "Constraint entry ({i}, {j}) is not finite"
                    )));
                }
            }
        }
        for (j, bound) in self.bounds.iter().enumerate() {
            if !bound.lower.is_finite() {
                return Err(StanceError::InvalidProgram(format!(
                    "Variable {j} needs a finite lower bound, got {}",
                    bound.lower
                )));
            }
            if let Some(upper) = bound.upper {
                if upper.is_nan() || upper < bound.lower {
                    return Err(StanceError::InvalidProgram(format!(
                        "Variable {j} has inverted bounds [{}, {}]",
                        bound.lower, upper
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evaluates `cᵀx`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Largest absolute violation of `A·x = b`.
    pub fn max_residual(&self, x: &[f64]) -> f64 {
        (0..self.constraint_count())
            .map(|i| {
                let ax: f64 = (0..self.variable_count())
                    .map(|j| self.constraints[(i, j)] * x[j])
                    .sum();
                (ax - self.rhs[i]).abs()
            })
            .fold(0.0, f64::max)
    }
}

/// Outcome class of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LpStatus {
    /// A feasible point minimizing the objective was found.
    Optimal,
    /// No point satisfies the constraints and bounds.
    Infeasible,
    /// Feasible, but the objective decreases without limit.
    Unbounded,
}

/// Result of a linear-program solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpSolution {
    pub status: LpStatus,
    /// Optimal point (empty unless `status == Optimal`).
    pub x: Vec<f64>,
    /// Objective value at `x` (0 unless optimal).
    pub objective: f64,
    /// Simplex pivots performed across both phases.
    pub iterations: u32,
    /// Phase-1 optimum: total artificial mass left in the basis.
    pub infeasibility: f64,
}

impl LpSolution {
    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}

/// Tolerances and limits for [`SimplexSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplexOptions {
    /// Largest phase-1 infeasibility `Σ|artificials|` accepted as feasible.
    pub tolerance: f64,
    /// Entries smaller than this are never pivoted on.
    pub pivot_tolerance: f64,
    /// Maximum pivots across both phases.
    pub max_iterations: u32,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Trait for linear-program backends.
pub trait LinearProgramSolver {
    /// Solve the program. Infeasible and unbounded programs are reported
    /// through [`LpStatus`]; errors are reserved for malformed input and
    /// numerical failure.
    fn solve(&self, lp: &LinearProgram) -> StanceResult<LpSolution>;

    /// Returns the solver's name.
    fn name(&self) -> &str;
}

/// Dense two-phase tableau simplex with Bland's pivoting rule.
#[derive(Debug, Clone, Default)]
pub struct SimplexSolver {
    options: SimplexOptions,
}

impl SimplexSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SimplexOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SimplexOptions {
        &self.options
    }
}

impl LinearProgramSolver for SimplexSolver {
    fn solve(&self, lp: &LinearProgram) -> StanceResult<LpSolution> {
        lp.validate()?;
        let standard = StandardForm::from_program(lp);
        let mut tableau = Tableau::new(&standard, self.options);
        let mut iterations = 0_u32;
        let structural = tableau.structural;

        // Phase 1
        tableau.load_phase_one_objective();
        tableau.run(structural, &mut iterations)?;

        // Σ|artificials| bounds every constraint violation, so this caps
        // max |A·x − b| at `tolerance` in absolute terms.
        let infeasibility = tableau.infeasibility();
        if infeasibility > self.options.tolerance {
            tracing::debug!(
                infeasibility,
                iterations,
                "simplex phase 1 found no feasible point"
            );
            return Ok(LpSolution {
                status: LpStatus::Infeasible,
                x: Vec::new(),
                objective: 0.0,
                iterations,
                infeasibility,
            });
        }

        tableau.drive_out_artificials();

        // Phase 2
        tableau.load_phase_two_objective(&standard.c);
        let bounded = tableau.run(structural, &mut iterations)?;
        if !bounded {
            tracing::debug!(iterations, "simplex phase 2 objective is unbounded");
            return Ok(LpSolution {
                status: LpStatus::Unbounded,
                x: Vec::new(),
                objective: 0.0,
                iterations,
                infeasibility,
            });
        }

        let x = standard.recover(&tableau.structural_values());
        let objective = lp.objective_value(&x);
        tracing::debug!(
            rows = standard.b.len(),
            columns = standard.c.len(),
            iterations,
            objective,
            "simplex converged"
        );

        Ok(LpSolution {
            status: LpStatus::Optimal,
            x,
            objective,
            iterations,
            infeasibility,
        })
    }

    fn name(&self) -> &str {
        "dense_simplex"
    }
}

/// Where an original variable went during standardization.
#[derive(Debug, Clone, Copy)]
enum Origin {
    /// Substituted by its fixed value.
    Fixed(f64),
    /// `x = lower + y[column]`, `y ≥ 0`.
    Shifted { column: usize, lower: f64 },
}

/// `min cᵀy  s.t.  A·y = b, y ≥ 0`.
struct StandardForm {
    a: Mat<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    origins: Vec<Origin>,
}

impl StandardForm {
    fn from_program(lp: &LinearProgram) -> Self {
        let m = lp.constraint_count();

        let mut origins = Vec::with_capacity(lp.variable_count());
        let mut shifted = 0_usize;
        let mut upper_rows = 0_usize;
        for bound in &lp.bounds {
            if bound.is_fixed() {
                origins.push(Origin::Fixed(bound.lower));
            } else {
                origins.push(Origin::Shifted {
                    column: shifted,
                    lower: bound.lower,
                });
                shifted += 1;
                if bound.finite_upper().is_some() {
                    upper_rows += 1;
                }
            }
        }

        let rows = m + upper_rows;
        let cols = shifted + upper_rows;
        let mut a = Mat::<f64>::zeros(rows, cols);
        let mut b = lp.rhs.clone();
        b.resize(rows, 0.0);
        let mut c = vec![0.0; cols];

        for (j, origin) in origins.iter().enumerate() {
            match *origin {
                Origin::Fixed(value) => {
                    for (i, bi) in b.iter_mut().enumerate().take(m) {
                        *bi -= lp.constraints[(i, j)] * value;
                    }
                }
                Origin::Shifted { column, lower } => {
                    for (i, bi) in b.iter_mut().enumerate().take(m) {
                        a[(i, column)] = lp.constraints[(i, j)];
                        *bi -= lp.constraints[(i, j)] * lower;
                    }
                    c[column] = lp.objective[j];
                }
            }
        }

        // y + s = upper − lower
        let mut row = m;
        let mut slack = shifted;
        for (origin, bound) in origins.iter().zip(&lp.bounds) {
            if let (Origin::Shifted { column, lower }, Some(upper)) = (*origin, bound.finite_upper())
            {
                a[(row, column)] = 1.0;
                a[(row, slack)] = 1.0;
                b[row] = upper - lower;
                row += 1;
                slack += 1;
            }
        }

        Self { a, b, c, origins }
    }

    /// Map standard-form values back to the original variables.
    fn recover(&self, y: &[f64]) -> Vec<f64> {
        self.origins
            .iter()
            .map(|origin| match *origin {
                Origin::Fixed(value) => value,
                Origin::Shifted { column, lower } => lower + y[column],
            })
            .collect()
    }
}

/// Simplex tableau.
///
/// Rows `0..m` are constraints, row `m` holds reduced costs with `−z` in the
/// right-hand-side column. Columns are laid out as
/// `[structural | artificial | rhs]`.
struct Tableau {
    t: Mat<f64>,
    basis: Vec<usize>,
    m: usize,
    structural: usize,
    rhs: usize,
    options: SimplexOptions,
}

impl Tableau {
    fn new(standard: &StandardForm, options: SimplexOptions) -> Self {
        let m = standard.b.len();
        let structural = standard.c.len();
        let rhs = structural + m;
        let mut t = Mat::<f64>::zeros(m + 1, rhs + 1);

        for i in 0..m {
            // Artificials need b ≥ 0
            let sign = if standard.b[i] < 0.0 { -1.0 } else { 1.0 };
            for j in 0..structural {
                t[(i, j)] = sign * standard.a[(i, j)];
            }
            t[(i, structural + i)] = 1.0;
            t[(i, rhs)] = sign * standard.b[i];
        }

        Self {
            t,
            basis: (structural..structural + m).collect(),
            m,
            structural,
            rhs,
            options,
        }
    }

    fn is_artificial(&self, column: usize) -> bool {
        column >= self.structural
    }

    /// Minimize the sum of artificials: d_j = −Σᵢ t_ij over structural columns.
    fn load_phase_one_objective(&mut self) {
        let m = self.m;
        for j in 0..=self.rhs {
            self.t[(m, j)] = 0.0;
        }
        for j in (0..self.structural).chain(std::iter::once(self.rhs)) {
            let sum: f64 = (0..m).map(|i| self.t[(i, j)]).sum();
            self.t[(m, j)] = -sum;
        }
    }

    /// Price out the basis against cost vector `c` (artificials cost nothing).
    fn load_phase_two_objective(&mut self, c: &[f64]) {
        let m = self.m;
        for j in 0..=self.rhs {
            self.t[(m, j)] = if j < self.structural { c[j] } else { 0.0 };
        }
        for i in 0..m {
            let basic = self.basis[i];
            if self.is_artificial(basic) {
                continue;
            }
            let cb = c[basic];
            if cb == 0.0 {
                continue;
            }
            for j in 0..=self.rhs {
                let v = self.t[(i, j)];
                self.t[(m, j)] -= cb * v;
            }
        }
    }

    /// Pivot until no column below `limit` has a negative reduced cost.
    ///
    /// Returns `false` if an improving column has no leaving row (unbounded).
    fn run(&mut self, limit: usize, iterations: &mut u32) -> StanceResult<bool> {
        let tol = self.options.pivot_tolerance;
        loop {
            let Some(entering) = (0..limit).find(|&j| self.t[(self.m, j)] < -tol) else {
                return Ok(true);
            };

            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..self.m {
                let coeff = self.t[(i, entering)];
                if coeff <= tol {
                    continue;
                }
                let ratio = self.t[(i, self.rhs)] / coeff;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        let tie = (ratio - best_ratio).abs() <= tol * (1.0 + best_ratio.abs());
                        if (!tie && ratio < best_ratio) || (tie && self.basis[i] < self.basis[best]) {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }
            let Some((row, _)) = leaving else {
                return Ok(false);
            };

            if *iterations >= self.options.max_iterations {
                return Err(StanceError::SolverDivergence {
                    iterations: *iterations,
                    residual: self.infeasibility(),
                });
            }
            self.pivot(row, entering);
            *iterations += 1;
        }
    }

    fn pivot(&mut self, row: usize, column: usize) {
        let p = self.t[(row, column)];
        for j in 0..=self.rhs {
            self.t[(row, j)] /= p;
        }
        for i in 0..=self.m {
            if i == row {
                continue;
            }
            let factor = self.t[(i, column)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..=self.rhs {
                let v = self.t[(row, j)];
                self.t[(i, j)] -= factor * v;
            }
        }
        self.basis[row] = column;
    }

    /// Total value of artificials still in the basis.
    fn infeasibility(&self) -> f64 {
        (0..self.m)
            .filter(|&i| self.is_artificial(self.basis[i]))
            .map(|i| self.t[(i, self.rhs)].abs())
            .sum()
    }

    /// Replace zero-level basic artificials by any structural column with a
    /// usable entry in their row. Rows with none are redundant and keep theirs.
    fn drive_out_artificials(&mut self) {
        for i in 0..self.m {
            if !self.is_artificial(self.basis[i]) {
                continue;
            }
            if let Some(j) =
                (0..self.structural).find(|&j| self.t[(i, j)].abs() > self.options.pivot_tolerance)
            {
                self.pivot(i, j);
            }
        }
    }

    fn structural_values(&self) -> Vec<f64> {
        let mut y = vec![0.0; self.structural];
        for i in 0..self.m {
            let basic = self.basis[i];
            if !self.is_artificial(basic) {
                y[basic] = self.t[(i, self.rhs)].max(0.0);
            }
        }
        y
    }
}
