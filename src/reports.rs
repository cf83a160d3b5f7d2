/*!
Reports regarding a solve.
*/

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula of the solve is satisfiable.
    Satisfiable,

    /// The formula of the solve is unsatisfiable.
    Unsatisfiable,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SAT"),
            Self::Unsatisfiable => write!(f, "UNSAT"),
        }
    }
}
