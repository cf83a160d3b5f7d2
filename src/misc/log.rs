/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided by the library; the CLI installs env_logger.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [suspicious-clause iterator](crate::db::trail)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [conflict analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to backjumping
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to the [solve loop](crate::procedures::solve)
    pub const SOLVE: &str = "solve";

    /// Logs related to the [CNF translation](crate::structures::cnf)
    pub const CNF: &str = "cnf";

    /// Logs related to [transactional memory](crate::transactional)
    pub const TRANSACTIONAL: &str = "transactional";

    /// Logs related to the [interpreter](crate::smtlib)
    pub const INTERP: &str = "interp";
}
