//! Status bitset returned by every public query.
//!
//! No operation in this crate throws; callers inspect the returned
//! [`Status`] bitset instead. A coarse result (`SUCCESS` or `FAILURE`) is
//! always set, with detail bits OR'd in to describe degraded outcomes.

bitflags::bitflags! {
    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
    /// Outcome of a query, returned instead of throwing.
    pub struct Status: u32 {
        /// The query completed and produced a complete result.
        const SUCCESS = 1 << 0;
        /// The query could not produce any usable result.
        const FAILURE = 1 << 1;
        /// The query is still running (reserved for future incremental searches).
        const IN_PROGRESS = 1 << 2;
        /// A parameter failed a precondition check.
        const INVALID_PARAM = 1 << 3;
        /// The search node pool was exhausted before the search finished.
        const OUT_OF_NODES = 1 << 4;
        /// An output buffer was too small; as many items as fit were written.
        const BUFFER_TOO_SMALL = 1 << 5;
        /// The goal was unreachable; the result ends at the closest reachable point.
        const PARTIAL_RESULT = 1 << 6;
    }
}

impl Status {
    /// True if the coarse result bit is `SUCCESS` (detail bits may still be set).
    #[inline]
    pub fn succeeded(self) -> bool {
        self.contains(Status::SUCCESS)
    }

    /// True if the coarse result bit is `FAILURE`.
    #[inline]
    pub fn failed(self) -> bool {
        self.contains(Status::FAILURE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detail_bits_compose_with_coarse_result() {
        let status = Status::SUCCESS | Status::PARTIAL_RESULT;
        assert!(status.succeeded());
        assert!(status.contains(Status::PARTIAL_RESULT));
        assert!(!status.failed());
    }

    #[test]
    fn failure_and_invalid_param_compose() {
        let status = Status::FAILURE | Status::INVALID_PARAM;
        assert!(status.failed());
        assert!(status.contains(Status::INVALID_PARAM));
    }
}
