use thiserror::Error;

/// Errors surfaced at the engine boundary.
///
/// Every variant is a programmer-error class: on valid inputs the engine is
/// infallible, and nothing is retried or recovered internally. Operand
/// magnitudes are *not* checked at runtime; a caller who picks `np` too small
/// for `N * Q^2 < pProd` silently gets a wrong centered representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Rejected at construction: `log_n` outside [1, 16] or `log_q` < 1.
    #[error("invalid ring parameters: log_n = {log_n}, log_q = {log_q}")]
    BadParameters { log_n: usize, log_q: usize },

    /// The derived channel count exceeds the compiled-in prime table.
    #[error("modulus chain needs {required} primes but the table holds {available}")]
    PrimeTableExhausted { required: usize, available: usize },

    /// A channel count outside [1, L], or an NTT buffer built with a
    /// different channel count than the call requests.
    #[error("channel count {np} outside [1, {max}]")]
    BadChannelCount { np: usize, max: usize },

    /// `prime - 1` is not divisible by 2N, so no 2N-th root of unity exists.
    #[error("{prime} has no root of unity of order {order}")]
    NoRootOfUnity { prime: u64, order: u64 },
}
