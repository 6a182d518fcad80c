pub mod crt;
pub mod engine;
pub mod error;
pub mod modarith;
pub mod ntt;
pub mod primes;

pub use engine::{NttBuffer, RingEngine};
pub use error::RingError;
