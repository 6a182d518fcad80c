use num_bigint::BigInt;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::ToPrimitive;
use num_traits::Zero;

use crate::modarith::{inv_mod, mul_mod_shoup, shoup_precompute};

/// Reconstruction tables for one modulus-chain level l: everything needed to
/// lift residues over the first l + 1 primes back to a centered big integer.
#[derive(Debug, Clone)]
pub struct CrtLevel {
    p_prod: BigUint,
    p_prod_int: BigInt,
    p_prod_half: BigUint,
    p_hat: Vec<BigUint>,
    p_hat_inv: Vec<u64>,
    p_hat_inv_precon: Vec<u64>,
    primes: Vec<u64>,
}

impl CrtLevel {
    fn new(primes: &[u64]) -> Self {
        let np = primes.len();
        let p_prod = primes.iter().fold(BigUint::from(1u64), |acc, &p| acc * p);
        let p_prod_half = &p_prod / 2u32;
        let mut p_hat = Vec::with_capacity(np);
        let mut p_hat_inv = Vec::with_capacity(np);
        let mut p_hat_inv_precon = Vec::with_capacity(np);
        for j in 0..np {
            let hat = &p_prod / primes[j];
            let hat_mod = (&hat % primes[j]).to_u64().unwrap();
            let inv = inv_mod(hat_mod, primes[j]);
            p_hat_inv_precon.push(shoup_precompute(inv, primes[j]));
            p_hat_inv.push(inv);
            p_hat.push(hat);
        }
        CrtLevel {
            p_prod_int: BigInt::from(p_prod.clone()),
            p_prod,
            p_prod_half,
            p_hat,
            p_hat_inv,
            p_hat_inv_precon,
            primes: primes.to_vec(),
        }
    }

    /// Lifts one coefficient's residues `r_j` (j over this level's channels)
    /// to its unique representative in (-pProd/2, pProd/2].
    ///
    /// Computes sum_j pHat_j * (r_j * pHatInv_j mod p_j) with the Shoup
    /// scalar multiply, reduces the accumulator mod pProd, and centers.
    pub fn lift(&self, residues: impl Iterator<Item = u64>) -> BigInt {
        let mut acc = BigUint::zero();
        for (j, r) in residues.enumerate() {
            let s = mul_mod_shoup(
                r,
                self.p_hat_inv[j],
                self.p_hat_inv_precon[j],
                self.primes[j],
            );
            acc += &self.p_hat[j] * s;
        }
        let acc = acc % &self.p_prod;
        if acc > self.p_prod_half {
            BigInt::from(acc) - &self.p_prod_int
        } else {
            BigInt::from(acc)
        }
    }
}

/// The per-level CRT tables for a prefix of the prime table.
#[derive(Debug, Clone)]
pub struct CrtBasis {
    levels: Vec<CrtLevel>,
}

impl CrtBasis {
    /// Precomputes every level l in [0, primes.len()).
    pub fn new(primes: &[u64]) -> Self {
        let levels = (1..=primes.len())
            .map(|l| CrtLevel::new(&primes[..l]))
            .collect();
        CrtBasis { levels }
    }

    /// Tables for reconstructing from `np` channels.
    pub fn level(&self, np: usize) -> &CrtLevel {
        &self.levels[np - 1]
    }
}

/// Reduces `x` modulo `q` into the centered range (-q/2, q/2].
pub fn center_mod(x: &BigInt, q: &BigInt) -> BigInt {
    let mut r = x.mod_floor(q);
    if &r + &r > *q {
        r -= q;
    }
    r
}
