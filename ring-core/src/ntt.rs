use crate::error::RingError;
use crate::modarith::{bit_reverse, inv_mod, inv_mod_2_64, mont_mul, mul_mod, pow_mod};

/// Precomputed transform tables for one RNS prime channel.
///
/// The twiddle tables hold powers of a primitive 2N-th root of unity (and of
/// its inverse) in bit-reversed order over the low `log_n` bits, each scaled
/// by 2^64 mod p so the butterfly can reduce with a single 128-bit multiply
/// and a high-half correction. All fields are immutable after construction.
#[derive(Debug, Clone)]
pub struct NttChannel {
    /// Channel prime, 59 bits, p = 1 (mod 2N).
    pub p: u64,
    /// p^(-1) mod 2^64, consumed by the butterfly reduction.
    pub p_inv: u64,
    /// Barrett precompute floor(2^twok / p).
    pub pr: u64,
    /// Barrett shift 2*(floor(log2 p) + 1).
    pub twok: u32,
    log_n: usize,
    root_pows: Vec<u64>,
    root_inv_pows: Vec<u64>,
    scaled_n_inv: u64,
}

impl NttChannel {
    /// Builds the tables for `p` at ring degree N = 2^log_n.
    ///
    /// Fails with `NoRootOfUnity` when p - 1 is not divisible by 2N.
    pub fn new(p: u64, log_n: usize) -> Result<Self, RingError> {
        let n = 1usize << log_n;
        let m = (n as u64) << 1;
        if (p - 1) % m != 0 {
            return Err(RingError::NoRootOfUnity { prime: p, order: m });
        }

        let p_inv = inv_mod_2_64(p);
        let twok = 2 * (64 - p.leading_zeros());
        let pr = ((1u128 << twok) / p as u128) as u64;

        let root = mth_root_of_unity(m, p);
        let root_inv = inv_mod(root, p);
        let n_inv = inv_mod(n as u64, p);
        let scaled_n_inv = mul_mod(mul_mod(n_inv, 1 << 32, p), 1 << 32, p);

        let mut root_pows = vec![0u64; n];
        let mut root_inv_pows = vec![0u64; n];
        let mut power = 1u64;
        let mut power_inv = 1u64;
        for j in 0..n {
            let jr = (bit_reverse(j as u32) >> (32 - log_n)) as usize;
            root_pows[jr] = mul_mod(mul_mod(power, 1 << 32, p), 1 << 32, p);
            root_inv_pows[jr] = mul_mod(mul_mod(power_inv, 1 << 32, p), 1 << 32, p);
            power = mul_mod(power, root, p);
            power_inv = mul_mod(power_inv, root_inv, p);
        }

        Ok(NttChannel {
            p,
            p_inv,
            pr,
            twok,
            log_n,
            root_pows,
            root_inv_pows,
            scaled_n_inv,
        })
    }

    /// In-place forward transform, radix-2 decimation in time.
    ///
    /// Input is a length-N residue vector in [0, p); output is the channel's
    /// NTT-domain vector in bit-reversed order. Butterfly intermediates carry
    /// a transient slack of one extra p; stored values stay within [0, p].
    pub fn forward(&self, a: &mut [u64]) {
        debug_assert_eq!(a.len(), 1 << self.log_n);
        let n = a.len();
        let p = self.p;
        let p_inv = self.p_inv;
        let mut t = n;
        let mut logt1 = self.log_n + 1;
        let mut m = 1;
        while m < n {
            t >>= 1;
            logt1 -= 1;
            for i in 0..m {
                let j1 = i << logt1;
                let w = self.root_pows[m + i];
                for j in j1..j1 + t {
                    let v = mont_mul(a[j + t], w, p, p_inv);
                    a[j + t] = if a[j] < v { a[j] + p - v } else { a[j] - v };
                    a[j] += v;
                    if a[j] > p {
                        a[j] -= p;
                    }
                }
            }
            m <<= 1;
        }
    }

    /// In-place inverse transform, radix-2 decimation in frequency with the
    /// Gentleman-Sande butterfly, followed by the N^(-1) scaling.
    ///
    /// Composes with `forward` to the identity on [0, p) vectors.
    pub fn inverse(&self, a: &mut [u64]) {
        debug_assert_eq!(a.len(), 1 << self.log_n);
        let n = a.len();
        let p = self.p;
        let p_inv = self.p_inv;
        let mut t = 1;
        let mut m = n;
        while m > 1 {
            let h = m >> 1;
            let mut j1 = 0;
            for i in 0..h {
                let w = self.root_inv_pows[h + i];
                for j in j1..j1 + t {
                    let mut u = a[j] + a[j + t];
                    if u > p {
                        u -= p;
                    }
                    let d = if a[j] < a[j + t] {
                        a[j] + p - a[j + t]
                    } else {
                        a[j] - a[j + t]
                    };
                    a[j] = u;
                    a[j + t] = mont_mul(d, w, p, p_inv);
                }
                j1 += t << 1;
            }
            t <<= 1;
            m >>= 1;
        }
        for x in a.iter_mut() {
            *x = mont_mul(*x, self.scaled_n_inv, p, p_inv);
        }
    }
}

/// Collects the prime factorization of `number` by trial division.
fn prime_factors(mut number: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    while number % 2 == 0 {
        factors.push(2);
        number /= 2;
    }
    let mut i = 3;
    while i * i <= number {
        while number % i == 0 {
            factors.push(i);
            number /= i;
        }
        i += 2;
    }
    if number > 1 {
        factors.push(number);
    }
    factors
}

/// Finds the smallest primitive root of the field F_p.
///
/// Tests candidates r = 2, 3, ... against every prime factor q of p - 1 and
/// accepts the first with r^((p-1)/q) != 1 throughout. A prime modulus always
/// has one, so the loop terminates.
fn primitive_root(p: u64) -> u64 {
    let phi = p - 1;
    let mut factors = prime_factors(phi);
    factors.dedup();
    let mut r = 2;
    loop {
        if factors.iter().all(|&q| pow_mod(r, phi / q, p) != 1) {
            return r;
        }
        r += 1;
    }
}

/// Returns a primitive m-th root of unity mod p.
/// Callers must have checked that m divides p - 1.
fn mth_root_of_unity(m: u64, p: u64) -> u64 {
    debug_assert_eq!((p - 1) % m, 0);
    pow_mod(primitive_root(p), (p - 1) / m, p)
}
