use num_bigint::BigInt;
use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::crt::{center_mod, CrtBasis};
use crate::error::RingError;
use crate::modarith::{mul_mod_barrett, rem_bigint};
use crate::ntt::NttChannel;
use crate::primes::{MAX_LOG_N, NTT_PRIMES};

/// A polynomial held as RNS residues in the NTT domain.
///
/// `data` is `np * N` residues with channel i occupying `[i*N, (i+1)*N)`, in
/// the bit-reversed order the forward transform produces. Buffers are only
/// meaningful to the engine (and channel count) that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NttBuffer {
    np: usize,
    data: Vec<u64>,
}

impl NttBuffer {
    /// Number of RNS channels the buffer carries.
    pub fn channels(&self) -> usize {
        self.np
    }

    /// Raw residues, channel-major.
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }
}

/// The multiplication engine for R = Z[X]/(X^N + 1) with coefficients
/// reduced modulo a caller-supplied Q.
///
/// Construction derives N = 2^log_n and the channel count
/// L = ceil((2 + log_n + 4*log_q) / 59), then builds every channel's
/// transform tables and every CRT level eagerly. All tables are read-only
/// afterwards, so one engine can be shared freely across threads; every
/// operation allocates its own scratch buffers and returns only after its
/// parallel regions have completed.
#[derive(Debug)]
pub struct RingEngine {
    log_n: usize,
    n: usize,
    channels: Vec<NttChannel>,
    crt: CrtBasis,
}

impl RingEngine {
    /// Builds an engine for ring degree 2^log_n supporting coefficient
    /// moduli up to log_q bits.
    pub fn new(log_n: usize, log_q: usize) -> Result<Self, RingError> {
        if log_n < 1 || log_n > MAX_LOG_N || log_q < 1 {
            return Err(RingError::BadParameters { log_n, log_q });
        }
        let n = 1usize << log_n;
        let bound = 2 + log_n + 4 * log_q;
        let nprimes = (bound + 58) / 59;
        if nprimes > NTT_PRIMES.len() {
            return Err(RingError::PrimeTableExhausted {
                required: nprimes,
                available: NTT_PRIMES.len(),
            });
        }
        let channels = NTT_PRIMES[..nprimes]
            .iter()
            .map(|&p| NttChannel::new(p, log_n))
            .collect::<Result<Vec<_>, _>>()?;
        let crt = CrtBasis::new(&NTT_PRIMES[..nprimes]);
        debug!(log_n, log_q, channels = nprimes, "ring engine initialized");
        Ok(RingEngine {
            log_n,
            n,
            channels,
            crt,
        })
    }

    /// Ring degree N.
    pub fn degree(&self) -> usize {
        self.n
    }

    /// Largest usable channel count L.
    pub fn max_channels(&self) -> usize {
        self.channels.len()
    }

    fn check_np(&self, np: usize) -> Result<(), RingError> {
        if np < 1 || np > self.channels.len() {
            return Err(RingError::BadChannelCount {
                np,
                max: self.channels.len(),
            });
        }
        Ok(())
    }

    fn check_buffer(&self, r: &NttBuffer, np: usize) -> Result<(), RingError> {
        if r.np != np || r.data.len() != np * self.n {
            return Err(RingError::BadChannelCount {
                np: r.np,
                max: self.channels.len(),
            });
        }
        Ok(())
    }

    /// Reduces one polynomial into channel residues, in [0, p).
    fn project(&self, ch: &NttChannel, a: &[BigInt], out: &mut [u64]) {
        for (r, c) in out.iter_mut().zip(a) {
            *r = rem_bigint(c, ch.p, ch.pr, ch.twok);
        }
    }

    /// Lifts time-domain residues back to centered big integers mod `q`.
    fn reconstruct(&self, rx: &[u64], np: usize, q: &BigInt, x: &mut [BigInt]) {
        let level = self.crt.level(np);
        let log_n = self.log_n;
        x.par_iter_mut().enumerate().for_each(|(j, xj)| {
            let lifted = level.lift((0..np).map(|i| rx[j + (i << log_n)]));
            *xj = center_mod(&lifted, q);
        });
    }

    /// Projects `a` onto `np` channels and forward-transforms each one,
    /// yielding an operand reusable across many products.
    pub fn to_ntt(&self, a: &[BigInt], np: usize) -> Result<NttBuffer, RingError> {
        self.check_np(np)?;
        assert_eq!(a.len(), self.n, "polynomial length must equal ring degree");
        let n = self.n;
        let mut data = vec![0u64; np * n];
        data.par_chunks_exact_mut(n)
            .zip(self.channels[..np].par_iter())
            .for_each(|(rai, ch)| {
                self.project(ch, a, rai);
                ch.forward(rai);
            });
        Ok(NttBuffer { np, data })
    }

    /// Inverse-transforms every channel of `ra` and reconstructs the centered
    /// polynomial mod `q`.
    pub fn from_ntt(&self, ra: &NttBuffer, q: &BigInt) -> Result<Vec<BigInt>, RingError> {
        let np = ra.np;
        self.check_np(np)?;
        self.check_buffer(ra, np)?;
        let n = self.n;
        let mut rx = ra.data.clone();
        rx.par_chunks_exact_mut(n)
            .zip(self.channels[..np].par_iter())
            .for_each(|(rxi, ch)| ch.inverse(rxi));
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }

    /// x <- a * b mod (X^N + 1, q), output centered into (-q/2, q/2].
    pub fn multiply(
        &self,
        a: &[BigInt],
        b: &[BigInt],
        np: usize,
        q: &BigInt,
    ) -> Result<Vec<BigInt>, RingError> {
        self.check_np(np)?;
        assert_eq!(a.len(), self.n, "polynomial length must equal ring degree");
        assert_eq!(b.len(), self.n, "polynomial length must equal ring degree");
        let n = self.n;
        let mut ra = vec![0u64; np * n];
        let mut rb = vec![0u64; np * n];
        let mut rx = vec![0u64; np * n];
        ra.par_chunks_exact_mut(n)
            .zip(rb.par_chunks_exact_mut(n))
            .zip(rx.par_chunks_exact_mut(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|(((rai, rbi), rxi), ch)| {
                self.project(ch, a, rai);
                self.project(ch, b, rbi);
                ch.forward(rai);
                ch.forward(rbi);
                pointwise_mul(rai, rbi, rxi, ch);
                ch.inverse(rxi);
            });
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }

    /// a <- a * b mod (X^N + 1, q).
    pub fn multiply_in_place(
        &self,
        a: &mut [BigInt],
        b: &[BigInt],
        np: usize,
        q: &BigInt,
    ) -> Result<(), RingError> {
        let x = self.multiply(a, b, np, q)?;
        for (dst, src) in a.iter_mut().zip(x) {
            *dst = src;
        }
        Ok(())
    }

    /// x <- a * b where `rb` is b already projected and transformed.
    pub fn multiply_ntt(
        &self,
        a: &[BigInt],
        rb: &NttBuffer,
        np: usize,
        q: &BigInt,
    ) -> Result<Vec<BigInt>, RingError> {
        self.check_np(np)?;
        self.check_buffer(rb, np)?;
        assert_eq!(a.len(), self.n, "polynomial length must equal ring degree");
        let n = self.n;
        let mut ra = vec![0u64; np * n];
        let mut rx = vec![0u64; np * n];
        ra.par_chunks_exact_mut(n)
            .zip(rx.par_chunks_exact_mut(n))
            .zip(rb.data.par_chunks_exact(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|(((rai, rxi), rbi), ch)| {
                self.project(ch, a, rai);
                ch.forward(rai);
                pointwise_mul(rai, rbi, rxi, ch);
                ch.inverse(rxi);
            });
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }

    /// a <- a * b with b pre-transformed.
    pub fn multiply_ntt_in_place(
        &self,
        a: &mut [BigInt],
        rb: &NttBuffer,
        np: usize,
        q: &BigInt,
    ) -> Result<(), RingError> {
        let x = self.multiply_ntt(a, rb, np, q)?;
        for (dst, src) in a.iter_mut().zip(x) {
            *dst = src;
        }
        Ok(())
    }

    /// x <- a * b with both operands pre-transformed.
    pub fn multiply_both_ntt(
        &self,
        ra: &NttBuffer,
        rb: &NttBuffer,
        np: usize,
        q: &BigInt,
    ) -> Result<Vec<BigInt>, RingError> {
        self.check_np(np)?;
        self.check_buffer(ra, np)?;
        self.check_buffer(rb, np)?;
        let n = self.n;
        let mut rx = vec![0u64; np * n];
        rx.par_chunks_exact_mut(n)
            .zip(ra.data.par_chunks_exact(n))
            .zip(rb.data.par_chunks_exact(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|(((rxi, rai), rbi), ch)| {
                pointwise_mul(rai, rbi, rxi, ch);
                ch.inverse(rxi);
            });
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }

    /// Channelwise sum of two NTT-domain operands, staying in the NTT domain.
    pub fn add_ntt(&self, ra: &NttBuffer, rb: &NttBuffer, np: usize) -> Result<NttBuffer, RingError> {
        self.check_np(np)?;
        self.check_buffer(ra, np)?;
        self.check_buffer(rb, np)?;
        let n = self.n;
        let mut data = vec![0u64; np * n];
        data.par_chunks_exact_mut(n)
            .zip(ra.data.par_chunks_exact(n))
            .zip(rb.data.par_chunks_exact(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|(((resi, rai), rbi), ch)| {
                for ((r, &u), &v) in resi.iter_mut().zip(rai).zip(rbi) {
                    let mut s = u + v;
                    if s > ch.p {
                        s -= ch.p;
                    }
                    *r = s;
                }
            });
        Ok(NttBuffer { np, data })
    }

    /// x <- a * a mod (X^N + 1, q).
    pub fn square(&self, a: &[BigInt], np: usize, q: &BigInt) -> Result<Vec<BigInt>, RingError> {
        self.check_np(np)?;
        assert_eq!(a.len(), self.n, "polynomial length must equal ring degree");
        let n = self.n;
        let mut ra = vec![0u64; np * n];
        let mut rx = vec![0u64; np * n];
        ra.par_chunks_exact_mut(n)
            .zip(rx.par_chunks_exact_mut(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|((rai, rxi), ch)| {
                self.project(ch, a, rai);
                ch.forward(rai);
                pointwise_mul(rai, rai, rxi, ch);
                ch.inverse(rxi);
            });
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }

    /// a <- a * a mod (X^N + 1, q).
    pub fn square_in_place(&self, a: &mut [BigInt], np: usize, q: &BigInt) -> Result<(), RingError> {
        let x = self.square(a, np, q)?;
        for (dst, src) in a.iter_mut().zip(x) {
            *dst = src;
        }
        Ok(())
    }

    /// x <- a * a with a pre-transformed.
    pub fn square_ntt(&self, ra: &NttBuffer, np: usize, q: &BigInt) -> Result<Vec<BigInt>, RingError> {
        self.check_np(np)?;
        self.check_buffer(ra, np)?;
        let n = self.n;
        let mut rx = vec![0u64; np * n];
        rx.par_chunks_exact_mut(n)
            .zip(ra.data.par_chunks_exact(n))
            .zip(self.channels[..np].par_iter())
            .for_each(|((rxi, rai), ch)| {
                pointwise_mul(rai, rai, rxi, ch);
                ch.inverse(rxi);
            });
        let mut x = vec![BigInt::zero(); n];
        self.reconstruct(&rx, np, q, &mut x);
        Ok(x)
    }
}

/// Elementwise Barrett product of two channel slices.
fn pointwise_mul(ra: &[u64], rb: &[u64], out: &mut [u64], ch: &NttChannel) {
    for ((x, &u), &v) in out.iter_mut().zip(ra).zip(rb) {
        *x = mul_mod_barrett(u, v, ch.p, ch.pr, ch.twok);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn poly(coeffs: &[i64]) -> Vec<BigInt> {
        coeffs.iter().map(|&c| BigInt::from(c)).collect()
    }

    /// Reference negacyclic product over exact integers, centered mod q.
    fn schoolbook(a: &[BigInt], b: &[BigInt], q: &BigInt) -> Vec<BigInt> {
        let n = a.len();
        let mut acc = vec![BigInt::zero(); n];
        for i in 0..n {
            for j in 0..n {
                let prod = &a[i] * &b[j];
                let k = (i + j) % n;
                if i + j < n {
                    acc[k] += prod;
                } else {
                    acc[k] -= prod;
                }
            }
        }
        acc.iter().map(|c| center_mod(c, q)).collect()
    }

    fn small_engine() -> (RingEngine, BigInt) {
        // N = 4, q = 2^30.
        (RingEngine::new(2, 30).unwrap(), BigInt::from(1u64 << 30))
    }

    #[test]
    fn test_identity_times_x() {
        let (eng, q) = small_engine();
        let x = eng
            .multiply(&poly(&[1, 0, 0, 0]), &poly(&[0, 1, 0, 0]), 1, &q)
            .unwrap();
        assert_eq!(x, poly(&[0, 1, 0, 0]));
    }

    #[test]
    fn test_x_cubed_squared_wraps_negatively() {
        // X^3 * X^3 = X^6 = -X^2 in Z[X]/(X^4 + 1).
        let (eng, q) = small_engine();
        let x = eng
            .multiply(&poly(&[0, 0, 0, 1]), &poly(&[0, 0, 0, 1]), 1, &q)
            .unwrap();
        assert_eq!(x, poly(&[0, 0, -1, 0]));
    }

    #[test]
    fn test_difference_of_squares() {
        let (eng, q) = small_engine();
        let x = eng
            .multiply(&poly(&[1, 1, 0, 0]), &poly(&[1, -1, 0, 0]), 1, &q)
            .unwrap();
        assert_eq!(x, poly(&[1, 0, -1, 0]));
    }

    #[test]
    fn test_square_of_all_ones() {
        let (eng, q) = small_engine();
        let x = eng.square(&poly(&[1, 1, 1, 1]), 1, &q).unwrap();
        assert_eq!(x, poly(&[-2, 0, 2, 4]));
    }

    #[test]
    fn test_add_ntt_roundtrip() {
        let (eng, q) = small_engine();
        let ra = eng.to_ntt(&poly(&[3, 0, 0, 0]), 2).unwrap();
        let rb = eng.to_ntt(&poly(&[4, 0, 0, 0]), 2).unwrap();
        let rc = eng.add_ntt(&ra, &rb, 2).unwrap();
        assert_eq!(eng.from_ntt(&rc, &q).unwrap(), poly(&[7, 0, 0, 0]));
    }

    #[test]
    fn test_multiply_near_modulus() {
        // (q - 1) * 2 = 2q - 2 = -2 (mod q); the centered representative.
        let (eng, q) = small_engine();
        let a: Vec<BigInt> = vec![
            &q - 1,
            BigInt::zero(),
            BigInt::zero(),
            BigInt::zero(),
        ];
        let x = eng.multiply(&a, &poly(&[2, 0, 0, 0]), 2, &q).unwrap();
        assert_eq!(x, poly(&[-2, 0, 0, 0]));
    }

    #[test]
    fn test_addition_matches_coefficient_sum() {
        let (eng, q) = small_engine();
        let a = poly(&[5, -3, 17, 200]);
        let b = poly(&[-4, 8, 1, -200]);
        let ra = eng.to_ntt(&a, 2).unwrap();
        let rb = eng.to_ntt(&b, 2).unwrap();
        let sum = eng
            .from_ntt(&eng.add_ntt(&ra, &rb, 2).unwrap(), &q)
            .unwrap();
        assert_eq!(sum, poly(&[1, 5, 18, 0]));
    }

    #[test]
    fn test_square_matches_multiply() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let eng = RingEngine::new(4, 40).unwrap();
        let q = BigInt::from(1u64 << 40);
        let a: Vec<BigInt> = (0..16)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 18)..1 << 18)))
            .collect();
        let np = eng.max_channels();
        let sq = eng.square(&a, np, &q).unwrap();
        let mul = eng.multiply(&a, &a, np, &q).unwrap();
        assert_eq!(sq, mul);
    }

    #[test]
    fn test_pre_ntt_variants_agree() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let eng = RingEngine::new(3, 40).unwrap();
        let q = BigInt::from((1u64 << 40) - 87);
        let a: Vec<BigInt> = (0..8)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 18)..1 << 18)))
            .collect();
        let b: Vec<BigInt> = (0..8)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 18)..1 << 18)))
            .collect();
        let np = 2;
        let plain = eng.multiply(&a, &b, np, &q).unwrap();
        let rb = eng.to_ntt(&b, np).unwrap();
        assert_eq!(eng.multiply_ntt(&a, &rb, np, &q).unwrap(), plain);
        let ra = eng.to_ntt(&a, np).unwrap();
        assert_eq!(eng.multiply_both_ntt(&ra, &rb, np, &q).unwrap(), plain);
        assert_eq!(eng.square_ntt(&ra, np, &q).unwrap(), eng.square(&a, np, &q).unwrap());
    }

    #[test]
    fn test_in_place_variants_agree() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let eng = RingEngine::new(3, 40).unwrap();
        let q = BigInt::from(1u64 << 40);
        let a: Vec<BigInt> = (0..8)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 18)..1 << 18)))
            .collect();
        let b: Vec<BigInt> = (0..8)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 18)..1 << 18)))
            .collect();
        let np = 2;

        let want = eng.multiply(&a, &b, np, &q).unwrap();
        let mut got = a.clone();
        eng.multiply_in_place(&mut got, &b, np, &q).unwrap();
        assert_eq!(got, want);

        let rb = eng.to_ntt(&b, np).unwrap();
        let mut got = a.clone();
        eng.multiply_ntt_in_place(&mut got, &rb, np, &q).unwrap();
        assert_eq!(got, want);

        let want = eng.square(&a, np, &q).unwrap();
        let mut got = a.clone();
        eng.square_in_place(&mut got, np, &q).unwrap();
        assert_eq!(got, want);
    }

    #[test]
    fn test_matches_schoolbook_multi_channel() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let eng = RingEngine::new(4, 50).unwrap();
        let q = BigInt::from((1u64 << 50) - 27);
        for np in 1..=4 {
            let a: Vec<BigInt> = (0..16)
                .map(|_| BigInt::from(rng.gen_range(-(1i64 << 22)..1 << 22)))
                .collect();
            let b: Vec<BigInt> = (0..16)
                .map(|_| BigInt::from(rng.gen_range(-(1i64 << 22)..1 << 22)))
                .collect();
            let got = eng.multiply(&a, &b, np, &q).unwrap();
            assert_eq!(got, schoolbook(&a, &b, &q), "np = {}", np);
        }
    }

    #[test]
    fn test_big_coefficients_need_many_channels() {
        // ~128-bit coefficients force genuinely multi-word CRT lifts.
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let eng = RingEngine::new(4, 70).unwrap();
        assert!(eng.max_channels() >= 5);
        let q = BigInt::from(1u8) << 270;
        let wide = |rng: &mut ChaCha8Rng| -> BigInt {
            let hi = BigInt::from(rng.gen::<u64>());
            let lo = BigInt::from(rng.gen::<u64>());
            let sign = if rng.gen::<bool>() { 1 } else { -1 };
            ((hi << 64) + lo) * sign
        };
        let a: Vec<BigInt> = (0..16).map(|_| wide(&mut rng)).collect();
        let b: Vec<BigInt> = (0..16).map(|_| wide(&mut rng)).collect();
        let np = 5;
        let got = eng.multiply(&a, &b, np, &q).unwrap();
        assert_eq!(got, schoolbook(&a, &b, &q));
    }

    #[test]
    fn test_large_degree_against_schoolbook() {
        // N = 2^12 with np = 4 exercises the multi-channel path at scale;
        // the reference convolution fits comfortably in i128.
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        let log_n = 12;
        let n = 1usize << log_n;
        let eng = RingEngine::new(log_n, 60).unwrap();
        assert!(eng.max_channels() >= 4);
        let q = BigInt::from(1u64) << 60;
        let av: Vec<i64> = (0..n).map(|_| rng.gen_range(-(1i64 << 20)..1 << 20)).collect();
        let bv: Vec<i64> = (0..n).map(|_| rng.gen_range(-(1i64 << 20)..1 << 20)).collect();
        let mut exp = vec![0i128; n];
        for i in 0..n {
            for j in 0..n {
                let prod = av[i] as i128 * bv[j] as i128;
                let k = (i + j) % n;
                if i + j < n {
                    exp[k] += prod;
                } else {
                    exp[k] -= prod;
                }
            }
        }
        let a: Vec<BigInt> = av.iter().map(|&c| BigInt::from(c)).collect();
        let b: Vec<BigInt> = bv.iter().map(|&c| BigInt::from(c)).collect();
        let got = eng.multiply(&a, &b, 4, &q).unwrap();
        // |exp[k]| <= N * 2^40 = 2^52 < q/2, so no wrap is expected.
        for k in 0..n {
            assert_eq!(got[k], BigInt::from(exp[k]), "coefficient {}", k);
        }
    }

    #[test]
    fn test_outputs_are_centered() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let eng = RingEngine::new(4, 30).unwrap();
        let q = BigInt::from((1u64 << 30) + 1);
        let half = &q / 2;
        let a: Vec<BigInt> = (0..16)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 29)..1 << 29)))
            .collect();
        let b: Vec<BigInt> = (0..16)
            .map(|_| BigInt::from(rng.gen_range(-(1i64 << 29)..1 << 29)))
            .collect();
        let x = eng.multiply(&a, &b, eng.max_channels(), &q).unwrap();
        for c in &x {
            assert!(*c > -&half - 1 && *c <= half, "coefficient {} escapes the centered range", c);
        }
    }

    #[test]
    fn test_bad_parameters() {
        assert_eq!(
            RingEngine::new(0, 30).unwrap_err(),
            RingError::BadParameters { log_n: 0, log_q: 30 }
        );
        assert_eq!(
            RingEngine::new(3, 0).unwrap_err(),
            RingError::BadParameters { log_n: 3, log_q: 0 }
        );
        assert_eq!(
            RingEngine::new(17, 30).unwrap_err(),
            RingError::BadParameters { log_n: 17, log_q: 30 }
        );
        match RingEngine::new(2, 100_000).unwrap_err() {
            RingError::PrimeTableExhausted { required, available } => {
                assert!(required > available);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_bad_channel_count() {
        let (eng, q) = small_engine();
        let a = poly(&[1, 0, 0, 0]);
        let max = eng.max_channels();
        assert_eq!(
            eng.multiply(&a, &a, 0, &q).unwrap_err(),
            RingError::BadChannelCount { np: 0, max }
        );
        assert_eq!(
            eng.multiply(&a, &a, max + 1, &q).unwrap_err(),
            RingError::BadChannelCount { np: max + 1, max }
        );
        // A buffer built for one channel count is rejected at another.
        let ra = eng.to_ntt(&a, 1).unwrap();
        assert_eq!(
            eng.multiply_ntt(&a, &ra, 2, &q).unwrap_err(),
            RingError::BadChannelCount { np: 1, max }
        );
    }
}
