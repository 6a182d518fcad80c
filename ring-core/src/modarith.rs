use num_bigint::BigInt;
use num_bigint::Sign;

/// Computes `a * b mod m` through a 128-bit intermediate.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (((a as u128) * (b as u128)) % (m as u128)) as u64
}

/// Barrett multiplication `a * b mod p`.
///
/// `pr` and `twok` come from the channel precompute: twok = 2*(floor(log2 p)+1)
/// and pr = floor(2^twok / p). The quotient estimate consumes the low and high
/// halves of the 128-bit product separately, so a single conditional
/// subtraction lands the result in [0, p) whenever both inputs are below p.
pub fn mul_mod_barrett(a: u64, b: u64, p: u64, pr: u64, twok: u32) -> u64 {
    let mul = (a as u128) * (b as u128);
    let abot = mul as u64;
    let atop = (mul >> 64) as u64;
    let mut tmp = ((abot as u128) * (pr as u128)) >> 64;
    tmp += (atop as u128) * (pr as u128);
    tmp >>= twok - 64;
    tmp *= p as u128;
    let mut r = (mul - tmp) as u64;
    if r >= p {
        r -= p;
    }
    r
}

/// Montgomery-style butterfly reduction: `t * w * 2^(-64) mod p`.
///
/// `w` is a twiddle stored pre-scaled by 2^64 mod p, so the result is the
/// plain product `t * twiddle mod p`. `p_inv` is p^(-1) mod 2^64; the low
/// half of the product cancels exactly against `q * p`, leaving the high-half
/// difference as the reduced value. Output is in [0, p) for t <= p, w < p.
#[inline]
pub fn mont_mul(t: u64, w: u64, p: u64, p_inv: u64) -> u64 {
    let u = (t as u128) * (w as u128);
    let u0 = u as u64;
    let u1 = (u >> 64) as u64;
    let q = u0.wrapping_mul(p_inv);
    let h = (((q as u128) * (p as u128)) >> 64) as u64;
    if u1 < h {
        u1 + p - h
    } else {
        u1 - h
    }
}

/// Shoup precompute for multiplication by the fixed scalar `b` mod `p`:
/// floor(b * 2^64 / p). Requires b < p.
pub fn shoup_precompute(b: u64, p: u64) -> u64 {
    (((b as u128) << 64) / (p as u128)) as u64
}

/// Multiplies `a` by the fixed scalar `b` mod `p` using its Shoup precompute.
/// Requires a < p and b < p; the quotient estimate is off by at most one, so
/// one conditional subtraction suffices.
#[inline]
pub fn mul_mod_shoup(a: u64, b: u64, b_precon: u64, p: u64) -> u64 {
    let q = (((a as u128) * (b_precon as u128)) >> 64) as u64;
    let r = a.wrapping_mul(b).wrapping_sub(q.wrapping_mul(p));
    if r >= p {
        r - p
    } else {
        r
    }
}

/// Computes `x^y mod m` by square-and-multiply.
pub fn pow_mod(mut x: u64, mut y: u64, m: u64) -> u64 {
    let mut res = 1u64;
    x %= m;
    while y > 0 {
        if y & 1 == 1 {
            res = mul_mod(res, x, m);
        }
        y >>= 1;
        x = mul_mod(x, x, m);
    }
    res
}

/// Multiplicative inverse mod a prime, via Fermat's little theorem.
pub fn inv_mod(x: u64, p: u64) -> u64 {
    pow_mod(x, p - 2, p)
}

/// Multiplicative inverse of an odd `x` mod 2^64.
///
/// The unit group of Z/2^64 has exponent 2^62, and 2^64 - 1 = -1 (mod 2^62),
/// so x^(2^64 - 1) = x^(-1). Computed with wrapping square-and-multiply.
pub fn inv_mod_2_64(x: u64) -> u64 {
    debug_assert!(x & 1 == 1);
    let mut res = 1u64;
    let mut base = x;
    let mut y = u64::MAX;
    while y > 0 {
        if y & 1 == 1 {
            res = res.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        y >>= 1;
    }
    res
}

/// Reverses all 32 bits of `x` with the halving butterfly network.
/// Callers shift right by `32 - log_n` to reverse only the low `log_n` bits.
pub fn bit_reverse(x: u32) -> u32 {
    let x = ((x & 0xaaaa_aaaa) >> 1) | ((x & 0x5555_5555) << 1);
    let x = ((x & 0xcccc_cccc) >> 2) | ((x & 0x3333_3333) << 2);
    let x = ((x & 0xf0f0_f0f0) >> 4) | ((x & 0x0f0f_0f0f) << 4);
    let x = ((x & 0xff00_ff00) >> 8) | ((x & 0x00ff_00ff) << 8);
    (x >> 16) | (x << 16)
}

/// Remainder of a signed big integer by one RNS prime, in [0, p).
///
/// Folds the magnitude's 64-bit digits most-significant-first, 32 bits at a
/// time, through the channel's Barrett constants: each step multiplies the
/// running remainder by 2^32 (which is below p, so it is a valid Barrett
/// operand) and adds the next chunk with one conditional subtraction.
pub fn rem_bigint(x: &BigInt, p: u64, pr: u64, twok: u32) -> u64 {
    debug_assert!(p > 1 << 32);
    let mut r = 0u64;
    let digits = x.magnitude().to_u64_digits();
    for &d in digits.iter().rev() {
        for c in [d >> 32, d & 0xffff_ffff] {
            r = mul_mod_barrett(r, 1 << 32, p, pr, twok);
            r += c;
            if r >= p {
                r -= p;
            }
        }
    }
    if x.sign() == Sign::Minus && r != 0 {
        p - r
    } else {
        r
    }
}
