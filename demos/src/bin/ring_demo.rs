use num_bigint::BigInt;
use rand::rngs::OsRng;
use rand::Rng;
use ring_core::RingEngine;

fn show(label: &str, coeffs: &[BigInt]) {
    let rendered: Vec<String> = coeffs.iter().map(|c| c.to_string()).collect();
    println!("{}: [{}]", label, rendered.join(", "));
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("RNS/NTT Ring Multiplication Example");
    println!("===================================");

    // N = 8, coefficient moduli up to 50 bits.
    let engine = RingEngine::new(3, 50).expect("valid parameters");
    let q = BigInt::from(1u64 << 50);
    let np = 2;
    println!(
        "Ring degree N = {}, {} of {} RNS channels in use",
        engine.degree(),
        np,
        engine.max_channels()
    );

    // (1 + X)(1 - X) = 1 - X^2 in Z[X]/(X^8 + 1).
    let a: Vec<BigInt> = [1, 1, 0, 0, 0, 0, 0, 0].iter().map(|&c| BigInt::from(c)).collect();
    let b: Vec<BigInt> = [1, -1, 0, 0, 0, 0, 0, 0].iter().map(|&c| BigInt::from(c)).collect();
    println!("\nMultiplying in big-integer form:");
    show("a", &a);
    show("b", &b);
    let x = engine.multiply(&a, &b, np, &q).expect("multiply");
    show("a*b", &x);

    // Reusing a pre-transformed operand across several products.
    println!("\nReusing a pre-transformed operand:");
    let rb = engine.to_ntt(&b, np).expect("transform");
    let x1 = engine.multiply_ntt(&a, &rb, np, &q).expect("multiply_ntt");
    show("a*b (pre-NTT b)", &x1);
    let sq = engine.square(&a, np, &q).expect("square");
    show("a^2", &sq);

    // Adding while staying in the NTT domain.
    println!("\nAdding in the NTT domain:");
    let ra = engine.to_ntt(&a, np).expect("transform");
    let rc = engine.add_ntt(&ra, &rb, np).expect("add_ntt");
    let sum = engine.from_ntt(&rc, &q).expect("from_ntt");
    show("a+b", &sum);

    // A larger random product, checked against itself via the in-place path.
    println!("\nRandom product with in-place variant:");
    let mut rng = OsRng;
    let r1: Vec<BigInt> = (0..8).map(|_| BigInt::from(rng.gen_range(-1000i64..1000))).collect();
    let r2: Vec<BigInt> = (0..8).map(|_| BigInt::from(rng.gen_range(-1000i64..1000))).collect();
    let owned = engine.multiply(&r1, &r2, np, &q).expect("multiply");
    let mut in_place = r1.clone();
    engine
        .multiply_in_place(&mut in_place, &r2, np, &q)
        .expect("multiply_in_place");
    show("r1*r2", &owned);
    if owned == in_place {
        println!("In-place and value-returning paths agree!");
    } else {
        println!("Mismatch between in-place and value-returning paths!");
    }
}
