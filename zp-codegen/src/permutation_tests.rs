use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zp_core::{Register, Registers, MAX_VALUE};
use zp_machine::Program;
use zp_rng::RandomStream;

use crate::error::CodegenError;
use crate::permutation::{Permutation, RegisterLayout};
use crate::round::BITS;

fn permutation(rounds: u32, seed: &[u8]) -> Permutation {
    Permutation::generate(rounds, &mut RandomStream::from_seed(seed.to_vec())).unwrap()
}

fn inputs(n: usize) -> Vec<(u16, u16)> {
    let mut rng = ChaCha8Rng::seed_from_u64(30);
    let mut v = vec![(0, 0), (MAX_VALUE, MAX_VALUE), (1, 0), (0, 1)];
    while v.len() < n {
        v.push((rng.gen_range(0..=MAX_VALUE), rng.gen_range(0..=MAX_VALUE)));
    }
    v
}

fn run_layout(program: &Program, layout: &RegisterLayout, a: u16, b: u16) -> Registers {
    let start = Registers::from_pairs([(layout.value_a, a as u32), (layout.value_b, b as u32)]).unwrap();
    program.run(start).unwrap()
}

#[test]
fn zero_rounds_is_rejected() {
    let mut stream = RandomStream::from_seed(b"zero".to_vec());
    assert_eq!(
        Permutation::generate(0, &mut stream).unwrap_err(),
        CodegenError::ZeroRounds
    );
}

#[test]
fn layout_registers_must_differ() {
    use Register::*;
    assert!(RegisterLayout::new(Ammo, Gems, Score).is_ok());
    assert_eq!(
        RegisterLayout::new(Ammo, Ammo, Score).unwrap_err(),
        CodegenError::DuplicateRegister(Ammo)
    );
    assert_eq!(
        RegisterLayout::new(Ammo, Gems, Gems).unwrap_err(),
        CodegenError::DuplicateRegister(Gems)
    );
    assert_eq!(
        RegisterLayout::new(Torches, Gems, Torches).unwrap_err(),
        CodegenError::DuplicateRegister(Torches)
    );
}

#[test]
fn rounds_are_drawn_in_order_from_one_stream() {
    let p = permutation(3, b"in-order");
    let mut stream = RandomStream::from_seed(b"in-order".to_vec());
    let first = crate::round::Round::generate(&mut stream).unwrap();
    assert_eq!(p.rounds().len(), 3);
    assert_eq!(p.rounds()[0], first);
    assert_ne!(p.rounds()[0], p.rounds()[1]);
}

#[test]
fn fixup_tail_only_when_braid_is_out_of_phase() {
    let layout = RegisterLayout::default();
    for rounds in 1..=6u32 {
        let code = permutation(rounds, b"phase").generate_code(&layout, "").unwrap();
        // Tail lines move score into a value register; wrapping adds stay in one register.
        let tail = code
            .lines()
            .filter(|l| l.starts_with("#take score ") && l.contains(" give ") && !l.contains(" give score "))
            .count();
        if rounds % 3 == 0 {
            assert_eq!(tail, 0, "rounds={}", rounds);
        } else {
            assert_eq!(tail, BITS, "rounds={}", rounds);
        }
    }
}

#[test]
fn one_label_per_bit_per_round() {
    let code = permutation(4, b"labels").generate_code(&RegisterLayout::default(), "x").unwrap();
    let labels: Vec<&str> = code.lines().filter(|l| l.starts_with(':')).collect();
    assert_eq!(labels.len(), 4 * BITS);
    assert!(labels.iter().all(|l| l.starts_with(":x")));
}

#[test]
fn prefixes_that_approach_command_words_still_run() {
    let layout = RegisterLayout::default();
    for prefix in ["tak", "giv", "ta", "t"] {
        let p = permutation(3, b"keyword-prefix");
        let code = p.generate_code(&layout, prefix).unwrap();
        assert!(!code.lines().any(|l| l == ":take" || l == ":give"), "prefix {:?}", prefix);
        let program = Program::parse(&code).unwrap();
        for (a, b) in inputs(50) {
            let out = run_layout(&program, &layout, a, b);
            assert_eq!((out.get(layout.value_a), out.get(layout.value_b)), p.evaluate(a, b));
        }
    }
}

#[test]
fn invalid_label_prefix_is_rejected() {
    let p = permutation(1, b"prefix");
    assert!(matches!(
        p.generate_code(&RegisterLayout::default(), "no:colons"),
        Err(CodegenError::InvalidLabelPrefix(_))
    ));
}

#[test]
fn program_matches_evaluate_for_every_phase() {
    let layout = RegisterLayout::default();
    for rounds in 1..=4u32 {
        let p = permutation(rounds, b"cross-check");
        let program = Program::parse(&p.generate_code(&layout, "").unwrap()).unwrap();
        for (a, b) in inputs(200) {
            let out = run_layout(&program, &layout, a, b);
            assert_eq!(
                (out.get(layout.value_a), out.get(layout.value_b)),
                p.evaluate(a, b),
                "rounds={} input=({}, {})",
                rounds,
                a,
                b
            );
            assert_eq!(out.get(layout.temp), 0);
        }
    }
}

#[test]
fn custom_layout_leaves_other_registers_alone() {
    let layout = RegisterLayout::new(Register::Torches, Register::Health, Register::Gems).unwrap();
    let p = permutation(5, b"custom");
    let program = Program::parse(&p.generate_code(&layout, "").unwrap()).unwrap();
    for (a, b) in inputs(50) {
        let start = Registers::from_pairs([
            (Register::Torches, a as u32),
            (Register::Health, b as u32),
            (Register::Ammo, 1234),
            (Register::Score, 4321),
        ])
        .unwrap();
        let out = program.run(start).unwrap();
        assert_eq!((out.get(Register::Torches), out.get(Register::Health)), p.evaluate(a, b));
        assert_eq!(out.get(Register::Gems), 0);
        assert_eq!(out.get(Register::Ammo), 1234);
        assert_eq!(out.get(Register::Score), 4321);
    }
}

#[test]
fn prefixed_blocks_concatenate() {
    let layout = RegisterLayout::default();
    let first = permutation(2, b"block-1");
    let second = permutation(2, b"block-2");
    let mut code = first.generate_code(&layout, "p1_").unwrap();
    code.push_str(&second.generate_code(&layout, "p2_").unwrap());
    let program = Program::parse(&code).unwrap();

    for (a, b) in inputs(50) {
        let (a1, b1) = first.evaluate(a, b);
        let out = run_layout(&program, &layout, a, b);
        assert_eq!((out.get(Register::Ammo), out.get(Register::Gems)), second.evaluate(a1, b1));
    }
}

#[test]
fn same_prefix_blocks_collide() {
    let layout = RegisterLayout::default();
    let mut code = permutation(1, b"a").generate_code(&layout, "").unwrap();
    code.push_str(&permutation(1, b"b").generate_code(&layout, "").unwrap());
    assert!(Program::parse(&code).is_err());
}

#[test]
fn generated_programs_terminate_quickly() {
    let layout = RegisterLayout::default();
    let program = Program::parse(&permutation(6, b"steps").generate_code(&layout, "").unwrap()).unwrap();
    // At most one wrapping add, then four instructions per bit, per round.
    let bound = 6 * (2 + BITS as u64 * 5);
    for (a, b) in inputs(20) {
        let start = Registers::from_pairs([(Register::Ammo, a as u32), (Register::Gems, b as u32)]).unwrap();
        assert!(program.execute(start, Some(bound)).is_ok());
    }
}

#[test]
fn evaluate_is_injective_on_a_slice() {
    let p = permutation(3, b"injective");
    let mut seen = std::collections::HashSet::new();
    for a in 0..4u16 {
        for b in 0..=MAX_VALUE {
            assert!(seen.insert(p.evaluate(a, b)), "collision at ({}, {})", a, b);
        }
    }
}
