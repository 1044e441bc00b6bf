//! zp: CLI binary for Feistel permutation programs.
//!
//! Subcommands:
//! - generate
//! - run

use std::env;
use std::fs;
use std::process;

use zp_codegen::RegisterLayout;
use zp_core::{Config, LoggingConfig, Register, Registers};
use zp_logging::{GenerateEventV1, NdjsonWriter, RunEventV1, EVENT_SCHEMA_VERSION};
use zp_machine::Program;
use zp_rng::RandomStream;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    process::exit(1);
}

/// Value following the flag at `args[i]`.
fn flag_value<'a>(args: &'a [String], i: usize) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => fail(format!("Missing value for {}", args[i])),
    }
}

fn parse_registers(text: &str) -> (Register, Register, Register) {
    let regs: Vec<Register> = text
        .split(',')
        .map(|name| {
            name.trim()
                .parse::<Register>()
                .unwrap_or_else(|e| fail(format!("Invalid --registers value: {}", e)))
        })
        .collect();
    match regs.as_slice() {
        [a, b, t] => (*a, *b, *t),
        _ => fail(format!("--registers expects A,B,TEMP, got {:?}", text)),
    }
}

fn open_events(path: &str, logging: &LoggingConfig) -> NdjsonWriter {
    NdjsonWriter::open_append_with_flush(path, logging.flush_every_lines)
        .unwrap_or_else(|e| fail(format!("Failed to open event log {}: {}", path, e)))
}

fn cmd_generate(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut rounds: Option<u32> = None;
    let mut seed: Option<String> = None;
    let mut registers: Option<(Register, Register, Register)> = None;
    let mut label_prefix: Option<String> = None;
    let mut out: Option<String> = None;
    let mut events: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"zp generate

USAGE:
    zp generate [--config PATH] [--rounds N] [--seed HEX] [--registers A,B,TEMP]
                [--label-prefix P] [--out PATH] [--events PATH]

OPTIONS:
    --config PATH        YAML config (flags override its generate section)
    --rounds N           Number of Feistel rounds (required here or in config)
    --seed HEX           Hex seed (default: fresh OS entropy)
    --registers A,B,T    Value registers and scratch register (default: ammo,gems,score)
    --label-prefix P     Prefix for generated labels (default: empty)
    --out PATH           Write the program here instead of stdout
    --events PATH        Append a generate event to this NDJSON file
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--rounds" => {
                let v = flag_value(args, i);
                rounds = Some(
                    v.parse()
                        .unwrap_or_else(|_| fail(format!("Invalid --rounds value: {}", v))),
                );
                i += 2;
            }
            "--seed" => {
                seed = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--registers" => {
                registers = Some(parse_registers(flag_value(args, i)));
                i += 2;
            }
            "--label-prefix" => {
                label_prefix = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--out" => {
                out = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--events" => {
                events = Some(flag_value(args, i).to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `zp generate`: {}", other);
                fail("Run `zp generate --help` for usage.");
            }
        }
    }

    let mut cfg = match &config_path {
        Some(path) => Config::load(path)
            .unwrap_or_else(|e| fail(format!("Failed to load config {}: {}", path, e))),
        None => Config::default(),
    };
    let g = &mut cfg.generate;
    if rounds.is_some() {
        g.rounds = rounds;
    }
    if seed.is_some() {
        g.seed = seed;
    }
    if let Some((a, b, t)) = registers {
        g.value_register_a = a;
        g.value_register_b = b;
        g.temp_register = t;
    }
    if let Some(p) = label_prefix {
        g.label_prefix = p;
    }
    if cfg.generate.rounds.is_none() {
        fail("Missing --rounds (or generate.rounds in --config)");
    }
    cfg.validate()
        .unwrap_or_else(|e| fail(format!("Invalid configuration: {}", e)));

    let g = &cfg.generate;
    let rounds = g
        .required_rounds()
        .unwrap_or_else(|e| fail(format!("Invalid configuration: {}", e)));
    let seed_bytes = g
        .seed_bytes()
        .unwrap_or_else(|e| fail(format!("Invalid seed: {}", e)));
    let layout = RegisterLayout::new(g.value_register_a, g.value_register_b, g.temp_register)
        .unwrap_or_else(|e| fail(e));
    let mut stream = RandomStream::new(seed_bytes.as_deref());
    let code = zp_codegen::generate_with(rounds, &mut stream, layout, &g.label_prefix)
        .unwrap_or_else(|e| fail(format!("Generation failed: {}", e)));

    match &out {
        Some(path) => fs::write(path, &code)
            .unwrap_or_else(|e| fail(format!("Failed to write {}: {}", path, e))),
        None => print!("{}", code),
    }

    if let Some(path) = events.or_else(|| cfg.logging.events_path.clone()) {
        let mut w = open_events(&path, &cfg.logging);
        let ev = GenerateEventV1 {
            event: GenerateEventV1::EVENT,
            ts_ms: zp_logging::now_ms(),
            schema_version: EVENT_SCHEMA_VERSION,
            rounds,
            seed_hex: hex::encode(stream.seed()),
            seed_given: seed_bytes.is_some(),
            value_register_a: layout.value_a,
            value_register_b: layout.value_b,
            temp_register: layout.temp,
            label_prefix: g.label_prefix.clone(),
            program_hash: zp_logging::hash_program(&code),
            program_lines: code.lines().count(),
        };
        w.write_event(&ev)
            .and_then(|_| w.flush())
            .unwrap_or_else(|e| fail(format!("Failed to write event log {}: {}", path, e)));
    }
}

fn cmd_run(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut program_path: Option<String> = None;
    let mut sets: Vec<(Register, u32)> = Vec::new();
    let mut max_steps: Option<u64> = None;
    let mut events: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"zp run

USAGE:
    zp run --program PATH [--set REG=VALUE]... [--max-steps N] [--config PATH] [--events PATH]

OPTIONS:
    --program PATH       Program text to execute
    --set REG=VALUE      Initial register value (repeatable; unset registers are 0)
    --max-steps N        Abort after N executed instructions (default: unbounded)
    --config PATH        YAML config (run.max_steps, logging)
    --events PATH        Append a run event to this NDJSON file
"#
                );
                return;
            }
            "--program" => {
                program_path = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--set" => {
                let v = flag_value(args, i);
                let (name, value) = v
                    .split_once('=')
                    .unwrap_or_else(|| fail(format!("--set expects REG=VALUE, got {:?}", v)));
                let register = name
                    .parse::<Register>()
                    .unwrap_or_else(|e| fail(format!("Invalid --set value: {}", e)));
                let value = value
                    .parse::<u32>()
                    .unwrap_or_else(|_| fail(format!("Invalid --set value: {}", v)));
                sets.push((register, value));
                i += 2;
            }
            "--max-steps" => {
                let v = flag_value(args, i);
                max_steps = Some(
                    v.parse()
                        .unwrap_or_else(|_| fail(format!("Invalid --max-steps value: {}", v))),
                );
                i += 2;
            }
            "--config" => {
                config_path = Some(flag_value(args, i).to_string());
                i += 2;
            }
            "--events" => {
                events = Some(flag_value(args, i).to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `zp run`: {}", other);
                fail("Run `zp run --help` for usage.");
            }
        }
    }

    let cfg = config_path.as_ref().map(|path| {
        let cfg = Config::load(path)
            .unwrap_or_else(|e| fail(format!("Failed to load config {}: {}", path, e)));
        cfg.validate()
            .unwrap_or_else(|e| fail(format!("Invalid configuration: {}", e)));
        cfg
    });
    let max_steps = max_steps.or_else(|| cfg.as_ref().and_then(|c| c.run.max_steps));
    if max_steps == Some(0) {
        fail("--max-steps must be >= 1");
    }

    let program_path = program_path.unwrap_or_else(|| fail("Missing --program"));
    let text = fs::read_to_string(&program_path)
        .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", program_path, e)));
    let program = Program::parse(&text)
        .unwrap_or_else(|e| fail(format!("Failed to parse {}: {}", program_path, e)));
    let initial =
        Registers::from_pairs(sets).unwrap_or_else(|e| fail(format!("Invalid --set value: {}", e)));

    let execution = program
        .execute(initial, max_steps)
        .unwrap_or_else(|e| fail(format!("Run failed: {}", e)));

    for (register, value) in execution.registers.iter() {
        println!("{}={}", register, value);
    }

    let logging = cfg.map(|c| c.logging).unwrap_or_default();
    if let Some(path) = events.or_else(|| logging.events_path.clone()) {
        let mut w = open_events(&path, &logging);
        let ev = RunEventV1 {
            event: RunEventV1::EVENT,
            ts_ms: zp_logging::now_ms(),
            schema_version: EVENT_SCHEMA_VERSION,
            program_hash: zp_logging::hash_program(&text),
            instructions: program.len(),
            steps: execution.steps,
            initial,
            final_registers: execution.registers,
        };
        w.write_event(&ev)
            .and_then(|_| w.flush())
            .unwrap_or_else(|e| fail(format!("Failed to write event log {}: {}", path, e)));
    }
}

fn print_help() {
    eprintln!(
        r#"zp - Feistel permutations for a give/take counter machine

USAGE:
    zp <COMMAND> [OPTIONS]

COMMANDS:
    generate            Generate a permutation program
    run                 Run a program and print the final registers

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `zp <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("zp {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "generate" => {
            cmd_generate(&args[2..]);
        }
        "run" => {
            cmd_run(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            fail("Run `zp --help` for usage.");
        }
    }
}
