// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs 4004 program images, interactively or from the command line, and
//! carries a built-in regression suite covering every implemented opcode.

use gumdrop::Options;
use mcs4::prelude::*;
use owo_colors::OwoColorize;
use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Options)]
struct Arguments {
    #[options(help = "Load a program image at this path", free)]
    pub file: Option<PathBuf>,
    #[options(help = "Print this help message")]
    pub help: bool,
    #[options(help = "Dump the CPU registers after each run")]
    pub debug: bool,
    #[options(help = "Print a live disassembly while running")]
    pub trace: bool,
    #[options(short = "T", help = "Run the built-in opcode regression suite, then exit")]
    pub test: bool,
    #[options(no_short, help = "Run without pacing to the 740 kHz clock")]
    pub turbo: bool,
}

/// One regression: a program image and the register pair it leaves its
/// result in
struct Case {
    name: &'static str,
    program: Vec<u8>,
    pair: usize,
    expect: u8,
}

impl Case {
    fn new(name: &'static str, program: &[u8], pair: usize, expect: u8) -> Self {
        Case {
            name,
            program: program.to_vec(),
            pair,
            expect,
        }
    }
}

/// Builds a zero-filled image of `len` bytes with `bytes` poked in at their
/// offsets. The end-of-page cases need images spanning a full 256-byte bank.
fn sparse(len: usize, bytes: &[(usize, u8)]) -> Vec<u8> {
    let mut image = vec![0; len];
    for &(offset, byte) in bytes {
        image[offset] = byte;
    }
    image
}

#[rustfmt::skip]
fn cases() -> Vec<Case> {
    vec![
        Case::new("fim0",         &[0x20, 0xA1],                               0, 0xA1),
        Case::new("fim1",         &[0x22, 0xB2],                               1, 0xB2),
        Case::new("fim2",         &[0x24, 0xC3],                               2, 0xC3),
        Case::new("fim3",         &[0x26, 0xD4],                               3, 0xD4),
        Case::new("fim4",         &[0x28, 0xE5],                               4, 0xE5),
        Case::new("fim5",         &[0x2A, 0xF6],                               5, 0xF6),
        Case::new("fim6",         &[0x2C, 0x07],                               6, 0x07),
        Case::new("fim7",         &[0x2E, 0xAF],                               7, 0xAF),
        Case::new("jcn_taken",    &[0x14, 0x04, 0x2A, 0xFF, 0x2A, 0x55],       5, 0x55),
        Case::new("jcn_inverted", &[0x1C, 0x06, 0x2A, 0x77, 0x00, 0x00],       5, 0x77),
        Case::new("jun",          &[0x40, 0x04, 0x28, 0xFF, 0x28, 0xDD],       4, 0xDD),
        Case::new("jun_far",      &[0x40, 0xFF],                               0, 0x00),
        Case::new("jms",          &[0x50, 0x04, 0x28, 0xFF, 0x28, 0xDD],       4, 0xDD),
        Case::new("jin",          &[0x20, 0x06, 0x31, 0x2A, 0xFF, 0x00, 0x00, 0x2A, 0x2D],
                                                                               5, 0x2D),
        Case::new("fin",          &[0x20, 0x04, 0x32, 0x00, 0xAA],             1, 0xAA),
        Case::new("inc",          &[0x2E, 0x04, 0x6F],                         7, 0x05),
        Case::new("inc_wrap",     &[0x24, 0xF0, 0x64, 0x65],                   2, 0x01),
        Case::new("isz_jump",     &[0x2C, 0xED, 0x7D, 0x06, 0x2C, 0x00],       6, 0xEE),
        Case::new("isz_zero",     &[0x2C, 0xDF, 0x7D, 0x08, 0x2A, 0xDD, 0x00, 0x00],
                                                                               5, 0xDD),
        // fin rp1 parked on the last byte of bank 0 fetches from bank 1
        Case {
            name: "fin_eop",
            program: sparse(0x103, &[(0, 0x20), (1, 0x02), (2, 0x40), (3, 0xFF),
                                     (0xFF, 0x32), (0x102, 0xBC)]),
            pair: 1, expect: 0xBC,
        },
        // jin rp0 on the last byte of bank 0 jumps into bank 1
        Case {
            name: "jin_eop",
            program: sparse(0x108, &[(0, 0x20), (1, 0x05), (2, 0x40), (3, 0xFF),
                                     (0xFF, 0x31), (0x106, 0x2A), (0x107, 0x99)]),
            pair: 5, expect: 0x99,
        },
    ]
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    if options.test {
        let failed = run_suite(&options);
        std::process::exit(if failed > 0 { 1 } else { 0 });
    }

    let throttle = if options.turbo {
        Throttle::unlimited()
    } else {
        Throttle::realtime()
    };
    let mut system = Mcs4::new(throttle);
    system.cpu.trace = options.trace;

    if let Some(path) = &options.file {
        run_rom(&mut system, path, &options);
        return Ok(());
    }

    loop {
        print!("mcs4> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            "test" => {
                run_suite(&options);
            }
            path => run_rom(&mut system, Path::new(path), &options),
        }
    }
    Ok(())
}

/// Loads and runs one program image, reporting any fault in red
fn run_rom(system: &mut Mcs4, path: &Path, options: &Arguments) {
    match system.run(path) {
        Ok(system) => {
            println!("ran {} for {} cycles", path.display(), system.cpu.cycles());
            if options.debug {
                system.cpu.dump();
            }
        }
        Err(error) => eprintln!("{}", error.bold().red()),
    }
}

/// Runs every [Case] on a fresh unthrottled system. Returns the number of
/// failures.
fn run_suite(options: &Arguments) -> usize {
    let cases = cases();
    let mut failed = 0;
    for case in &cases {
        let mut system = Mcs4::new(Throttle::unlimited());
        system.cpu.trace = options.trace;
        let outcome = system
            .run_bytes(&case.program)
            .and_then(|system| system.cpu.pair(case.pair));
        match outcome {
            Ok(value) if value == case.expect => {
                println!("{} {}", "PASSED".green(), case.name);
            }
            Ok(value) => {
                failed += 1;
                println!(
                    "{} {}: rp{} holds {:02x}, wanted {:02x}",
                    "FAILED".red(),
                    case.name,
                    case.pair,
                    value,
                    case.expect
                );
            }
            Err(error) => {
                failed += 1;
                println!("{} {}: {}", "FAILED".red(), case.name, error);
            }
        }
        if options.debug {
            system.cpu.dump();
        }
    }
    println!("{} of {} tests passed", cases.len() - failed, cases.len());
    failed
}
