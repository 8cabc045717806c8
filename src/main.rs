#![doc = r#"
CPU trace tool - runs a ROM and prints or verifies a nestest-style instruction trace.

Mirrors the reference `cpu_trace` tool: load an iNES ROM, execute instructions
one at a time, and either print each trace line or compare it against a
reference log (nestest.log convention).
"#]

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nes6502::bus::Bus;
use nes6502::cartridge::Cartridge;
use nes6502::cpu::Cpu;
use nes6502::trace;

const NESTEST_START_PC: u16 = 0xC000;
const NESTEST_INITIAL_SP: u8 = 0xFD;
const NESTEST_INITIAL_STATUS: u8 = 0x24;
const NESTEST_OFFICIAL_OPCODES_END: usize = 5003;
const DEFAULT_MAX_INSTRUCTIONS: usize = 10_000;

const NESTEST_ROM_PATH: &str = "roms/nestest.nes";
const NESTEST_LOG_PATH: &str = "logs/nestest.log";
const NESTEST_ERROR_LOG: &str = "logs/nestest_errors.log";

/// CPU trace tool - outputs execution logs for any ROM.
#[derive(Parser, Debug)]
#[command(name = "nes6502-trace", version, about)]
struct Args {
    /// Path to an iNES ROM file.
    rom: Option<PathBuf>,

    /// Compare against a reference log (nestest.log convention).
    #[arg(short = 'c', long = "compare")]
    compare: Option<PathBuf>,

    /// Max instructions to execute.
    #[arg(short = 'n', long = "max", default_value_t = DEFAULT_MAX_INSTRUCTIONS)]
    max: usize,

    /// Override start PC (hex, e.g. C000), instead of the reset vector.
    #[arg(long = "pc")]
    pc: Option<String>,

    /// Use nestest automation mode (roms/nestest.nes + logs/nestest.log by default).
    #[arg(long = "nestest")]
    nestest: bool,

    /// Write trace to file instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Suppress trace output (useful with --compare).
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Step mode: Enter=step, c=continue, q=quit.
    #[arg(short = 's', long = "step")]
    step: bool,
}

fn main() -> ExitCode {
    let mut args = Args::parse();

    if args.nestest {
        if args.rom.is_none() {
            args.rom = Some(PathBuf::from(NESTEST_ROM_PATH));
        }
        if args.compare.is_none() {
            args.compare = Some(PathBuf::from(NESTEST_LOG_PATH));
        }
    }

    let Some(rom_path) = args.rom.clone() else {
        eprintln!("Error: ROM path required\n");
        return ExitCode::FAILURE;
    };

    match run(&args, &rom_path) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, rom_path: &PathBuf) -> io::Result<ExitCode> {
    let cart = Cartridge::from_ines_file(rom_path)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if !args.quiet {
        println!(
            "ROM loaded: mapper {}, {:?} mirroring",
            cart.mapper_id(),
            cart.mirroring()
        );
    }

    let mut bus = Bus::new();
    bus.attach_cartridge(cart);

    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);

    let mut official_only = false;

    if args.nestest {
        print!("Test official opcodes only? (y/n): ");
        io::stdout().flush()?;
        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        official_only = matches!(response.trim(), "y" | "Y");

        cpu.set_pc(NESTEST_START_PC);
        cpu.set_sp(NESTEST_INITIAL_SP);
        cpu.set_status(NESTEST_INITIAL_STATUS);
        if !args.quiet {
            println!(
                "\nNestest mode: PC=${:04X}, SP=${:02X}, P=${:02X}",
                cpu.pc(),
                cpu.sp(),
                cpu.status()
            );
            println!(
                "Testing: {} opcodes",
                if official_only { "official only" } else { "all (official + unofficial)" }
            );
        }
    } else if let Some(pc_str) = &args.pc {
        let pc = u16::from_str_radix(pc_str, 16)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid PC (expected hex)"))?;
        cpu.set_pc(pc);
        if !args.quiet {
            println!("\nStarting at PC=${:04X} (custom)", cpu.pc());
        }
    } else if !args.quiet {
        println!("\nStarting at PC=${:04X} (reset vector)", cpu.pc());
    }

    let mut output_file: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout()),
    };

    let mut reference_lines = Vec::new();
    if let Some(compare_path) = &args.compare {
        match fs::read_to_string(compare_path) {
            Ok(contents) => reference_lines = contents.lines().map(str::to_owned).collect(),
            Err(e) => {
                eprintln!("Warning: Could not open comparison log: {compare_path:?} ({e})");
                eprintln!("Running without comparison.\n");
            }
        }
    }
    let comparing = !reference_lines.is_empty();

    let mut error_log: Option<fs::File> = if comparing {
        match fs::File::create(NESTEST_ERROR_LOG) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("Warning: Could not open error log: {NESTEST_ERROR_LOG} ({e})");
                None
            }
        }
    } else {
        None
    };

    let mut instruction_count = 0usize;
    let mut mismatches = 0usize;
    let mut first_mismatch_line = 0usize;
    let mut stepping = args.step;
    let mut running = true;

    if stepping {
        println!("Step mode: Enter=step, c=continue, q=quit\n");
    }

    while running && instruction_count < args.max {
        let cpu_log = trace::format_line(&cpu, &mut bus);

        if comparing {
            if let Some(ref_line) = reference_lines.get(instruction_count) {
                if let Some(expected) = trace::parse_log_line(ref_line) {
                    let diffs = trace::compare_state(&cpu, &expected);
                    if !diffs.is_empty() {
                        mismatches += 1;
                        if first_mismatch_line == 0 {
                            first_mismatch_line = instruction_count + 1;
                        }
                        if let Some(log) = error_log.as_mut() {
                            writeln!(
                                log,
                                "Line {}: mismatch\nCPU:      {}\nExpected: {}",
                                instruction_count + 1,
                                cpu_log,
                                ref_line
                            )?;
                        }
                        if official_only && first_mismatch_line <= NESTEST_OFFICIAL_OPCODES_END {
                            break;
                        }
                        if !official_only && first_mismatch_line > NESTEST_OFFICIAL_OPCODES_END {
                            running = false;
                            break;
                        }
                    }
                }
            }
        }

        if !args.quiet && !comparing {
            writeln!(output_file, "{cpu_log}")?;
        }

        if stepping {
            println!("{cpu_log}");
            print!("[{}] ", instruction_count + 1);
            io::stdout().flush()?;
            let mut input = String::new();
            if io::stdin().lock().read_line(&mut input)? == 0 {
                running = false;
                break;
            }
            match input.trim() {
                "c" | "C" => {
                    stepping = false;
                    println!("Continuing...");
                }
                "q" | "Q" => {
                    println!("Quit.");
                    running = false;
                    break;
                }
                _ => {}
            }
        }

        cpu.step(&mut bus);
        instruction_count += 1;

        if args.nestest {
            if official_only && instruction_count >= NESTEST_OFFICIAL_OPCODES_END {
                running = false;
            }
            if !official_only && instruction_count > 8991 {
                running = false;
            }
            if bus.read(cpu.pc()) == 0x00 && cpu.pc() < NESTEST_START_PC {
                if !args.quiet {
                    println!("\nHit BRK at ${:04X}, stopping.", cpu.pc());
                }
                running = false;
            }
        }

        if cpu.is_halted() {
            if !args.quiet {
                println!("\nCPU halted (unimplemented opcode) at ${:04X}.", cpu.pc());
            }
            running = false;
        }
    }

    if !args.quiet {
        println!("\n=== Results ===");
        println!("Instructions executed: {instruction_count}");
    }

    let mut exit_code = ExitCode::SUCCESS;

    if comparing {
        if mismatches == 0 {
            println!("\nPASSED: no mismatches");
        } else if args.nestest && !official_only && first_mismatch_line > NESTEST_OFFICIAL_OPCODES_END
        {
            println!("\nPASSED: all official opcodes correct");
            println!("FAILED: unofficial opcode mismatch at line {first_mismatch_line}");
            println!("See {NESTEST_ERROR_LOG} for details");
        } else {
            println!("\nFAILED: {mismatches} mismatches (first at line {first_mismatch_line})");
            println!("See {NESTEST_ERROR_LOG} for details");
            exit_code = ExitCode::FAILURE;
        }
    }

    Ok(exit_code)
}
