#![doc = r#"
trace - nestest-style CPU instruction trace line formatting and log comparison.

Produces and parses lines of the form:

    C000  4C F5 C5  JMP   A:00 X:00 Y:00 P:24 SP:FD CYC:7

matching the de facto `nestest.log` convention: 4-digit PC, up to three
instruction bytes (padded with spaces to a fixed width), mnemonic padded to
4 columns, then register/flag/cycle fields.
"#]

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::cpu::mnemonics::opcode_meta;

/// Format one trace line for the instruction about to execute at `cpu.pc()`.
///
/// Reads (but does not execute) the opcode and its operand bytes from `bus`,
/// so this must be called *before* `cpu.step(bus)` for the instruction it
/// describes.
pub fn format_line(cpu: &Cpu, bus: &mut Bus) -> String {
    let pc = cpu.pc();
    let opcode = bus.read(pc);
    let meta = opcode_meta(opcode);

    let mut bytes = [0u8; 3];
    bytes[0] = opcode;
    if meta.len > 1 {
        bytes[1] = bus.read(pc.wrapping_add(1));
    }
    if meta.len > 2 {
        bytes[2] = bus.read(pc.wrapping_add(2));
    }

    let byte_str = match meta.len {
        1 => format!("{:02X}      ", bytes[0]),
        2 => format!("{:02X} {:02X}   ", bytes[0], bytes[1]),
        3 => format!("{:02X} {:02X} {:02X}", bytes[0], bytes[1], bytes[2]),
        _ => "??      ".to_string(),
    };

    format!(
        "{:04X}  {}  {:<4}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        pc,
        byte_str,
        meta.name,
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status(),
        cpu.sp(),
        bus.total_ticks(),
    )
}

/// Parsed register snapshot from a reference trace line, used for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
}

/// Parse a single reference log line into a [`LogEntry`].
///
/// Tolerant of any text following the `SP:xx` field (e.g. `nestest.log`'s
/// trailing PPU/CYC columns), and of leading whitespace before the PC.
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let trimmed = line.trim_start();
    let pc_str = trimmed.get(0..4)?;
    let pc = u16::from_str_radix(pc_str, 16).ok()?;

    let a_pos = line.find("A:")?;
    let rest = &line[a_pos..];

    let a = parse_hex_field(rest, "A:")?;
    let x = parse_hex_field(rest, "X:")?;
    let y = parse_hex_field(rest, "Y:")?;
    let p = parse_hex_field(rest, "P:")?;
    let sp = parse_hex_field(rest, "SP:")?;

    Some(LogEntry { pc, a, x, y, p, sp })
}

fn parse_hex_field(haystack: &str, label: &str) -> Option<u8> {
    let pos = haystack.find(label)?;
    let start = pos + label.len();
    let value_str = haystack.get(start..start + 2)?;
    u8::from_str_radix(value_str, 16).ok()
}

/// A single register-field mismatch between emulated and expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Pc { expected: u16, actual: u16 },
    A { expected: u8, actual: u8 },
    X { expected: u8, actual: u8 },
    Y { expected: u8, actual: u8 },
    P { expected: u8, actual: u8 },
    Sp { expected: u8, actual: u8 },
}

/// Compare the CPU's current architectural state against a parsed reference entry.
/// Returns every mismatching field (empty if the state matches exactly).
pub fn compare_state(cpu: &Cpu, expected: &LogEntry) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();
    if cpu.pc() != expected.pc {
        mismatches.push(Mismatch::Pc {
            expected: expected.pc,
            actual: cpu.pc(),
        });
    }
    if cpu.a() != expected.a {
        mismatches.push(Mismatch::A {
            expected: expected.a,
            actual: cpu.a(),
        });
    }
    if cpu.x() != expected.x {
        mismatches.push(Mismatch::X {
            expected: expected.x,
            actual: cpu.x(),
        });
    }
    if cpu.y() != expected.y {
        mismatches.push(Mismatch::Y {
            expected: expected.y,
            actual: cpu.y(),
        });
    }
    if cpu.status() != expected.p {
        mismatches.push(Mismatch::P {
            expected: expected.p,
            actual: cpu.status(),
        });
    }
    if cpu.sp() != expected.sp {
        mismatches.push(Mismatch::Sp {
            expected: expected.sp,
            actual: cpu.sp(),
        });
    }
    mismatches
}
