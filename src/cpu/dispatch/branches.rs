/*!
branches.rs - Relative branch opcode handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ)

Overview
========
Executes all conditional relative branch instructions. Responsibilities:
- Compute the branch condition.
- Fetch the displacement and, if taken, update PC.
- Detect page boundary crossing and apply +1 (taken) / +2 (taken + cross) cycle adjustments
  by adding the value returned from `branch_cond` to *cycles.

Cycle Rules
===========
Base cost: 2 cycles.
If branch is taken: +1 cycle.
If branch is taken and target crosses a page boundary: +2 total (vs base).

Caller Requirements
===================
The fallback dispatcher must:
- Fetch the opcode and advance PC before invoking `handle`.
- Initialize *cycles using `base_cycles(opcode)` (2 for branch opcodes).
- Tick the bus after finalization (handlers never tick).

Return Contract
===============
`handle` returns:
- true  => opcode recognized, extra cycles already added to *cycles.
- false => not a branch opcode.

Notes
=====
No RMW behavior applies. All timing side-effects (bus tick, possible future profiling)
are handled centrally by the dispatcher.
*/

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cpu::execute::{branch_cond, get_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};

/// Attempt to execute a branch opcode.
/// Returns:
///   true  - opcode recognized and executed (extra cycles applied)
///   false - not a branch opcode
///
/// Behavior:
/// - Adds the value returned by `branch_cond` (0, 1, or 2) to *cycles.
/// - `branch_cond` internally fetches the displacement and updates PC if taken.
pub(super) fn handle<C: CpuRegs>(opcode: u8, cpu: &mut C, bus: &mut Bus, cycles: &mut u32) -> bool {
    let extra = match opcode {
        0x10 => branch_cond(cpu, bus, !get_flag(cpu, NEGATIVE)), // BPL
        0x30 => branch_cond(cpu, bus, get_flag(cpu, NEGATIVE)),  // BMI
        0x50 => branch_cond(cpu, bus, !get_flag(cpu, OVERFLOW)), // BVC
        0x70 => branch_cond(cpu, bus, get_flag(cpu, OVERFLOW)),  // BVS
        0x90 => branch_cond(cpu, bus, !get_flag(cpu, CARRY)),    // BCC
        0xB0 => branch_cond(cpu, bus, get_flag(cpu, CARRY)),     // BCS
        0xD0 => branch_cond(cpu, bus, !get_flag(cpu, ZERO)),     // BNE
        0xF0 => branch_cond(cpu, bus, get_flag(cpu, ZERO)),      // BEQ
        _ => return false,
    };
    *cycles += extra;
    true
}
