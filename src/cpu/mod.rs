/*!
cpu::mod - Public façade for the 6502 CPU core.

This module organizes the CPU core into focused files rather than one
monolithic dispatcher:

    state.rs        - Core CPU state (registers, flags) + constructors.
    regs.rs         - `CpuRegs` trait giving dispatch/execute code a generic
                      register + flag interface over `CpuState`.
    addressing.rs   - Addressing mode operand resolution helpers.
    execute.rs      - Instruction semantic helpers (ALU, stack, RMW, branch).
    cycles.rs       - Base cycle-count table and RMW classification.
    table.rs        - Feature-gated (`table_dispatch`) opcode metadata table.
    dispatch/       - Per-step orchestration (DMA/IRQ/NMI) plus opcode family
                      handlers (load_store, logical, arithmetic, compare,
                      branches, rmw, control_flow, misc) dispatched by a
                      closed `match` over the opcode byte.
    core/           - `Cpu` façade wrapping `CpuState` with the public API.

Only the stable public surface (`Cpu`) is re-exported here; downstream code
should not rely on internal module layout.

Feature flags:
    table_dispatch  - Consults an opcode metadata table before the
                      match-based dispatcher for the opcodes it covers.
                      Off by default; the match dispatcher alone is
                      authoritative and covers every documented opcode.
*/

pub mod addressing;
pub mod core;
pub mod cycles;
pub(crate) mod dispatch;
pub mod execute;
pub mod mnemonics;
pub mod regs;
pub mod state;

#[cfg(feature = "table_dispatch")]
pub mod table;
#[cfg(not(feature = "table_dispatch"))]
mod table;

pub use core::Cpu;
