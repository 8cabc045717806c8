#![doc = r#"
Rustendo library crate.

This crate exposes the emulator core modules for use by binaries and tests.

Modules:
- apu: APU register stub and basic frame IRQ behavior
- bus: Bus facade coordinating CPU/PPU/APU/Controllers and timing
- cartridge: iNES loader and cartridge metadata; constructs a Mapper
- controller: NES controller abstraction
- cpu: 6502 CPU core with cycle-accurate timing for documented opcodes
- mapper: Mapper trait and mapper implementations (NROM/CNROM/MMC1/MMC3)
- ppu: PPU register interface, OAM handling, simple timing and NMI latch
- trace: nestest-style instruction trace line formatting

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

// Core emulator modules
pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod mapper;
pub(crate) mod mappers;
pub mod ppu;
pub mod ppu_bus;
pub mod trace;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::Cartridge;
pub use cpu::Cpu;

// Shared test utilities (available to integration tests and benches as well)
pub mod test_utils;
