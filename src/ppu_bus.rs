#![doc = r#"
Compatibility shim for the PPU bus interface.

Re-exports the `PpuBus` trait centralized on `Bus` so PPU rendering code can
keep importing `crate::ppu_bus::PpuBus` rather than depend on `bus` directly.
"#]

pub use crate::bus::PpuBus;
