//! Simulated physical memory read collaborators.
//!
//! Two distinct arities exist because the Legacy and PAE walks compute
//! physical addresses entirely within 32 bits (the CR3 shape and the PDPT
//! base are both 32-bit), while Long mode addresses memory with a 64-bit
//! physical base throughout. Widening the 32-bit path to 64 bits would blur
//! that distinction, so two small traits are kept rather than one generic
//! one (see `DESIGN.md`, "Reader abstraction").

/// Reads guest physical memory addressed with a 32-bit base.
///
/// Used by the Legacy 32-bit and PAE walkers. `buf` is always 4 bytes
/// (Legacy PDE/PTE) or 8 bytes (PAE PDPTE/PDE/PTE); the return value is the
/// number of bytes actually written into `buf`. A return value strictly
/// less than `buf.len()` is treated as a hard I/O failure and surfaces as
/// [`crate::error::FaultKind::RamReadError`].
pub trait MemoryReader32 {
    /// Read `buf.len()` bytes from `phys_addr`, little-endian.
    fn read(&self, buf: &mut [u8], phys_addr: u32) -> usize;
}

/// Reads guest physical memory addressed with a 64-bit base.
///
/// Used by the 4-level Long Mode walker. Same contract as
/// [`MemoryReader32`], just over a wider physical address.
pub trait MemoryReader64 {
    /// Read `buf.len()` bytes from `phys_addr`, little-endian.
    fn read(&self, buf: &mut [u8], phys_addr: u64) -> usize;
}

/// Read a little-endian `u32` entry, failing with `RamReadError` on a short read.
pub(crate) fn read_u32(reader: &dyn MemoryReader32, phys_addr: u32) -> crate::error::Result<u32> {
    let mut buf = [0u8; 4];
    if reader.read(&mut buf, phys_addr) < buf.len() {
        return Err(crate::error::FaultKind::RamReadError);
    }
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian `u64` entry via the 32-bit-addressed reader.
pub(crate) fn read_u64_narrow(
    reader: &dyn MemoryReader32,
    phys_addr: u32,
) -> crate::error::Result<u64> {
    let mut buf = [0u8; 8];
    if reader.read(&mut buf, phys_addr) < buf.len() {
        return Err(crate::error::FaultKind::RamReadError);
    }
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian `u64` entry via the 64-bit-addressed reader.
pub(crate) fn read_u64(reader: &dyn MemoryReader64, phys_addr: u64) -> crate::error::Result<u64> {
    let mut buf = [0u8; 8];
    if reader.read(&mut buf, phys_addr) < buf.len() {
        return Err(crate::error::FaultKind::RamReadError);
    }
    Ok(u64::from_le_bytes(buf))
}
