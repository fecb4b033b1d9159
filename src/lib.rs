//! A pure, side-effect-free model of the x86/x86-64 MMU page-walk.
//!
//! Given a virtual address, a CR3-equivalent root, and a collaborator that
//! fetches raw bytes from simulated physical memory, [`translate`] and
//! [`translate_long`] reproduce the exact sequence of table lookups, bit
//! decodings, and reserved-bit/present-bit/privilege checks a real CPU
//! performs, returning either a resolved physical address or a precise
//! [`FaultKind`].
//!
//! Three paging modes are modeled:
//!
//! - **Legacy 32-bit** (2-level): CR3 → PDE\[31:22\] → PTE\[21:12\], 4 KiB
//!   pages, or a PSE 4 MiB large page terminating at the PDE.
//! - **PAE** (3-level): CR3 → PDPTE\[31:30\] → PDE\[29:21\] → PTE\[20:12\],
//!   4 KiB pages, or a 2 MiB large page terminating at the PDE.
//! - **Long Mode** (4-level): CR3 → PML4E\[47:39\] → PDPTE\[38:30\] →
//!   PDE\[29:21\] → PTE\[20:12\], 4 KiB pages, with 1 GiB (PDPTE) and 2 MiB
//!   (PDE) large-page early termination.
//!
//! Out of scope: TLB caching, A/D write-back, SMEP/SMAP beyond the U/S
//! check modeled here, EPT, LA57, PKU, shadow paging, and `#PF`
//! error-code synthesis — a semantic [`FaultKind`] is returned instead.
#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod layout;
pub mod reader;
pub mod validator;
pub mod walk;

pub use error::FaultKind;
pub use reader::{MemoryReader32, MemoryReader64};

/// Which of the three architectural paging state machines a walk uses.
///
/// Not part of the public `translate`/`translate_long` signatures (those
/// keep the original two-entry-point shape named in the design spec), but
/// exposed for callers that want a typed alternative to the raw `level`
/// discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    /// Classic 2-level 32-bit paging, selected by `level == 2`.
    Legacy32,
    /// Physical Address Extension, 3-level, selected by `level == 3`.
    Pae,
    /// 4-level Long Mode paging, reached only through [`translate_long`].
    Long4Level,
}

impl PagingMode {
    /// Map a `level` discriminator (2 or 3) to a 32-bit-rooted paging mode.
    fn from_level(level: u8) -> Option<PagingMode> {
        match level {
            2 => Some(PagingMode::Legacy32),
            3 => Some(PagingMode::Pae),
            _ => None,
        }
    }
}

/// Translate a virtual address through a Legacy 32-bit or PAE page table.
///
/// `level` selects the mode: `2` for Legacy 32-bit, `3` for PAE. Any other
/// value is rejected with [`FaultKind::IncorrectLevel`] before `reader` is
/// ever called. The result is always wide enough to hold a PAE physical
/// address (up to 52 bits); Legacy results fit in the low 32 bits.
pub fn translate(
    virt_addr: u32,
    level: u8,
    cr3: u32,
    reader: &dyn MemoryReader32,
) -> Result<u64, FaultKind> {
    match PagingMode::from_level(level) {
        Some(PagingMode::Legacy32) => {
            walk::walk_legacy32(virt_addr, cr3, reader).map(u64::from)
        }
        Some(PagingMode::Pae) => walk::walk_pae(virt_addr, cr3, reader),
        _ => Err(FaultKind::IncorrectLevel),
    }
}

/// Translate a virtual address through a 4-level Long Mode page table.
pub fn translate_long(
    virt_addr: u64,
    cr3: u64,
    reader: &dyn MemoryReader64,
) -> Result<u64, FaultKind> {
    walk::walk_long(virt_addr, cr3, reader)
}
