//! Fault taxonomy for the page walk engine.
//!
//! `FaultKind` is both the Rust error type returned from the fallible walk
//! procedures and the full enumeration of distinguishable translation
//! outcomes. Ordinals are part of the interface contract (§7 of the design
//! spec): `Success` is 0, every other variant is a non-zero discriminant in
//! the order given below.

use core::fmt;

/// Outcome of a page walk step or a complete translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultKind {
    /// Translation completed; never constructed as an `Err` value.
    Success = 0,
    /// Level discriminator passed to [`crate::translate`] was not 2 or 3.
    IncorrectLevel,
    /// A [`crate::reader::MemoryReader32`]/[`crate::reader::MemoryReader64`]
    /// returned fewer bytes than requested at some step.
    RamReadError,
    /// Present bit clear in a PML4E (Long mode only).
    Pml4eNotPresent,
    /// Present bit clear in a PDPTE.
    PdpteNotPresent,
    /// Present bit clear in a PDE.
    PdeNotPresent,
    /// Present bit clear in a PTE.
    PteNotPresent,
    /// U/S bit clear in a PML4E while walking on behalf of a user access.
    Pml4eSupervisor,
    /// U/S bit clear in a PDE while walking on behalf of a user access.
    PdeSupervisor,
    /// U/S bit clear in a PTE while walking on behalf of a user access.
    PteSupervisor,
    /// A PML4E has a bit set inside its must-be-zero mask (`0x300`).
    Pml4eMbz,
    /// A PDPTE has a bit set inside its reserved mask.
    PdpteReserved,
    /// A PDE has a bit set inside its reserved mask.
    PdeReserved,
    /// A PTE has a bit set inside its reserved mask.
    PteReserved,
    /// Reserved for a PSE large-page PAT policy violation.
    ///
    /// Unreachable in this model: the PAT bit of a large-page PDE/PDPTE may
    /// legitimately be either 0 or 1, so [`crate::validator::validate_entry`]
    /// never inspects it (see `DESIGN.md`, Open Question 1). The variant is
    /// kept because fault ordinals are part of the interface contract.
    PdePsePat,
    /// PAT bit set in a PAE/Long PTE; this model treats that bit as
    /// reserved-zero at the PTE level (see `DESIGN.md`, §4.3 point 5b).
    PtePaePat,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Success => write!(f, "translation succeeded"),
            FaultKind::IncorrectLevel => write!(f, "level must be 2 (legacy) or 3 (PAE)"),
            FaultKind::RamReadError => write!(f, "reader returned fewer bytes than requested"),
            FaultKind::Pml4eNotPresent => write!(f, "PML4E not present"),
            FaultKind::PdpteNotPresent => write!(f, "PDPTE not present"),
            FaultKind::PdeNotPresent => write!(f, "PDE not present"),
            FaultKind::PteNotPresent => write!(f, "PTE not present"),
            FaultKind::Pml4eSupervisor => write!(f, "PML4E is supervisor-only"),
            FaultKind::PdeSupervisor => write!(f, "PDE is supervisor-only"),
            FaultKind::PteSupervisor => write!(f, "PTE is supervisor-only"),
            FaultKind::Pml4eMbz => write!(f, "PML4E must-be-zero bits are set"),
            FaultKind::PdpteReserved => write!(f, "PDPTE reserved bits are set"),
            FaultKind::PdeReserved => write!(f, "PDE reserved bits are set"),
            FaultKind::PteReserved => write!(f, "PTE reserved bits are set"),
            FaultKind::PdePsePat => write!(f, "PSE PDE PAT policy violation"),
            FaultKind::PtePaePat => write!(f, "PTE PAT bit set where model reserves it"),
        }
    }
}

/// Convenience result alias for walk operations.
pub type Result<T> = core::result::Result<T, FaultKind>;
