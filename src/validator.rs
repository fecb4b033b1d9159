//! Stateless entry validation shared by all three walk procedures.
//!
//! `validate_entry` checks a freshly read paging-structure entry against a
//! mode/level context and returns `Ok` or a [`FaultKind`]. The check
//! ordering below is load-bearing: a present-bit fault always pre-empts a
//! reserved-bit fault on the same entry, matching the design spec's
//! tie-break table (§4.3).

use crate::error::FaultKind;
use crate::layout::{EntryLayout, P, PML4E_MBZ, PS, PTE_PAT, RW, US};

/// Which paging-structure level an entry belongs to.
///
/// Used only to pick the level-appropriate `FaultKind` variant; the actual
/// bit layout is supplied separately via an [`EntryLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pml4e,
    Pdpte,
    Pde,
    Pte,
}

/// Whether an entry at a PS-capable level is being read as a leaf (large
/// page) or as a pointer to the next table (small page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Small,
    Large,
}

/// Validate one raw entry word against its level/page-size context.
///
/// `has_us` is false exactly at PDPTE (PAE and Long both model the PDPTE
/// shape without R/W or U/S bits, per the design spec's layout catalog);
/// it is true everywhere else. `is_pml4e` selects the Long-mode MBZ check,
/// which exists nowhere else in the taxonomy.
pub fn validate_entry(
    entry: u64,
    level: Level,
    page_size: PageSize,
    layout: &EntryLayout,
    has_us: bool,
) -> Result<(), FaultKind> {
    if entry & (1 << P) == 0 {
        return Err(not_present(level));
    }

    if has_us && entry & (1 << US) == 0 {
        return Err(supervisor(level));
    }

    if level == Level::Pml4e && entry & PML4E_MBZ != 0 {
        return Err(FaultKind::Pml4eMbz);
    }

    match page_size {
        PageSize::Large => {
            if entry & layout.reserved_mask != 0 {
                return Err(reserved(level));
            }
            // PAT polarity is an open question resolved against the source:
            // the large-page PAT bit may legitimately be 0 or 1, so it is
            // not inspected here (see `DESIGN.md`, Open Question 1).
        }
        PageSize::Small => {
            if entry & layout.reserved_mask != 0 {
                return Err(reserved(level));
            }
            if level == Level::Pte && entry & (1 << PTE_PAT) != 0 && layout.addr_end > 31 {
                // PAE/Long PTE only: this model treats the PAT bit as
                // reserved-zero rather than a legitimate caching hint.
                return Err(FaultKind::PtePaePat);
            }
        }
    }

    // RW is not separately validated here; it constrains writes, not
    // translation reachability, and is out of scope (§7: no #PF error-code
    // synthesis, no write-permission modeling beyond U/S).
    let _ = RW;
    let _ = PS;

    Ok(())
}

fn not_present(level: Level) -> FaultKind {
    match level {
        Level::Pml4e => FaultKind::Pml4eNotPresent,
        Level::Pdpte => FaultKind::PdpteNotPresent,
        Level::Pde => FaultKind::PdeNotPresent,
        Level::Pte => FaultKind::PteNotPresent,
    }
}

fn supervisor(level: Level) -> FaultKind {
    match level {
        Level::Pml4e => FaultKind::Pml4eSupervisor,
        Level::Pde => FaultKind::PdeSupervisor,
        Level::Pte => FaultKind::PteSupervisor,
        Level::Pdpte => unreachable!("PDPTE has no U/S bit in this model"),
    }
}

fn reserved(level: Level) -> FaultKind {
    match level {
        Level::Pdpte => FaultKind::PdpteReserved,
        Level::Pde => FaultKind::PdeReserved,
        Level::Pte => FaultKind::PteReserved,
        Level::Pml4e => unreachable!("PML4E reserved bits are reported as Pml4eMbz"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;

    #[test]
    fn not_present_is_reported_before_anything_else() {
        // Present clear, and reserved bits also set: present must win.
        let entry = layout::PAE_PDE_SMALL.reserved_mask;
        let err = validate_entry(
            entry,
            Level::Pde,
            PageSize::Small,
            &layout::PAE_PDE_SMALL,
            true,
        )
        .unwrap_err();
        assert_eq!(err, FaultKind::PdeNotPresent);
    }

    #[test]
    fn reserved_bits_fault_on_an_otherwise_valid_entry() {
        let entry = 0x1 | layout::PAE_PDE_SMALL.reserved_mask;
        let err = validate_entry(
            entry,
            Level::Pde,
            PageSize::Small,
            &layout::PAE_PDE_SMALL,
            true,
        )
        .unwrap_err();
        assert_eq!(err, FaultKind::PdeReserved);
    }

    #[test]
    fn pml4e_mbz_is_distinct_from_reserved() {
        let entry = 0x1 | PML4E_MBZ;
        let err = validate_entry(entry, Level::Pml4e, PageSize::Small, &layout::LONG_PML4E, true)
            .unwrap_err();
        assert_eq!(err, FaultKind::Pml4eMbz);
    }

    #[test]
    fn pdpte_has_no_supervisor_check() {
        // U/S bit (bit 2) clear; PDPTE must not fault for it.
        let entry = 0x1;
        assert!(validate_entry(
            entry,
            Level::Pdpte,
            PageSize::Small,
            &layout::PAE_PDPTE,
            false,
        )
        .is_ok());
    }

    #[test]
    fn large_page_pat_bit_is_never_inspected() {
        let entry_pat_set = 0x1 | 0x3 | (1 << 12);
        let entry_pat_clear = 0x1 | 0x3;
        assert!(validate_entry(
            entry_pat_set,
            Level::Pde,
            PageSize::Large,
            &layout::PAE_PDE_LARGE,
            true,
        )
        .is_ok());
        assert!(validate_entry(
            entry_pat_clear,
            Level::Pde,
            PageSize::Large,
            &layout::PAE_PDE_LARGE,
            true,
        )
        .is_ok());
    }

    #[test]
    fn pae_pte_pat_bit_faults() {
        let entry = 0x1 | 0x3 | (1 << PTE_PAT);
        let err =
            validate_entry(entry, Level::Pte, PageSize::Small, &layout::PAE_PTE, true)
                .unwrap_err();
        assert_eq!(err, FaultKind::PtePaePat);
    }

    #[test]
    fn legacy_pte_pat_bit_does_not_fault() {
        let entry = 0x1 | 0x3 | (1 << PTE_PAT);
        assert!(validate_entry(
            entry,
            Level::Pte,
            PageSize::Small,
            &layout::LEGACY32_PTE,
            true,
        )
        .is_ok());
    }
}
