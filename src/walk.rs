//! The three mode-specific walk procedures.
//!
//! Each procedure threads virtual-address bit-slices through successive
//! table lookups until it reaches a leaf — a terminal PTE, or an early
//! large-page termination at PDE/PDPTE — or a validation step faults. The
//! three procedures are free functions with near-identical shape rather
//! than one generic walker, following the teacher's own `walk_2level` /
//! `walk_pae` / `walk_4level` split: the bit widths genuinely differ per
//! mode and a shared abstraction would obscure more than it saves.

use crate::error::{FaultKind, Result};
use crate::layout;
use crate::reader::{self, MemoryReader32, MemoryReader64};
use crate::validator::{validate_entry, Level, PageSize};

fn is_large(entry: u64) -> bool {
    entry & (1 << layout::PS) != 0
}

/// Walk a classic 32-bit two-level page table (`level == 2`).
///
/// At most 2 reader calls (small page) or 1 (PSE 4 MiB page).
pub fn walk_legacy32(va: u32, cr3: u32, reader: &dyn MemoryReader32) -> Result<u32> {
    let pde_index = (va >> 22) & 0x3FF;
    let pde_addr = (cr3 & 0xFFFF_F000).wrapping_add(pde_index * 4);
    let pde = reader::read_u32(reader, pde_addr)? as u64;

    if is_large(pde) {
        validate_entry(
            pde,
            Level::Pde,
            PageSize::Large,
            &layout::LEGACY32_PDE_LARGE,
            true,
        )?;
        let page_base = (pde & layout::LEGACY32_PDE_LARGE.addr_mask()) as u32;
        let page_offset = va & 0x003F_FFFF;
        return Ok(page_base | page_offset);
    }

    validate_entry(
        pde,
        Level::Pde,
        PageSize::Small,
        &layout::LEGACY32_PDE_SMALL,
        true,
    )?;
    let pt_base = (pde & layout::LEGACY32_PDE_SMALL.addr_mask()) as u32;

    let pte_index = (va >> 12) & 0x3FF;
    let pte_addr = pt_base.wrapping_add(pte_index * 4);
    let pte = reader::read_u32(reader, pte_addr)? as u64;

    validate_entry(pte, Level::Pte, PageSize::Small, &layout::LEGACY32_PTE, true)?;
    let page_base = (pte & layout::LEGACY32_PTE.addr_mask()) as u32;
    let page_offset = va & 0xFFF;
    Ok(page_base | page_offset)
}

/// Walk a PAE three-level page table (`level == 3`).
///
/// At most 3 reader calls (small page) or 2 (2 MiB page). Intermediate
/// table bases are truncated to a 32-bit physical address before each
/// reader call, since this mode uses [`MemoryReader32`] throughout (§4.2);
/// the final physical address is returned at full 52-bit width.
pub fn walk_pae(va: u32, cr3: u32, reader: &dyn MemoryReader32) -> Result<u64> {
    let pdpte_index = ((va >> 30) & 0x3) as u64;
    let pdpt_base = cr3 & 0xFFFF_FFE0;
    let pdpte_addr = pdpt_base.wrapping_add((pdpte_index * 8) as u32);
    let pdpte = reader::read_u64_narrow(reader, pdpte_addr)?;

    validate_entry(pdpte, Level::Pdpte, PageSize::Small, &layout::PAE_PDPTE, false)?;
    let pd_base = pdpte & layout::PAE_PDPTE.addr_mask();

    let pde_index = ((va >> 21) & 0x1FF) as u64;
    let pde_addr = (pd_base + pde_index * 8) as u32;
    let pde = reader::read_u64_narrow(reader, pde_addr)?;

    if is_large(pde) {
        validate_entry(pde, Level::Pde, PageSize::Large, &layout::PAE_PDE_LARGE, true)?;
        let page_base = pde & layout::PAE_PDE_LARGE.addr_mask();
        let page_offset = (va as u64) & 0x001F_FFFF;
        return Ok(page_base | page_offset);
    }

    validate_entry(pde, Level::Pde, PageSize::Small, &layout::PAE_PDE_SMALL, true)?;
    let pt_base = pde & layout::PAE_PDE_SMALL.addr_mask();

    let pte_index = ((va >> 12) & 0x1FF) as u64;
    let pte_addr = (pt_base + pte_index * 8) as u32;
    let pte = reader::read_u64_narrow(reader, pte_addr)?;

    validate_entry(pte, Level::Pte, PageSize::Small, &layout::PAE_PTE, true)?;
    let page_base = pte & layout::PAE_PTE.addr_mask();
    let page_offset = (va as u64) & 0xFFF;
    Ok(page_base | page_offset)
}

/// Walk a 4-level Long Mode page table hierarchy.
///
/// At most 4 reader calls (4 KiB page), 3 (2 MiB page), or 2 (1 GiB page).
pub fn walk_long(va: u64, cr3: u64, reader: &dyn MemoryReader64) -> Result<u64> {
    let pml4_index = (va >> 39) & 0x1FF;
    let pml4_base = cr3 & layout::LONG_PML4E.addr_mask();
    let pml4e_addr = pml4_base + pml4_index * 8;
    let pml4e = reader::read_u64(reader, pml4e_addr)?;

    validate_entry(pml4e, Level::Pml4e, PageSize::Small, &layout::LONG_PML4E, true)?;
    let pdpt_base = pml4e & layout::LONG_PML4E.addr_mask();

    let pdpte_index = (va >> 30) & 0x1FF;
    let pdpte_addr = pdpt_base + pdpte_index * 8;
    let pdpte = reader::read_u64(reader, pdpte_addr)?;

    if is_large(pdpte) {
        validate_entry(
            pdpte,
            Level::Pdpte,
            PageSize::Large,
            &layout::LONG_PDPTE_LARGE,
            false,
        )?;
        let page_base = pdpte & layout::LONG_PDPTE_LARGE.addr_mask();
        let page_offset = va & 0x3FFF_FFFF;
        return Ok(page_base | page_offset);
    }

    validate_entry(
        pdpte,
        Level::Pdpte,
        PageSize::Small,
        &layout::LONG_PDPTE_SMALL,
        false,
    )?;
    let pd_base = pdpte & layout::LONG_PDPTE_SMALL.addr_mask();

    let pde_index = (va >> 21) & 0x1FF;
    let pde_addr = pd_base + pde_index * 8;
    let pde = reader::read_u64(reader, pde_addr)?;

    if is_large(pde) {
        validate_entry(pde, Level::Pde, PageSize::Large, &layout::LONG_PDE_LARGE, true)?;
        let page_base = pde & layout::LONG_PDE_LARGE.addr_mask();
        let page_offset = va & 0x001F_FFFF;
        return Ok(page_base | page_offset);
    }

    validate_entry(pde, Level::Pde, PageSize::Small, &layout::LONG_PDE_SMALL, true)?;
    let pt_base = pde & layout::LONG_PDE_SMALL.addr_mask();

    let pte_index = (va >> 12) & 0x1FF;
    let pte_addr = pt_base + pte_index * 8;
    let pte = reader::read_u64(reader, pte_addr)?;

    validate_entry(pte, Level::Pte, PageSize::Small, &layout::LONG_PTE, true)?;
    let page_base = pte & layout::LONG_PTE.addr_mask();
    let page_offset = va & 0xFFF;
    Ok(page_base | page_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed32(HashMap<u32, u64>);
    impl MemoryReader32 for Fixed32 {
        fn read(&self, buf: &mut [u8], phys_addr: u32) -> usize {
            let word = *self.0.get(&phys_addr).unwrap_or(&0);
            buf.copy_from_slice(&word.to_le_bytes()[..buf.len()]);
            buf.len()
        }
    }

    struct Fixed64(HashMap<u64, u64>);
    impl MemoryReader64 for Fixed64 {
        fn read(&self, buf: &mut [u8], phys_addr: u64) -> usize {
            let word = *self.0.get(&phys_addr).unwrap_or(&0);
            buf.copy_from_slice(&word.to_le_bytes()[..buf.len()]);
            buf.len()
        }
    }

    #[test]
    fn pae_2mib_large_page_preserves_low_21_bits() {
        // PDPTE at 0x0 (cr3=0) -> PD base 0x2000; PDE there has PS=1.
        let mem = Fixed32(HashMap::from([
            (0x0, 0x0000_0000_0000_2001),
            (0x2000, 0x0000_0000_0020_0087),
        ]));
        let va = 0x0012_3456u32;
        let phys = walk_pae(va, 0x0, &mem).unwrap();
        assert_eq!(phys & 0x1F_FFFF, (va as u64) & 0x1F_FFFF);
    }

    #[test]
    fn long_2mib_large_page_preserves_low_21_bits() {
        let mem = Fixed64(HashMap::from([
            (0x0, 0x0000_1001),             // PML4E -> PDPT base 0x1000
            (0x1000, 0x0000_2001),          // PDPTE (PS=0) -> PD base 0x2000
            (0x2000, 0x0020_0087),          // PDE, PS=1, base 0x200000
        ]));
        let va = 0x0000_0000_0012_3456u64;
        let phys = walk_long(va, 0x0, &mem).unwrap();
        assert_eq!(phys & 0x1F_FFFF, va & 0x1F_FFFF);
        assert_eq!(phys, 0x0020_0000 | (va & 0x1F_FFFF));
    }

    #[test]
    fn legacy_pte_not_present_is_distinguished_from_pde_not_present() {
        let mem = Fixed32(HashMap::from([(0x1000, 0x0000_2007)]));
        let err = walk_legacy32(0x0000_0ABC, 0x0000_1000, &mem).unwrap_err();
        assert_eq!(err, FaultKind::PteNotPresent);
    }
}
