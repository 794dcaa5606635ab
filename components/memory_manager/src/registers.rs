//! Register-set binding.
//!
//! A virtual CPU exposes its register file to the collector through a
//! [`RegisterSet`]. General registers hold raw 64-bit values; the `managed`
//! bitmask marks the ones currently holding an encoded [`ObjRef`]. Scratch
//! slots always hold handles. Once registered with the heap, every collection
//! scans the managed registers in ascending order, then the scratch slots in
//! [`Scratch::ALL`] order, and rewrites them in place.

use crate::object::{ObjRef, Word};

/// Number of general registers
pub const GENERAL_REGISTERS: usize = 16;
/// Number of scratch slots
pub const SCRATCH_SLOTS: usize = 4;

/// Heap-pointer scratch slots of a register set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scratch {
    /// Result of the instruction in flight
    Accumulator,
    /// Left operand of the instruction in flight
    Lhs,
    /// Right operand of the instruction in flight
    Rhs,
    /// Free for the dispatch loop
    Spill,
}

impl Scratch {
    /// All slots, in scan order
    pub const ALL: [Scratch; SCRATCH_SLOTS] =
        [Scratch::Accumulator, Scratch::Lhs, Scratch::Rhs, Scratch::Spill];

    fn index(self) -> usize {
        self as usize
    }
}

/// Register file of a virtual CPU, as seen by the collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSet {
    general: [u64; GENERAL_REGISTERS],
    managed: u16,
    scratch: [ObjRef; SCRATCH_SLOTS],
}

impl RegisterSet {
    /// Creates a register set with every register zero and unmanaged
    pub fn new() -> Self {
        Self {
            general: [0; GENERAL_REGISTERS],
            managed: 0,
            scratch: [ObjRef::NULL; SCRATCH_SLOTS],
        }
    }

    /// Raw value of a register
    ///
    /// # Panics
    ///
    /// Panics if `reg >= GENERAL_REGISTERS`.
    pub fn raw(&self, reg: usize) -> u64 {
        self.general[reg]
    }

    /// Stores a raw value, clearing the managed bit
    pub fn set_raw(&mut self, reg: usize, value: u64) {
        self.general[reg] = value;
        self.managed &= !(1 << reg);
    }

    /// Stores a heap handle, setting the managed bit
    pub fn set_object(&mut self, reg: usize, obj: ObjRef) {
        self.general[reg] = u64::from(obj.to_word());
        self.managed |= 1 << reg;
    }

    /// The handle held by a register, if it is managed
    pub fn object(&self, reg: usize) -> Option<ObjRef> {
        self.is_managed(reg)
            .then(|| ObjRef::from_word(self.general[reg] as Word))
    }

    /// Whether the register currently holds a handle
    pub fn is_managed(&self, reg: usize) -> bool {
        assert!(reg < GENERAL_REGISTERS, "register r{reg} out of range");
        self.managed & (1 << reg) != 0
    }

    /// The managed-register bitmask
    pub fn managed_mask(&self) -> u16 {
        self.managed
    }

    /// Zeroes a register and clears its managed bit
    pub fn clear(&mut self, reg: usize) {
        self.set_raw(reg, 0);
    }

    /// Handle held by a scratch slot
    pub fn scratch(&self, slot: Scratch) -> ObjRef {
        self.scratch[slot.index()]
    }

    /// Stores a handle into a scratch slot
    pub fn set_scratch(&mut self, slot: Scratch, obj: ObjRef) {
        self.scratch[slot.index()] = obj;
    }

    /// Resets every scratch slot to null
    pub fn clear_scratch(&mut self) {
        self.scratch = [ObjRef::NULL; SCRATCH_SLOTS];
    }

    /// Every GC-visible slot in scan order
    pub(crate) fn roots(&self) -> impl Iterator<Item = ObjRef> + '_ {
        (0..GENERAL_REGISTERS)
            .filter(|&reg| self.managed & (1 << reg) != 0)
            .map(|reg| ObjRef::from_word(self.general[reg] as Word))
            .chain(self.scratch.iter().copied())
    }

    /// Visits every GC-visible slot in scan order, storing back what `visit` returns
    pub(crate) fn visit_roots(&mut self, visit: &mut impl FnMut(ObjRef) -> ObjRef) {
        for reg in 0..GENERAL_REGISTERS {
            if self.managed & (1 << reg) != 0 {
                let moved = visit(ObjRef::from_word(self.general[reg] as Word));
                self.general[reg] = u64::from(moved.to_word());
            }
        }
        for slot in self.scratch.iter_mut() {
            *slot = visit(*slot);
        }
    }
}

impl Default for RegisterSet {
    fn default() -> Self {
        Self::new()
    }
}
