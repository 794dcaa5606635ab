//! Root registry.
//!
//! Three kinds of roots keep objects alive and get rewritten by every
//! collection, walked in this order:
//!
//! 1. **Stack roots**: a fixed-capacity LIFO of handles. Code that holds a
//!    handle across a call that may allocate pushes it first and pops it after,
//!    strictly nested. [`Heap::with_roots`] is the scoped form.
//! 2. **Array roots**: growable handle arrays owned by the heap on behalf of a
//!    long-lived client; the current length is the logical length.
//! 3. **Register sets**: virtual-CPU register files, see [`RegisterSet`].

use core_types::{fatal, Fault};

use crate::heap::Heap;
use crate::object::ObjRef;
use crate::registers::RegisterSet;

/// Capacity of the root stack
pub const ROOT_STACK_CAPACITY: usize = 64;

/// Proof of a pushed stack root.
///
/// Not `Clone`: handing it back to [`Heap::pop_root`] consumes it.
#[must_use = "a pushed root must be popped"]
#[derive(Debug, PartialEq, Eq)]
pub struct StackRoot {
    depth: usize,
}

impl StackRoot {
    /// Position of this root on the stack (0 is the bottom)
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Identifies a registered array root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayRootId(usize);

/// Identifies a registered register set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterSetId(usize);

/// All registered roots of one heap
#[derive(Debug, Default)]
pub(crate) struct RootRegistry {
    stack: Vec<ObjRef>,
    arrays: Vec<Option<Vec<ObjRef>>>,
    register_sets: Vec<Option<RegisterSet>>,
}

impl RootRegistry {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::with_capacity(ROOT_STACK_CAPACITY),
            arrays: Vec::new(),
            register_sets: Vec::new(),
        }
    }

    /// Visits every root in walk order, storing back what `visit` returns
    pub(crate) fn visit(&mut self, mut visit: impl FnMut(ObjRef) -> ObjRef) {
        for slot in self.stack.iter_mut() {
            *slot = visit(*slot);
        }
        for array in self.arrays.iter_mut().flatten() {
            for slot in array.iter_mut() {
                *slot = visit(*slot);
            }
        }
        for set in self.register_sets.iter_mut().flatten() {
            set.visit_roots(&mut visit);
        }
    }

    /// Reads every root in walk order
    pub(crate) fn for_each(&self, mut f: impl FnMut(ObjRef)) {
        self.stack.iter().copied().for_each(&mut f);
        for array in self.arrays.iter().flatten() {
            array.iter().copied().for_each(&mut f);
        }
        for set in self.register_sets.iter().flatten() {
            set.roots().for_each(&mut f);
        }
    }
}

impl Heap {
    /// Pushes `value` onto the root stack.
    ///
    /// `value` must be null or a valid object. Overflowing the
    /// [`ROOT_STACK_CAPACITY`]-entry stack is fatal.
    pub fn push_root(&mut self, value: ObjRef) -> StackRoot {
        self.validate(value);
        let stack = &mut self.roots.stack;
        if stack.len() == ROOT_STACK_CAPACITY {
            fatal(Fault::RootStackOverflow {
                capacity: ROOT_STACK_CAPACITY,
            });
        }
        stack.push(value);
        StackRoot {
            depth: stack.len() - 1,
        }
    }

    /// Pops `root`, which must be the most recent push, and returns its
    /// current (possibly relocated) value.
    pub fn pop_root(&mut self, root: StackRoot) -> ObjRef {
        let Some(top) = self.roots.stack.len().checked_sub(1) else {
            fatal(Fault::RootStackUnderflow);
        };
        if root.depth != top {
            fatal(Fault::RootOrder {
                expected: top,
                actual: root.depth,
            });
        }
        let value = self.roots.stack[top];
        self.validate(value);
        self.roots.stack.truncate(top);
        value
    }

    /// Current value of a stack root
    pub fn root(&self, root: &StackRoot) -> ObjRef {
        match self.roots.stack.get(root.depth) {
            Some(value) => *value,
            None => fatal(Fault::RootStackUnderflow),
        }
    }

    /// Replaces the value of a stack root
    pub fn set_root(&mut self, root: &StackRoot, value: ObjRef) {
        self.validate(value);
        match self.roots.stack.get_mut(root.depth) {
            Some(slot) => *slot = value,
            None => fatal(Fault::RootStackUnderflow),
        }
    }

    /// Number of entries on the root stack
    pub fn root_depth(&self) -> usize {
        self.roots.stack.len()
    }

    /// Runs `f` with `values` pushed as stack roots, popping them in reverse
    /// order when `f` returns.
    ///
    /// ```
    /// use memory_manager::Heap;
    ///
    /// let mut heap = Heap::new();
    /// let kept = heap.allocate_words(2);
    /// let depth = heap.root_depth();
    /// let fresh = heap.with_roots([kept], |heap, [kept_root]| {
    ///     heap.collect();
    ///     let kept = heap.root(kept_root);
    ///     assert_eq!(heap.size_of(kept), 6);
    ///     heap.allocate_words(1)
    /// });
    /// assert_eq!(heap.root_depth(), depth);
    /// assert_eq!(heap.size_of(fresh), 5);
    /// ```
    pub fn with_roots<const N: usize, R>(
        &mut self,
        values: [ObjRef; N],
        f: impl FnOnce(&mut Heap, &[StackRoot; N]) -> R,
    ) -> R {
        let roots = values.map(|value| self.push_root(value));
        let result = f(self, &roots);
        for root in roots.into_iter().rev() {
            self.pop_root(root);
        }
        result
    }

    /// Registers an empty array root
    pub fn register_array_root(&mut self) -> ArrayRootId {
        let id = ArrayRootId(self.roots.arrays.len());
        self.roots.arrays.push(Some(Vec::new()));
        tracing::trace!(id = id.0, "array root registered");
        id
    }

    /// Entries of an array root
    pub fn array_root(&self, id: ArrayRootId) -> &[ObjRef] {
        match self.roots.arrays.get(id.0) {
            Some(Some(array)) => array,
            _ => fatal(Fault::UnknownArrayRoot(id.0)),
        }
    }

    /// Mutable access to an array root; its length is its logical length
    pub fn array_root_mut(&mut self, id: ArrayRootId) -> &mut Vec<ObjRef> {
        match self.roots.arrays.get_mut(id.0) {
            Some(Some(array)) => array,
            _ => fatal(Fault::UnknownArrayRoot(id.0)),
        }
    }

    /// Removes an array root and hands back its entries
    pub fn deregister_array_root(&mut self, id: ArrayRootId) -> Vec<ObjRef> {
        match self.roots.arrays.get_mut(id.0).and_then(Option::take) {
            Some(array) => {
                tracing::trace!(id = id.0, len = array.len(), "array root deregistered");
                array
            }
            None => fatal(Fault::UnknownArrayRoot(id.0)),
        }
    }

    /// Registers a register set; the heap owns it until deregistered
    pub fn register_register_set(&mut self, set: RegisterSet) -> RegisterSetId {
        let id = RegisterSetId(self.roots.register_sets.len());
        self.roots.register_sets.push(Some(set));
        tracing::trace!(id = id.0, "register set registered");
        id
    }

    /// A registered register set
    pub fn register_set(&self, id: RegisterSetId) -> &RegisterSet {
        match self.roots.register_sets.get(id.0) {
            Some(Some(set)) => set,
            _ => fatal(Fault::UnknownRegisterSet(id.0)),
        }
    }

    /// Mutable access to a registered register set
    pub fn register_set_mut(&mut self, id: RegisterSetId) -> &mut RegisterSet {
        match self.roots.register_sets.get_mut(id.0) {
            Some(Some(set)) => set,
            _ => fatal(Fault::UnknownRegisterSet(id.0)),
        }
    }

    /// Removes a register set and hands it back
    pub fn deregister_register_set(&mut self, id: RegisterSetId) -> RegisterSet {
        match self.roots.register_sets.get_mut(id.0).and_then(Option::take) {
            Some(set) => {
                tracing::trace!(id = id.0, "register set deregistered");
                set
            }
            None => fatal(Fault::UnknownRegisterSet(id.0)),
        }
    }
}
