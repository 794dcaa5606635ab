//! Semi-space copying garbage collector.
//!
//! This module implements Cheney's algorithm over the two heap spaces:
//! - Every root is evacuated into to_space, in root walk order
//! - A scan pointer then sweeps to_space breadth-first, evacuating the
//!   children of each pointer-full object it passes
//! - Each object is copied at most once; later references are rewritten from
//!   a forwarding table keyed by from_space offset
//! - The vacated space is zeroed and the spaces are swapped
//!
//! Static objects are neither copied nor scanned, so they must not hold
//! references into the heap.

use std::collections::HashMap;

use core_types::{fatal, Fault};

use crate::heap::Heap;
use crate::object::{check_frame, ObjRef, Word, FOOTER_WORDS, HEADER_WORDS};

/// Why a collection ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionReason {
    /// An allocation did not fit in from_space
    Exhaustion,
    /// Requested through [`Heap::collect`]
    Forced,
}

/// State of one collection cycle.
struct Evacuator<'a> {
    from: &'a [Word],
    from_limit: usize,
    to: &'a mut [Word],
    statics: &'a [Word],
    /// Allocation pointer in to_space
    allocation: usize,
    /// from_space offset -> to_space offset
    forwarding: HashMap<usize, usize>,
    objects_copied: usize,
}

impl<'a> Evacuator<'a> {
    fn new(from: &'a [Word], from_limit: usize, to: &'a mut [Word], statics: &'a [Word]) -> Self {
        Evacuator {
            from,
            from_limit,
            to,
            statics,
            allocation: 0,
            forwarding: HashMap::new(),
            objects_copied: 0,
        }
    }

    /// Returns the to_space handle for `obj`, copying it on first sight.
    fn relocate(&mut self, obj: ObjRef) -> ObjRef {
        if obj.is_null() {
            return obj;
        }
        let offset = obj.offset();
        if obj.is_static() {
            match check_frame(self.statics, self.statics.len(), offset)
                .and_then(|(_, metadata)| metadata.supported())
            {
                Ok(_) => return obj,
                Err(fault) => fatal(fault),
            }
        }
        if let Some(&moved) = self.forwarding.get(&offset) {
            return ObjRef::heap(moved);
        }

        let count = match check_frame(self.from, self.from_limit, offset)
            .and_then(|(count, metadata)| metadata.supported().map(|_| count))
        {
            Ok(count) => count,
            Err(fault) => fatal(fault),
        };
        let available = self.to.len() - self.allocation;
        if count > available {
            fatal(Fault::ToSpaceOverflow {
                requested: count,
                available,
            });
        }

        let moved = self.allocation;
        self.to[moved..moved + count].copy_from_slice(&self.from[offset..offset + count]);
        self.allocation += count;
        self.objects_copied += 1;
        self.forwarding.insert(offset, moved);
        ObjRef::heap(moved)
    }

    /// Sweeps to_space until the scan pointer catches up with allocation.
    fn scan(&mut self) {
        let mut scan = 0;
        while scan < self.allocation {
            let (count, metadata) = match check_frame(self.to, self.allocation, scan) {
                Ok(frame) => frame,
                Err(fault) => fatal(fault),
            };
            let has_pointers = match metadata.supported() {
                Ok((_, has_pointers)) => has_pointers,
                Err(fault) => fatal(fault),
            };
            if has_pointers {
                for field in scan + HEADER_WORDS..scan + count - FOOTER_WORDS {
                    let moved = self.relocate(ObjRef::from_word(self.to[field]));
                    self.to[field] = moved.to_word();
                }
            }
            scan += count;
        }
    }
}

impl Heap {
    /// Runs one collection cycle.
    ///
    /// Live objects keep their relative root walk order in the new space;
    /// every root and every pointer field reaching them is rewritten.
    pub(crate) fn collect_for(&mut self, reason: CollectionReason) {
        let verify = self.config().verify_collections;
        if verify {
            self.validate_all();
        }
        let cycle = self.stats.collections + 1;
        let live_before = self.allocation_ptr;
        tracing::debug!(cycle, ?reason, live_words = live_before, "collection started");

        let Heap {
            from_space,
            to_space,
            allocation_ptr,
            statics,
            roots,
            stats,
            ..
        } = self;

        let mut evacuator = Evacuator::new(from_space, *allocation_ptr, to_space, statics);
        roots.visit(|obj| evacuator.relocate(obj));
        evacuator.scan();
        let words_copied = evacuator.allocation;
        let objects_copied = evacuator.objects_copied;

        // words past the allocation pointer are already zero
        from_space[..*allocation_ptr].fill(0);
        std::mem::swap(from_space, to_space);
        *allocation_ptr = words_copied;

        stats.collections += 1;
        if reason == CollectionReason::Exhaustion {
            stats.exhaustion_collections += 1;
        }
        stats.last_words_copied = words_copied;
        stats.last_objects_copied = objects_copied;
        stats.total_words_reclaimed += (live_before - words_copied) as u64;

        tracing::debug!(
            cycle,
            ?reason,
            live_words = words_copied,
            objects_copied,
            reclaimed = live_before - words_copied,
            "collection finished"
        );
        if verify {
            self.validate_all();
        }
    }
}
