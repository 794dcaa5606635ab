//! Semispace heap.
//!
//! This module implements the managed heap:
//! - Two equal, fixed-capacity word arrays; one is live (from-space)
//! - Bump-pointer allocation in from-space, with one collection and one retry
//!   on exhaustion
//! - A static area for immovable objects, including the shared token object
//! - Guard-checked payload access and heap validation

use std::fmt;

use core_types::{fatal, Fault};
use serde::{Deserialize, Serialize};

use crate::config::HeapConfig;
use crate::gc::CollectionReason;
use crate::object::{
    check_frame, write_frame, Location, Metadata, ObjRef, Pointees, Word, FOOTER_WORDS,
    HEADER_WORDS, OVERHEAD_WORDS,
};
use crate::roots::RootRegistry;

/// Heap statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcStats {
    /// Number of collections
    pub collections: u64,
    /// Collections triggered by allocation failure
    pub exhaustion_collections: u64,
    /// Objects copied in the last collection
    pub last_objects_copied: usize,
    /// Words copied in the last collection
    pub last_words_copied: usize,
    /// Words reclaimed over all collections
    pub total_words_reclaimed: u64,
    /// Number of heap allocations
    pub allocations: u64,
    /// Words in use in from-space
    pub used_words: usize,
    /// Capacity of each semispace in words
    pub space_words: usize,
}

/// The managed heap.
///
/// All allocation, root registration and collection go through one `Heap`
/// value; there is no global state.
pub struct Heap {
    /// The space where objects are allocated
    pub(crate) from_space: Box<[Word]>,
    /// The space where objects are copied during GC
    pub(crate) to_space: Box<[Word]>,
    /// Current allocation pointer in from_space
    pub(crate) allocation_ptr: usize,
    /// Immovable objects; grows, never collected
    pub(crate) statics: Vec<Word>,
    pub(crate) roots: RootRegistry,
    pub(crate) stats: GcStats,
    config: HeapConfig,
    token: ObjRef,
}

impl Heap {
    /// Creates a heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates a heap with a custom configuration.
    ///
    /// An invalid configuration is a fatal protocol fault.
    pub fn with_config(config: HeapConfig) -> Self {
        if let Err(reason) = config.check() {
            fatal(Fault::InvalidConfig(reason));
        }
        let space_words = config.space_words;
        let mut heap = Heap {
            from_space: vec![0; space_words].into_boxed_slice(),
            to_space: vec![0; space_words].into_boxed_slice(),
            allocation_ptr: 0,
            statics: Vec::new(),
            roots: RootRegistry::new(),
            stats: GcStats {
                space_words,
                ..GcStats::default()
            },
            config,
            token: ObjRef::NULL,
        };
        heap.token = heap.allocate_static(1, Pointees::Free);
        heap
    }

    /// The heap configuration
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// The shared token object, standing in for an empty or placeholder value.
    pub fn token(&self) -> ObjRef {
        self.token
    }

    /// Allocates an object with `words` payload words.
    ///
    /// The payload is zeroed, so a pointer-full object starts with every field
    /// null. May run a collection; every handle not reachable from a root is
    /// invalid afterwards. Zero-sized requests, requests larger than a space
    /// and exhaustion after the collection are fatal.
    pub fn allocate(&mut self, words: usize, pointees: Pointees) -> ObjRef {
        if words == 0 {
            fatal(Fault::ZeroSizedAllocation);
        }
        let space_words = self.config.space_words;
        let total = words.saturating_add(OVERHEAD_WORDS);
        if total > space_words {
            fatal(Fault::NeverFits {
                requested: total,
                capacity: space_words,
            });
        }
        if self.allocation_ptr + total > space_words {
            tracing::warn!(
                requested = total,
                used = self.allocation_ptr,
                "from-space exhausted, collecting"
            );
            self.collect_for(CollectionReason::Exhaustion);
            if self.allocation_ptr + total > space_words {
                fatal(Fault::HeapExhausted { requested: total });
            }
        }

        let offset = self.allocation_ptr;
        write_frame(
            &mut self.from_space,
            offset,
            total,
            Metadata::new(Location::Inside, pointees),
        );
        self.allocation_ptr += total;
        self.stats.allocations += 1;
        ObjRef::heap(offset)
    }

    /// Allocates a pointer-free object of `words` words.
    pub fn allocate_words(&mut self, words: usize) -> ObjRef {
        self.allocate(words, Pointees::Free)
    }

    /// Allocates a pointer-free object large enough for `len` bytes.
    pub fn allocate_bytes(&mut self, len: usize) -> ObjRef {
        self.allocate(len.div_ceil(std::mem::size_of::<Word>()), Pointees::Free)
    }

    /// Allocates a pointer-full object of `fields` null fields.
    pub fn allocate_pointers(&mut self, fields: usize) -> ObjRef {
        self.allocate(fields, Pointees::Full)
    }

    /// Allocates an immovable object in the static area.
    ///
    /// Static objects are never moved, scanned or reclaimed.
    pub fn allocate_static(&mut self, words: usize, pointees: Pointees) -> ObjRef {
        if words == 0 {
            fatal(Fault::ZeroSizedAllocation);
        }
        let offset = self.statics.len();
        let total = words + OVERHEAD_WORDS;
        if offset + total > ObjRef::MAX_OFFSET {
            fatal(Fault::NeverFits {
                requested: total,
                capacity: ObjRef::MAX_OFFSET - offset,
            });
        }
        self.statics.resize(offset + total, 0);
        write_frame(
            &mut self.statics,
            offset,
            total,
            Metadata::new(Location::Outside, pointees),
        );
        ObjRef::fixed(offset)
    }

    /// Runs a full collection now.
    pub fn collect(&mut self) {
        self.collect_for(CollectionReason::Forced);
    }

    /// Total words of an object, header and footer included.
    pub fn size_of(&self, obj: ObjRef) -> usize {
        self.frame(obj).0
    }

    /// Header metadata of an object.
    pub fn metadata(&self, obj: ObjRef) -> Metadata {
        self.frame(obj).1
    }

    /// Payload of an object.
    pub fn payload(&self, obj: ObjRef) -> &[Word] {
        let (count, _) = self.frame(obj);
        let offset = obj.offset();
        &self.region(obj).0[offset + HEADER_WORDS..offset + count - FOOTER_WORDS]
    }

    /// Mutable payload of an object.
    pub fn payload_mut(&mut self, obj: ObjRef) -> &mut [Word] {
        let (count, _) = self.frame(obj);
        let offset = obj.offset();
        let words: &mut [Word] = if obj.is_static() {
            &mut self.statics
        } else {
            &mut self.from_space
        };
        &mut words[offset + HEADER_WORDS..offset + count - FOOTER_WORDS]
    }

    /// Field `index` of a pointer-full object.
    pub fn pointer(&self, obj: ObjRef, index: usize) -> ObjRef {
        self.expect_pointer_full(obj);
        ObjRef::from_word(self.payload(obj)[index])
    }

    /// Stores `value` into field `index` of a pointer-full object.
    pub fn set_pointer(&mut self, obj: ObjRef, index: usize, value: ObjRef) {
        self.expect_pointer_full(obj);
        if !value.is_null() {
            self.frame(value);
        }
        self.payload_mut(obj)[index] = value.to_word();
    }

    /// Packs `bytes` little-endian into the payload of a pointer-free object.
    pub fn write_bytes(&mut self, obj: ObjRef, bytes: &[u8]) {
        let payload = self.payload_mut(obj);
        for (word, chunk) in payload.iter_mut().zip(bytes.chunks(4)) {
            let mut buf = [0u8; 4];
            buf[..chunk.len()].copy_from_slice(chunk);
            *word = Word::from_le_bytes(buf);
        }
    }

    /// The payload of a pointer-free object as little-endian bytes.
    pub fn read_bytes(&self, obj: ObjRef) -> Vec<u8> {
        self.payload(obj)
            .iter()
            .flat_map(|word| word.to_le_bytes())
            .collect()
    }

    /// Borrows the payloads of `inputs` immutably and of `outputs` mutably.
    ///
    /// `outputs` must be heap objects listed in allocation order, each one
    /// allocated after every heap object in `inputs`. Bump allocation
    /// guarantees this for results allocated after their operands were
    /// rooted, even across a collection.
    pub fn with_payloads<const N: usize, const M: usize, R>(
        &mut self,
        inputs: [ObjRef; N],
        outputs: [ObjRef; M],
        f: impl FnOnce([&[Word]; N], [&mut [Word]; M]) -> R,
    ) -> R {
        let split = outputs.first().map_or(self.allocation_ptr, |out| out.offset());

        let mut output_spans = Vec::with_capacity(M);
        let mut previous_end = split;
        for &out in &outputs {
            let (count, _) = self.frame(out);
            let offset = out.offset();
            if !out.is_heap() || offset < previous_end {
                fatal(Fault::OverlappingBorrow { offset });
            }
            output_spans.push((offset + HEADER_WORDS, offset + count - FOOTER_WORDS));
            previous_end = offset + count;
        }

        let input_spans = inputs.map(|input| {
            let (count, _) = self.frame(input);
            let offset = input.offset();
            if input.is_heap() && offset + count > split {
                fatal(Fault::OverlappingBorrow { offset });
            }
            (input.is_static(), offset + HEADER_WORDS, offset + count - FOOTER_WORDS)
        });

        let (low, mut high) = self.from_space.split_at_mut(split);
        let low: &[Word] = low;
        let statics: &[Word] = &self.statics;
        let input_slices = input_spans.map(|(is_static, start, end)| {
            if is_static {
                &statics[start..end]
            } else {
                &low[start..end]
            }
        });

        let mut output_slices = Vec::with_capacity(M);
        let mut base = split;
        for (start, end) in output_spans {
            let rest = std::mem::take(&mut high);
            let (_, rest) = rest.split_at_mut(start - base);
            let (payload, rest) = rest.split_at_mut(end - start);
            output_slices.push(payload);
            high = rest;
            base = end;
        }
        let output_slices: [&mut [Word]; M] = match output_slices.try_into() {
            Ok(slices) => slices,
            Err(_) => unreachable!("one slice per output"),
        };

        f(input_slices, output_slices)
    }

    /// Validates one object: its own guards and supported metadata, plus the
    /// guards of every object it references (one level deep). Null is valid.
    pub fn validate(&self, obj: ObjRef) {
        if obj.is_null() {
            return;
        }
        let (count, metadata) = self.frame(obj);
        let has_pointers = match metadata.supported() {
            Ok((_, has_pointers)) => has_pointers,
            Err(fault) => fatal(fault),
        };
        if has_pointers {
            let words = self.region(obj).0;
            let offset = obj.offset();
            for &field in &words[offset + HEADER_WORDS..offset + count - FOOTER_WORDS] {
                let child = ObjRef::from_word(field);
                if !child.is_null() {
                    self.frame(child);
                }
            }
        }
    }

    /// Validates every object in from-space and the static area, then every
    /// root, and returns the number of heap objects.
    pub fn validate_all(&self) -> usize {
        let mut offset = 0;
        while offset < self.statics.len() {
            let obj = ObjRef::fixed(offset);
            self.validate(obj);
            offset += self.size_of(obj);
        }

        let mut objects = 0;
        let mut offset = 0;
        while offset < self.allocation_ptr {
            let obj = ObjRef::heap(offset);
            self.validate(obj);
            offset += self.size_of(obj);
            objects += 1;
        }

        self.roots.for_each(|root| self.validate(root));
        objects
    }

    /// Number of words in use in from-space
    pub fn live_words(&self) -> usize {
        self.allocation_ptr
    }

    /// Number of words still free in from-space
    pub fn free_words(&self) -> usize {
        self.config.space_words - self.allocation_ptr
    }

    /// Capacity of each semispace in words
    pub fn capacity(&self) -> usize {
        self.config.space_words
    }

    /// Whether the idle space holds nothing but zeros
    pub fn idle_space_is_zeroed(&self) -> bool {
        self.to_space.iter().all(|&word| word == 0)
    }

    /// Statistics snapshot
    pub fn stats(&self) -> GcStats {
        GcStats {
            used_words: self.allocation_ptr,
            ..self.stats.clone()
        }
    }

    fn region(&self, obj: ObjRef) -> (&[Word], usize) {
        if obj.is_static() {
            (&self.statics, self.statics.len())
        } else {
            (&self.from_space, self.allocation_ptr)
        }
    }

    /// Guard-checked word count and metadata of a live object.
    fn frame(&self, obj: ObjRef) -> (usize, Metadata) {
        if obj.is_null() {
            fatal(Fault::NullDereference);
        }
        let (words, limit) = self.region(obj);
        match check_frame(words, limit, obj.offset()) {
            Ok(frame) => frame,
            Err(fault) => fatal(fault),
        }
    }

    fn expect_pointer_full(&self, obj: ObjRef) {
        let metadata = self.metadata(obj);
        if metadata.pointees() != Ok(Pointees::Full) {
            fatal(Fault::UnsupportedPointees(metadata.to_word()));
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("space_words", &self.config.space_words)
            .field("allocation_ptr", &self.allocation_ptr)
            .field("static_words", &self.statics.len())
            .field("root_depth", &self.root_depth())
            .field("collections", &self.stats.collections)
            .finish()
    }
}
