//! Object header model.
//!
//! Every managed object is a "sandwich" of words:
//!
//! ```text
//! +--------------+------------+----------+---------------------+--------------+
//! | HEADER_MAGIC | word count | metadata | payload (count - 4) | FOOTER_MAGIC |
//! +--------------+------------+----------+---------------------+--------------+
//! ```
//!
//! The word count covers the whole sandwich, header and footer included.

use std::fmt;

use core_types::Fault;

/// Machine word of the managed heap. One word holds one bignum limb.
pub type Word = u32;

/// Guard value in the first header word.
pub const HEADER_MAGIC: Word = 0xC0DE_5EED;
/// Guard value in the footer word.
pub const FOOTER_MAGIC: Word = 0xF00D_FACE;

/// Words before the payload.
pub const HEADER_WORDS: usize = 3;
/// Words after the payload.
pub const FOOTER_WORDS: usize = 1;
/// Header plus footer.
pub const OVERHEAD_WORDS: usize = HEADER_WORDS + FOOTER_WORDS;

pub(crate) const MAGIC_SLOT: usize = 0;
pub(crate) const COUNT_SLOT: usize = 1;
pub(crate) const METADATA_SLOT: usize = 2;

const LOCATION_MASK: Word = 0b0011;
const POINTEES_SHIFT: u32 = 2;
const POINTEES_MASK: Word = 0b1100;

/// Where an object lives and whether the collector may move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Location {
    /// Immovable, never scanned (static area, literal pools)
    Outside = 0,
    /// Movable and scanned by the collector
    Inside = 1,
    /// Reserved
    CopyIn = 2,
    /// Reserved
    CopyOut = 3,
}

/// What the payload of an object contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Pointees {
    /// Raw words only
    Free = 0,
    /// Every payload word is an encoded [`ObjRef`]
    Full = 1,
    /// Reserved
    Mixed = 2,
}

/// Metadata word of an object header.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Metadata(Word);

impl Metadata {
    /// Packs a location class and pointee classification.
    pub const fn new(location: Location, pointees: Pointees) -> Self {
        Metadata(location as Word | ((pointees as Word) << POINTEES_SHIFT))
    }

    /// Reinterprets a raw header word.
    pub const fn from_word(word: Word) -> Self {
        Metadata(word)
    }

    /// Raw header word.
    pub const fn to_word(self) -> Word {
        self.0
    }

    /// Location class. All four encodings are representable.
    pub fn location(self) -> Location {
        match self.0 & LOCATION_MASK {
            0 => Location::Outside,
            1 => Location::Inside,
            2 => Location::CopyIn,
            _ => Location::CopyOut,
        }
    }

    /// Pointee classification, or the fault for bits that name none.
    pub fn pointees(self) -> Result<Pointees, Fault> {
        match (self.0 & POINTEES_MASK) >> POINTEES_SHIFT {
            0 => Ok(Pointees::Free),
            1 => Ok(Pointees::Full),
            2 => Ok(Pointees::Mixed),
            bits => Err(Fault::UnsupportedPointees(bits)),
        }
    }

    /// Checks the combination the collector implements and reports whether
    /// the payload holds pointers.
    pub fn supported(self) -> Result<(Location, bool), Fault> {
        let location = match self.location() {
            loc @ (Location::Outside | Location::Inside) => loc,
            other => return Err(Fault::UnsupportedLocation(other as Word)),
        };
        match self.pointees()? {
            Pointees::Free => Ok((location, false)),
            Pointees::Full => Ok((location, true)),
            Pointees::Mixed => Err(Fault::UnsupportedPointees(Pointees::Mixed as Word)),
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("location", &self.location())
            .field("pointees", &self.pointees())
            .finish()
    }
}

/// Handle to a managed object.
///
/// A handle names an object by word offset inside its region instead of by
/// address, so relocating an object means rewriting the handles that name it.
/// Handles encode into a single [`Word`]; `0` is [`ObjRef::NULL`], which lets
/// freshly zeroed pointer-full payloads read as all-null.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(Word);

const STATIC_BIT: Word = 1;

impl ObjRef {
    /// The null handle.
    pub const NULL: ObjRef = ObjRef(0);

    /// Largest offset a handle can encode.
    pub const MAX_OFFSET: usize = (Word::MAX >> 1) as usize - 1;

    pub(crate) fn heap(offset: usize) -> Self {
        debug_assert!(offset <= Self::MAX_OFFSET);
        ObjRef(((offset as Word) + 1) << 1)
    }

    pub(crate) fn fixed(offset: usize) -> Self {
        debug_assert!(offset <= Self::MAX_OFFSET);
        ObjRef((((offset as Word) + 1) << 1) | STATIC_BIT)
    }

    /// Decodes a handle stored in a pointer-full payload.
    pub const fn from_word(word: Word) -> Self {
        ObjRef(word)
    }

    /// Encodes the handle for storage in a pointer-full payload.
    pub const fn to_word(self) -> Word {
        self.0
    }

    /// Whether this is the null handle.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Whether the object lives in the static (outside-heap) area.
    pub const fn is_static(self) -> bool {
        !self.is_null() && self.0 & STATIC_BIT != 0
    }

    /// Whether the object lives in the movable heap.
    pub const fn is_heap(self) -> bool {
        !self.is_null() && self.0 & STATIC_BIT == 0
    }

    /// Word offset of the object header inside its region.
    ///
    /// Meaningless for [`ObjRef::NULL`].
    pub const fn offset(self) -> usize {
        ((self.0 >> 1) as usize).wrapping_sub(1)
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ObjRef(null)")
        } else if self.is_static() {
            write!(f, "ObjRef(static@{})", self.offset())
        } else {
            write!(f, "ObjRef(heap@{})", self.offset())
        }
    }
}

impl Default for ObjRef {
    fn default() -> Self {
        ObjRef::NULL
    }
}

/// Writes header and footer for an object of `word_count` total words at
/// `offset` and zeroes its payload.
pub(crate) fn write_frame(words: &mut [Word], offset: usize, word_count: usize, metadata: Metadata) {
    let frame = &mut words[offset..offset + word_count];
    frame[MAGIC_SLOT] = HEADER_MAGIC;
    frame[COUNT_SLOT] = word_count as Word;
    frame[METADATA_SLOT] = metadata.to_word();
    frame[HEADER_WORDS..word_count - FOOTER_WORDS].fill(0);
    frame[word_count - FOOTER_WORDS] = FOOTER_MAGIC;
}

/// Checks the guards of the object at `offset`, whose region is live up to
/// `limit`, and returns its word count and metadata.
pub(crate) fn check_frame(
    words: &[Word],
    limit: usize,
    offset: usize,
) -> Result<(usize, Metadata), Fault> {
    if offset + HEADER_WORDS > limit {
        return Err(Fault::DanglingReference { offset });
    }
    let header = words[offset + MAGIC_SLOT];
    let word_count = words[offset + COUNT_SLOT];
    let count = word_count as usize;
    let fits = count > OVERHEAD_WORDS && offset + count <= limit;
    let footer = if fits {
        words[offset + count - FOOTER_WORDS]
    } else {
        0
    };
    if header != HEADER_MAGIC || !fits || footer != FOOTER_MAGIC {
        return Err(Fault::GuardMismatch {
            offset,
            header,
            footer,
            word_count,
        });
    }
    Ok((count, Metadata(words[offset + METADATA_SLOT])))
}
