// Fri Oct 16 2026 - Alex

use serde::{Deserialize, Serialize};

/// Leading words of every table (RTTI pointer and top offset) that never
/// hold a virtual function.
pub const RTTI_WORDS: usize = 2;

pub const DEFAULT_POINTER_SIZE: u32 = 4;

/// Maps a logical slot index to its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtableLayout {
    pub header_offset: u32,
    pub pointer_size: u32,
}

impl VtableLayout {
    /// Offsets counted from the start of the table, header words included.
    pub const fn header() -> Self {
        Self {
            header_offset: RTTI_WORDS as u32 * DEFAULT_POINTER_SIZE,
            pointer_size: DEFAULT_POINTER_SIZE,
        }
    }

    /// Offsets counted from the first virtual slot.
    pub const fn flat() -> Self {
        Self {
            header_offset: 0,
            pointer_size: DEFAULT_POINTER_SIZE,
        }
    }

    pub fn offset_of(&self, index: usize) -> u32 {
        self.header_offset + index as u32 * self.pointer_size
    }
}

impl Default for VtableLayout {
    fn default() -> Self {
        Self::header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(VtableLayout::header().offset_of(0), 8);
        assert_eq!(VtableLayout::header().offset_of(3), 0x14);
        assert_eq!(VtableLayout::flat().offset_of(3), 0x0C);
    }
}
