//! Global machine constants.
//!
//! This module defines the fixed geometry of the machine: page sizes and the
//! hierarchical translation layout on one side, the instruction width on the
//! other. Cache geometry is configuration, not a constant, and lives in
//! [`crate::config`].

/// Page size in bytes (4 KiB).
pub const PAGE_SIZE: u64 = 4096;

/// Number of bits to shift to convert between byte addresses and page indices.
pub const PAGE_SHIFT: u64 = 12;

/// Mask for extracting the in-page offset from a virtual address.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// Mask for one 9-bit page table index field.
pub const LEVEL_INDEX_MASK: u64 = 0x1FF;

/// Bit position of the level-4 index field in a virtual address.
pub const LEVEL4_SHIFT: u64 = 39;

/// Bit position of the level-3 index field in a virtual address.
pub const LEVEL3_SHIFT: u64 = 30;

/// Bit position of the level-2 index field in a virtual address.
pub const LEVEL2_SHIFT: u64 = 21;

/// Bit position of the level-1 index field in a virtual address.
pub const LEVEL1_SHIFT: u64 = 12;

/// Number of slots in the fixed top-level (level 4) page table.
pub const TOP_LEVEL_SLOTS: usize = 512;

/// Size of one encoded instruction word in bytes.
///
/// The program counter is an instruction index; the fetch unit reads the
/// word at byte address `pc * INSTRUCTION_BYTES` through the cache.
pub const INSTRUCTION_BYTES: u64 = 8;
