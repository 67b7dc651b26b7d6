//! Bit layout shared by every generator.
//!
//! ```text
//!  Bit Index:  63   62     60 59                 36 35              0
//!              +----+---------+---------------------+----------------+
//!  Field:      | 0  | section |        epoch        |    sequence    |
//!              +----+---------+---------------------+----------------+
//!              |<------------- MSB -- 64 bits -- LSB --------------->|
//! ```
//!
//! Without a section the epoch spans bits 36..=62 (27 usable bits). With a
//! section, bits 60..=62 carry the section tag and the epoch is limited to
//! 24 bits. The sign bit is never set, so every identifier fits a signed
//! 64-bit column.

/// Width of the locally incremented low segment.
pub const SEQUENCE_BITS: u32 = 36;

/// Mask selecting the sequence segment.
pub const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// Mask selecting everything above the sequence, sign bit excluded.
pub const HIGH_MASK: i64 = i64::MAX & !SEQUENCE_MASK;

/// Position of the section tag.
pub const SECTION_SHIFT: u32 = 60;

/// Width of the section tag.
pub const SECTION_BITS: u32 = 3;

/// Mask selecting the section tag.
pub const SECTION_MASK: i64 = ((1 << SECTION_BITS) - 1) << SECTION_SHIFT;

/// Largest accepted section tag. Zero means "no section".
pub const MAX_SECTION: u8 = (1 << SECTION_BITS) - 1;

/// Largest epoch accepted by a generator without a section.
pub const MAX_EPOCH: i64 = 0x07FF_FFFF;

/// Largest epoch accepted by a generator with a section.
pub const MAX_SECTIONED_EPOCH: i64 = 0x00FF_FFFF;

/// Sequence value from which `next` fails: 96% of the sequence space,
/// rounded down to a multiple of the largest step.
pub const PANIC_THRESHOLD: i64 = ((1 << SEQUENCE_BITS) * 96 / 100) & !1023;

/// Sequence value from which background renewal is attempted: 80% of the
/// sequence space, rounded down to a multiple of the largest step.
pub const CRITICAL_THRESHOLD: i64 = ((1 << SEQUENCE_BITS) * 80 / 100) & !1023;

/// Renewal is attempted only on sequence values aligned to this mask
/// (every 2^29 increments) once the critical threshold is crossed.
pub const RENEW_INTERVAL_MASK: i64 = (1 << 29) - 1;

/// First sequence value that triggers a renewal attempt.
pub const FIRST_RENEWAL_POINT: i64 = (CRITICAL_THRESHOLD + RENEW_INTERVAL_MASK) & !RENEW_INTERVAL_MASK;

/// All bits below the section tag.
pub(crate) const LOW_60_MASK: i64 = (1 << SECTION_SHIFT) - 1;

/// Largest supported step.
pub const MAX_STEP: u32 = 1024;

const _: () = {
    assert!(CRITICAL_THRESHOLD < FIRST_RENEWAL_POINT);
    assert!(FIRST_RENEWAL_POINT < PANIC_THRESHOLD);
    assert!(PANIC_THRESHOLD % MAX_STEP as i64 == 0);
    assert!((MAX_EPOCH << SEQUENCE_BITS) >= 0);
    assert!(((MAX_SECTIONED_EPOCH << SEQUENCE_BITS) & SECTION_MASK) == 0);
};
