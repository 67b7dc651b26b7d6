use core::fmt;

use crate::id::{
    CRITICAL_THRESHOLD, HIGH_MASK, LOW_60_MASK, MAX_EPOCH, MAX_SECTIONED_EPOCH, PANIC_THRESHOLD,
    RENEW_INTERVAL_MASK, SECTION_MASK, SECTION_SHIFT, SEQUENCE_BITS, SEQUENCE_MASK,
};

/// A view over a packed 64-bit identifier.
///
/// `PackedId` wraps the raw signed integer stored in a generator's state word
/// (and returned by `next` when no output transform is configured), exposing
/// the section, epoch and sequence segments by name. All masking and shifting
/// lives here so the atomic plumbing never touches raw constants.
///
/// # Example
///
/// ```
/// use hiloid::PackedId;
///
/// let id = PackedId::from_components(3, 42, 7);
/// assert_eq!(id.section(), 3);
/// assert_eq!(id.sectioned_epoch(), 42);
/// assert_eq!(id.sequence(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PackedId {
    raw: i64,
}

impl PackedId {
    /// Builds an identifier from its segments.
    ///
    /// A `section` of zero leaves the top bits to the epoch, which may then
    /// use up to [`MAX_EPOCH`]. Otherwise the epoch is limited to
    /// [`MAX_SECTIONED_EPOCH`].
    pub const fn from_components(section: u8, epoch: i64, sequence: i64) -> Self {
        debug_assert!(sequence >= 0 && sequence <= SEQUENCE_MASK, "sequence overflow");
        debug_assert!(epoch >= 0, "epoch underflow");
        debug_assert!(
            (section == 0 && epoch <= MAX_EPOCH) || epoch <= MAX_SECTIONED_EPOCH,
            "epoch overflow"
        );
        let raw = ((section as i64) << SECTION_SHIFT) | (epoch << SEQUENCE_BITS) | sequence;
        Self { raw }
    }

    /// Wraps a raw value.
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Returns the raw value.
    pub const fn to_raw(self) -> i64 {
        self.raw
    }

    /// The section tag (bits 60..=62). Meaningless for generators configured
    /// without a section, where these bits belong to the epoch.
    pub const fn section(self) -> u8 {
        ((self.raw & SECTION_MASK) >> SECTION_SHIFT) as u8
    }

    /// Every bit above the sequence, i.e. the epoch of a generator configured
    /// without a section.
    pub const fn epoch(self) -> i64 {
        (self.raw & HIGH_MASK) >> SEQUENCE_BITS
    }

    /// The epoch of a generator configured with a section (bits 36..=59).
    pub const fn sectioned_epoch(self) -> i64 {
        self.epoch() & MAX_SECTIONED_EPOCH
    }

    /// The locally incremented segment.
    pub const fn sequence(self) -> i64 {
        self.raw & SEQUENCE_MASK
    }

    /// Returns `true` once the sequence reached [`PANIC_THRESHOLD`].
    pub const fn is_exhausted(self) -> bool {
        self.sequence() >= PANIC_THRESHOLD
    }

    /// Returns `true` when this exact value should trigger a renewal attempt:
    /// past [`CRITICAL_THRESHOLD`] and aligned to [`RENEW_INTERVAL_MASK`].
    pub const fn is_renewal_point(self) -> bool {
        let sequence = self.sequence();
        sequence >= CRITICAL_THRESHOLD && sequence & RENEW_INTERVAL_MASK == 0
    }

    /// Same high segments, sequence pinned to [`PANIC_THRESHOLD`].
    pub const fn clamped(self) -> Self {
        Self::from_raw((self.raw & HIGH_MASK) | PANIC_THRESHOLD)
    }

    /// Replaces the section bits with `section`.
    pub const fn with_section(self, section: u8) -> Self {
        Self::from_raw((self.raw & LOW_60_MASK) | ((section as i64) << SECTION_SHIFT))
    }

    /// Rounds up to the next multiple of `step`, a power of two.
    pub const fn align_up(self, step: i64) -> Self {
        let ones = step - 1;
        if self.raw & ones == 0 {
            self
        } else {
            Self::from_raw((self.raw & !ones) + step)
        }
    }
}

impl From<i64> for PackedId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<PackedId> for i64 {
    fn from(id: PackedId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for PackedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Debug for PackedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedId")
            .field("id", &format_args!("{} (0x{:016x})", self.raw, self.raw))
            .field("section", &self.section())
            .field("epoch", &format_args!("{} (0x{:x})", self.epoch(), self.epoch()))
            .field(
                "sequence",
                &format_args!("{} (0x{:x})", self.sequence(), self.sequence()),
            )
            .finish()
    }
}
