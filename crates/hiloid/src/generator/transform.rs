use crate::{GeneratorConfig, HIGH_MASK, SEQUENCE_MASK};

/// Output transform applied to every raw value before it leaves `next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transform {
    Plain,
    Obfuscated { mask: i64 },
    Floored { floor: i64 },
    ObfuscatedFloored { mask: i64, floor: i64 },
}

impl Transform {
    pub(crate) fn from_config(config: &GeneratorConfig) -> Self {
        let floor = i64::from(config.floor());
        match (config.obfuscation_mask(), floor) {
            (None, 0) => Self::Plain,
            (Some(mask), 0) => Self::Obfuscated { mask },
            (None, floor) => Self::Floored { floor },
            (Some(mask), floor) => Self::ObfuscatedFloored { mask, floor },
        }
    }

    #[inline]
    pub(crate) fn apply(self, raw: i64) -> i64 {
        match self {
            Self::Plain => raw,
            Self::Obfuscated { mask } => obfuscate(raw, mask),
            Self::Floored { floor } => raw / floor * floor,
            Self::ObfuscatedFloored { mask, floor } => obfuscate(raw, mask) / floor * floor,
        }
    }
}

/// XORs `mask` into the sequence bits only. Self-inverse.
#[inline]
pub(crate) const fn obfuscate(raw: i64, mask: i64) -> i64 {
    (raw & HIGH_MASK) | ((raw ^ mask) & SEQUENCE_MASK)
}
