//! Packed per-line fold records.
//!
//! A record holds the level at the start of a line in the low 12 bits, the level after the
//! line in bits 16..28, and two flags in bits 12 and 13:
//!
//! ```text
//!  31       28 27          16 15   14   13     12    11           0
//! ┌──────────┬──────────────┬────┬────┬──────┬─────┬──────────────┐
//! │  unused  │  next level  │ -- │ -- │header│white│ current level│
//! └──────────┴──────────────┴────┴────┴──────┴─────┴──────────────┘
//! ```

/// Base fold level; lines outside any fold sit at this level.
pub const FOLD_BASE: u32 = 0x400;

/// A packed fold record for one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldLevel(u32);

impl FoldLevel {
    /// Mask for a level number.
    pub const NUMBER_MASK: u32 = 0x0FFF;
    /// Set on lines with no visible character (only when compact folding is on).
    pub const WHITE_FLAG: u32 = 0x1000;
    /// Set on lines whose level increases after them.
    pub const HEADER_FLAG: u32 = 0x2000;

    /// Pack a record from the level at this line and the level after it.
    pub const fn new(current: u32, next: u32) -> Self {
        Self((current & Self::NUMBER_MASK) | ((next & Self::NUMBER_MASK) << 16))
    }

    /// Reinterpret a raw packed value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw packed value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Level at the start of the line.
    pub const fn current(self) -> u32 {
        self.0 & Self::NUMBER_MASK
    }

    /// Level after the line.
    pub const fn next(self) -> u32 {
        (self.0 >> 16) & Self::NUMBER_MASK
    }

    /// Returns `true` if a fold opens on this line.
    pub const fn is_header(self) -> bool {
        self.0 & Self::HEADER_FLAG != 0
    }

    /// Returns `true` if the line has no visible characters.
    pub const fn is_whitespace(self) -> bool {
        self.0 & Self::WHITE_FLAG != 0
    }

    /// Set the header flag.
    pub const fn with_header(self) -> Self {
        Self(self.0 | Self::HEADER_FLAG)
    }

    /// Set the whitespace flag.
    pub const fn with_whitespace(self) -> Self {
        Self(self.0 | Self::WHITE_FLAG)
    }

    /// Nesting depth at the start of the line, relative to [`FOLD_BASE`].
    pub const fn depth(self) -> u32 {
        self.current().saturating_sub(FOLD_BASE)
    }
}

impl Default for FoldLevel {
    fn default() -> Self {
        Self::new(FOLD_BASE, FOLD_BASE)
    }
}

/// A fold record that differed from the stored one and was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldChange {
    /// Physical line number.
    pub line: usize,
    /// The record stored before the pass.
    pub old: FoldLevel,
    /// The record written by the pass.
    pub new: FoldLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_unpack() {
        let level = FoldLevel::new(FOLD_BASE, FOLD_BASE + 2);
        assert_eq!(level.current(), FOLD_BASE);
        assert_eq!(level.next(), FOLD_BASE + 2);
        assert_eq!(level.raw(), 0x400 | (0x402 << 16));
        assert!(!level.is_header());
        assert!(!level.is_whitespace());
        assert_eq!(level.depth(), 0);
    }

    #[test]
    fn test_flags_do_not_disturb_levels() {
        let level = FoldLevel::new(FOLD_BASE + 1, FOLD_BASE + 2)
            .with_header()
            .with_whitespace();
        assert!(level.is_header());
        assert!(level.is_whitespace());
        assert_eq!(level.current(), FOLD_BASE + 1);
        assert_eq!(level.next(), FOLD_BASE + 2);
        assert_eq!(FoldLevel::from_raw(level.raw()), level);
    }

    #[test]
    fn test_default_is_base() {
        let level = FoldLevel::default();
        assert_eq!(level.current(), FOLD_BASE);
        assert_eq!(level.next(), FOLD_BASE);
    }

    #[test]
    fn test_levels_are_masked() {
        let level = FoldLevel::new(0x1FFF, 0x1001);
        assert_eq!(level.current(), 0x0FFF);
        assert_eq!(level.next(), 0x0001);
        assert!(!level.is_whitespace());
    }
}
