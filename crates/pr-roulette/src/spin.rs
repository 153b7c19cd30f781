//! Reel geometry for the looping spin.
//!
//! A reel is the eligible list repeated `loop_multiplier` times. Each tick
//! moves the offset forward by `speed` and wraps it at the end of the loop.
//! When a draw lands, the reel settles on an offset that places the chosen
//! item on the center row after a couple of full loops.

use crate::config::SpinConfig;

/// A looping reel over `len` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spinner {
    len: u64,
    offset: u64,
    ticks: u64,
    config: SpinConfig,
}

impl Spinner {
    /// Create a reel over `len` items at offset 0.
    pub fn new(len: usize, config: &SpinConfig) -> Self {
        Self {
            len: len as u64,
            offset: 0,
            ticks: 0,
            config: config.clone(),
        }
    }

    /// Number of distinct items on the reel.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the reel is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current scroll offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Ticks advanced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Length of one full loop of the reel. Saturates on oversized configs.
    pub fn loop_height(&self) -> u64 {
        self.len
            .saturating_mul(self.config.item_height)
            .saturating_mul(self.config.loop_multiplier.max(1))
    }

    /// Rows visible at once, clamped to the configured bounds.
    pub fn visible_rows(&self) -> u64 {
        self.len
            .max(self.config.min_visible_rows)
            .min(self.config.max_visible_rows)
    }

    fn center_offset(&self) -> u64 {
        (self.visible_rows() / 2).saturating_mul(self.config.item_height)
    }

    /// Move the reel one tick forward. Returns the new offset.
    pub fn advance(&mut self) -> u64 {
        self.ticks = self.ticks.saturating_add(1);
        let total = self.loop_height();
        if total == 0 {
            return self.offset;
        }
        self.offset = self.offset.saturating_add(self.config.speed);
        if self.offset > total {
            self.offset %= total;
        }
        self.offset
    }

    /// The offset that centers item `index` after at least one full loop.
    pub fn settle_offset(&self, index: usize) -> u64 {
        let loops = (self.config.loop_multiplier / 2).max(1);
        (index as u64)
            .saturating_add(loops.saturating_mul(self.len))
            .saturating_mul(self.config.item_height)
            .saturating_sub(self.center_offset())
    }

    /// Jump to the settle position for `index`.
    pub fn settle(&mut self, index: usize) -> u64 {
        self.offset = self.settle_offset(index);
        self.offset
    }

    /// Index of the item currently on the center row.
    pub fn centered_index(&self) -> usize {
        if self.len == 0 || self.config.item_height == 0 {
            return 0;
        }
        ((self.offset.saturating_add(self.center_offset()) / self.config.item_height) % self.len)
            as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reel(len: usize) -> Spinner {
        Spinner::new(len, &SpinConfig::default())
    }

    #[test]
    fn advance_wraps_at_loop_height() {
        let mut s = reel(2);
        // 2 items * 64 * 5 = 640
        assert_eq!(s.loop_height(), 640);
        for _ in 0..4 {
            s.advance();
        }
        assert_eq!(s.offset(), 600);
        assert_eq!(s.advance(), 750 % 640);
        assert_eq!(s.ticks(), 5);
    }

    #[test]
    fn empty_reel_never_moves() {
        let mut s = reel(0);
        assert_eq!(s.advance(), 0);
        assert_eq!(s.centered_index(), 0);
    }

    #[test]
    fn visible_rows_clamped() {
        assert_eq!(reel(1).visible_rows(), 3);
        assert_eq!(reel(4).visible_rows(), 4);
        assert_eq!(reel(12).visible_rows(), 5);
    }

    #[test]
    fn settle_centers_the_chosen_item() {
        for len in 1..15 {
            let mut s = reel(len);
            for _ in 0..7 {
                s.advance();
            }
            for index in 0..len {
                s.settle(index);
                assert_eq!(s.centered_index(), index, "len {len} index {index}");
            }
        }
    }

    #[test]
    fn settle_offset_matches_layout() {
        // 12 items, 5 rows, center row 2, two loops before landing.
        let s = reel(12);
        assert_eq!(s.settle_offset(3), (3 + 2 * 12) * 64 - 2 * 64);
    }

    #[test]
    fn oversized_config_does_not_overflow() {
        let config = SpinConfig {
            item_height: u64::MAX / 4,
            speed: u64::MAX,
            loop_multiplier: u64::MAX,
            ..SpinConfig::default()
        };
        let mut s = Spinner::new(12, &config);
        assert_eq!(s.loop_height(), u64::MAX);
        s.advance();
        s.advance();
        assert!(s.offset() <= s.loop_height());
        s.settle(11);
        assert!(s.centered_index() < 12);
    }
}
