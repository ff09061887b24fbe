use crate::block::Configuration;
use crate::scene::class::ScenarioKind;

/// Run sequencing of a scenario.
///
/// | protocol      | real runs                  | synthesized |
/// |---------------|----------------------------|-------------|
/// | `Train`       | 1 (A)                      | -           |
/// | `MirrorMagic` | 1 (A), 2 (B)               | 3, 4        |
/// | `FullMagic`   | 1 (A), 2 (B), 3 (A, trick) | 4           |
///
/// Runs 1 and 2 of test protocols are the observer runs the magic ticks are derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    Train,
    MirrorMagic,
    FullMagic,
}

impl Protocol {
    /// Train scenes get [`Protocol::Train`], two-trick tests [`Protocol::FullMagic`] and every
    /// other test [`Protocol::MirrorMagic`].
    pub fn for_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Train => Protocol::Train,
            ScenarioKind::Test(class) if class.motion.trick_count() > 1 => Protocol::FullMagic,
            ScenarioKind::Test(_) => Protocol::MirrorMagic,
        }
    }

    pub fn real_runs(self) -> usize {
        match self {
            Protocol::Train => 1,
            Protocol::MirrorMagic => 2,
            Protocol::FullMagic => 3,
        }
    }

    pub fn synthetic_runs(self) -> usize {
        match self {
            Protocol::Train => 0,
            Protocol::MirrorMagic => 2,
            Protocol::FullMagic => 1,
        }
    }

    pub fn total_runs(self) -> usize {
        self.real_runs() + self.synthetic_runs()
    }

    /// Whether run `index` (0-based) is simulated rather than synthesized.
    pub fn plays(self, index: usize) -> bool {
        index < self.real_runs()
    }

    pub fn is_observer(self, index: usize) -> bool {
        self != Protocol::Train && index < 2
    }

    /// Magic ticks are resolved once this run is complete.
    pub fn resolves_ticks_after(self, index: usize) -> bool {
        self != Protocol::Train && index == 1
    }

    pub fn configuration(self, index: usize) -> Configuration {
        match (self, index) {
            (Protocol::Train, _) => Configuration::A,
            (_, 1) => Configuration::B,
            _ => Configuration::A,
        }
    }

    /// Whether the block's trick is played in-world during run `index`.
    pub fn applies_trick(self, index: usize) -> bool {
        self == Protocol::FullMagic && index == 2
    }

    pub fn is_possible(self, index: usize) -> bool {
        match self {
            Protocol::Train => true,
            Protocol::MirrorMagic | Protocol::FullMagic => index < 2,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Protocol::Train => "train",
            Protocol::MirrorMagic => "mirror",
            Protocol::FullMagic => "full",
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenario/protocol.rs"]
mod tests;
