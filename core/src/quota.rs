//! Tier and generation quota tracking
//!
//! Standard users get a fixed number of code generations that can be topped up
//! by solving puzzles. Pro users are never limited.

use crate::config::QuotaConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Limited generations
    Standard,
    /// Unlimited generations
    Pro,
}

impl Tier {
    /// Get a display name for the tier
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Standard => "Nox Standard",
            Tier::Pro => "Nox Pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Generations left, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// No limit applies
    Unlimited,
    /// This many generations are left
    Count(u32),
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Unlimited => f.write_str("Unlimited"),
            Remaining::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Per-tier generation ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    /// Ceiling for the Standard tier
    pub standard: u32,
}

impl TierLimits {
    /// Ceiling for the given tier
    pub fn ceiling(&self, tier: Tier) -> Remaining {
        match tier {
            Tier::Standard => Remaining::Count(self.standard),
            Tier::Pro => Remaining::Unlimited,
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self { standard: 20 }
    }
}

impl From<&QuotaConfig> for TierLimits {
    fn from(config: &QuotaConfig) -> Self {
        Self {
            standard: config.standard_limit,
        }
    }
}

/// Tracks the active tier and its remaining generations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaTracker {
    tier: Tier,
    remaining: u32,
    limits: TierLimits,
}

impl QuotaTracker {
    /// Create a tracker for `tier`, starting at the tier's ceiling
    pub fn new(tier: Tier, limits: TierLimits) -> Self {
        let mut tracker = Self {
            tier,
            remaining: 0,
            limits,
        };
        tracker.switch_tier(tier);
        tracker
    }

    /// Active tier
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Configured ceilings
    pub fn limits(&self) -> TierLimits {
        self.limits
    }

    /// Generations left. Pro always reports unlimited.
    pub fn remaining(&self) -> Remaining {
        match self.tier {
            Tier::Pro => Remaining::Unlimited,
            Tier::Standard => Remaining::Count(self.remaining),
        }
    }

    /// Whether another generation is allowed
    pub fn can_generate(&self) -> bool {
        match self.remaining() {
            Remaining::Unlimited => true,
            Remaining::Count(n) => n > 0,
        }
    }

    /// Record one generation. Never goes below zero; no-op for Pro.
    pub fn consume(&mut self) {
        if self.tier == Tier::Standard {
            self.remaining = self.remaining.saturating_sub(1);
        }
    }

    /// Add `amount` generations. No-op for Pro.
    pub fn reward(&mut self, amount: u32) {
        if self.tier == Tier::Standard {
            self.remaining = self.remaining.saturating_add(amount);
        }
    }

    /// Switch tier and reset the counter to the new tier's ceiling
    pub fn switch_tier(&mut self, tier: Tier) {
        self.tier = tier;
        self.remaining = match self.limits.ceiling(tier) {
            Remaining::Count(n) => n,
            Remaining::Unlimited => u32::MAX,
        };
    }
}
