//! Subscription-tier result ceilings.

use serde::{Deserialize, Serialize};

/// Default ceiling for free accounts.
pub const DEFAULT_FREE_CEILING: usize = 5;
/// Default ceiling for paid accounts.
pub const DEFAULT_PREMIUM_CEILING: usize = 50;

/// Billing tier of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

/// Per-tier result ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierLimits {
    pub free: usize,
    pub premium: usize,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            free: DEFAULT_FREE_CEILING,
            premium: DEFAULT_PREMIUM_CEILING,
        }
    }
}

impl TierLimits {
    pub fn ceiling_for(&self, tier: SubscriptionTier) -> usize {
        match tier {
            SubscriptionTier::Free => self.free,
            SubscriptionTier::Premium => self.premium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SubscriptionTier, TierLimits};

    #[test]
    fn free_tier_gets_lower_ceiling_by_default() {
        let limits = TierLimits::default();
        assert!(
            limits.ceiling_for(SubscriptionTier::Free)
                < limits.ceiling_for(SubscriptionTier::Premium)
        );
    }
}
