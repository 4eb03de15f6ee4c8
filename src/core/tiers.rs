//! Generation of the tiered take-rate schedule for the Scale plan.
//!
//! Each tier after the first is derived from its predecessor by a step rule
//! chosen by position. The rules live in [`STEP_RULES`]; changing where the
//! decay slows down means editing that table, not the generator.
use crate::core::error::{PricingError, Result};
use crate::core::plan::ScaleConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;

/// Revenue threshold of tier 1, in base currency units.
pub const INITIAL_THRESHOLD: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// No tier ever charges less than this.
pub const TAKE_RATE_FLOOR: Decimal = Decimal::from_parts(7, 0, 0, false, 3);

/// One band of the Scale plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTier {
    pub tier: u32,
    pub revenue_threshold: Decimal,
    pub take_rate: Decimal,
    /// Factor applied to the previous tier's threshold; `None` for tier 1.
    pub revenue_multiplier: Option<Decimal>,
    /// Amount subtracted from the previous tier's rate; `None` for tier 1.
    pub rate_reduction: Option<Decimal>,
}

/// How a tier is derived from the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRule {
    /// First tier position this rule applies to.
    pub from_tier: u32,
    pub multiplier: Decimal,
    pub reduction: Decimal,
}

const TWO: Decimal = Decimal::TWO;
const ONE_AND_A_HALF: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const ONE_TENTH_PERCENT: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
const ONE_TWENTIETH_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 4);

/// Ordered by `from_tier`. The last rule whose `from_tier` is at or below a
/// position governs that position.
pub const STEP_RULES: &[StepRule] = &[
    StepRule {
        from_tier: 2,
        multiplier: TWO,
        reduction: ONE_TENTH_PERCENT,
    },
    StepRule {
        from_tier: 3,
        multiplier: ONE_AND_A_HALF,
        reduction: ONE_TENTH_PERCENT,
    },
    StepRule {
        from_tier: 4,
        multiplier: ONE_AND_A_HALF,
        reduction: ONE_TWENTIETH_PERCENT,
    },
];

fn rule_for(tier: u32) -> Option<&'static StepRule> {
    STEP_RULES.iter().rev().find(|rule| rule.from_tier <= tier)
}

/// An ordered, immutable tier list produced by [`generate_scale_tiers`].
///
/// Tiers ascend by number and threshold, and take rates never increase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TierSchedule {
    tiers: Vec<ScaleTier>,
}

impl TierSchedule {
    pub fn tiers(&self) -> &[ScaleTier] {
        &self.tiers
    }

    pub fn into_inner(self) -> Vec<ScaleTier> {
        self.tiers
    }
}

impl Deref for TierSchedule {
    type Target = [ScaleTier];

    fn deref(&self) -> &Self::Target {
        &self.tiers
    }
}

impl<'a> IntoIterator for &'a TierSchedule {
    type Item = &'a ScaleTier;
    type IntoIter = std::slice::Iter<'a, ScaleTier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

fn next_tier(previous: &ScaleTier) -> Result<ScaleTier> {
    let tier = previous.tier + 1;
    // Every position ≥ 2 is covered by a rule.
    let rule = rule_for(tier).unwrap_or(&STEP_RULES[STEP_RULES.len() - 1]);

    let revenue_threshold = previous
        .revenue_threshold
        .checked_mul(rule.multiplier)
        .ok_or(PricingError::ThresholdOverflow { tier })?;

    Ok(ScaleTier {
        tier,
        revenue_threshold: revenue_threshold.normalize(),
        take_rate: (previous.take_rate - rule.reduction).max(TAKE_RATE_FLOOR),
        revenue_multiplier: Some(rule.multiplier),
        rate_reduction: Some(rule.reduction),
    })
}

/// Builds `tier_count` tiers from `config`. Zero tiers yields an empty
/// schedule.
///
/// Fails with [`PricingError::ThresholdOverflow`] when a threshold would not
/// fit in a `Decimal`.
pub fn generate_scale_tiers(config: &ScaleConfig, tier_count: u32) -> Result<TierSchedule> {
    config.validate()?;

    if tier_count == 0 {
        debug!("Requested zero tiers, returning empty schedule");
        return Ok(TierSchedule::default());
    }

    let mut tiers = Vec::with_capacity(tier_count.min(256) as usize);
    let mut current = ScaleTier {
        tier: 1,
        revenue_threshold: INITIAL_THRESHOLD,
        take_rate: config.base_take_rate.max(TAKE_RATE_FLOOR),
        revenue_multiplier: None,
        rate_reduction: None,
    };
    for _ in 1..tier_count {
        let next = next_tier(&current)?;
        tiers.push(current);
        current = next;
    }
    tiers.push(current);

    debug!(
        "Generated {} tiers from base take rate {}",
        tiers.len(),
        config.base_take_rate
    );
    Ok(TierSchedule { tiers })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn config(base_take_rate: &str) -> ScaleConfig {
        ScaleConfig {
            fixed_monthly: d("499"),
            per_department: d("49"),
            base_take_rate: d(base_take_rate),
        }
    }

    #[test]
    fn test_first_tiers() {
        let tiers = generate_scale_tiers(&config("0.015"), 15).unwrap();
        assert_eq!(tiers.len(), 15);

        assert_eq!(tiers[0].tier, 1);
        assert_eq!(tiers[0].revenue_threshold, d("1000000"));
        assert_eq!(tiers[0].take_rate, d("0.015"));
        assert_eq!(tiers[0].revenue_multiplier, None);
        assert_eq!(tiers[0].rate_reduction, None);

        assert_eq!(tiers[1].revenue_threshold, d("2000000"));
        assert_eq!(tiers[1].take_rate, d("0.014"));
        assert_eq!(tiers[1].revenue_multiplier, Some(d("2")));
        assert_eq!(tiers[1].rate_reduction, Some(d("0.001")));

        assert_eq!(tiers[2].revenue_threshold, d("3000000"));
        assert_eq!(tiers[2].take_rate, d("0.013"));
        assert_eq!(tiers[2].revenue_multiplier, Some(d("1.5")));
        assert_eq!(tiers[2].rate_reduction, Some(d("0.001")));

        assert_eq!(tiers[3].revenue_threshold, d("4500000"));
        assert_eq!(tiers[3].take_rate, d("0.0125"));
        assert_eq!(tiers[3].revenue_multiplier, Some(d("1.5")));
        assert_eq!(tiers[3].rate_reduction, Some(d("0.0005")));
    }

    #[test]
    fn test_rate_is_clamped_at_floor() {
        let tiers = generate_scale_tiers(&config("0.015"), 15).unwrap();
        // 0.013 - 11 * 0.0005 = 0.0075 at tier 14; tier 15 lands on the floor.
        assert_eq!(tiers[13].take_rate, d("0.0075"));
        assert_eq!(tiers[14].take_rate, d("0.007"));

        let long = generate_scale_tiers(&config("0.015"), 25).unwrap();
        assert!(long[15..].iter().all(|t| t.take_rate == TAKE_RATE_FLOOR));
    }

    #[test]
    fn test_schedule_invariants() {
        for base in ["0", "0.005", "0.007", "0.01", "0.015", "0.03", "0.1"] {
            for count in [1, 2, 3, 4, 5, 10, 15, 16, 30, 60, 100, 120] {
                let tiers = generate_scale_tiers(&config(base), count).unwrap();
                assert_eq!(tiers.len(), count as usize);
                assert_eq!(tiers[0].revenue_multiplier, None);
                assert_eq!(tiers[0].rate_reduction, None);

                for (i, tier) in tiers.iter().enumerate() {
                    assert_eq!(tier.tier, i as u32 + 1);
                    assert!(tier.take_rate >= TAKE_RATE_FLOOR);
                }
                for pair in tiers.windows(2) {
                    assert!(pair[1].revenue_threshold > pair[0].revenue_threshold);
                    assert!(pair[1].take_rate <= pair[0].take_rate);
                }
            }
        }
    }

    #[test]
    fn test_oversized_tier_count_reports_overflow() {
        let tier = match generate_scale_tiers(&config("0.015"), 200) {
            Err(PricingError::ThresholdOverflow { tier }) => tier,
            other => panic!("expected threshold overflow, got {other:?}"),
        };
        assert!(tier > 120 && tier <= 200, "overflow at tier {tier}");

        // Every count below the overflowing tier still builds.
        let largest = generate_scale_tiers(&config("0.015"), tier - 1).unwrap();
        assert_eq!(largest.len(), tier as usize - 1);
        for pair in largest.windows(2) {
            assert!(pair[1].revenue_threshold > pair[0].revenue_threshold);
        }
        assert_eq!(
            generate_scale_tiers(&config("0.015"), tier),
            Err(PricingError::ThresholdOverflow { tier })
        );
        assert!(generate_scale_tiers(&config("0.015"), u32::MAX).is_err());
    }

    #[test]
    fn test_rule_table_values() {
        assert_eq!(STEP_RULES[0].multiplier, d("2"));
        assert_eq!(STEP_RULES[1].multiplier, d("1.5"));
        assert_eq!(STEP_RULES[1].reduction, d("0.001"));
        assert_eq!(STEP_RULES[2].reduction, d("0.0005"));
        assert_eq!(INITIAL_THRESHOLD, d("1000000"));
        assert_eq!(TAKE_RATE_FLOOR, d("0.007"));
    }

    #[test]
    fn test_zero_tiers_is_empty() {
        let tiers = generate_scale_tiers(&config("0.015"), 0).unwrap();
        assert!(tiers.is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_scale_tiers(&config("0.015"), 12).unwrap();
        let b = generate_scale_tiers(&config("0.015"), 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(generate_scale_tiers(&config("-0.01"), 5).is_err());

        let mut bad = config("0.015");
        bad.fixed_monthly = d("-1");
        assert!(generate_scale_tiers(&bad, 5).is_err());
    }

    #[test]
    fn test_rule_lookup() {
        assert_eq!(rule_for(1), None);
        assert_eq!(rule_for(2).map(|r| r.from_tier), Some(2));
        assert_eq!(rule_for(3).map(|r| r.from_tier), Some(3));
        assert_eq!(rule_for(4).map(|r| r.from_tier), Some(4));
        assert_eq!(rule_for(40).map(|r| r.from_tier), Some(4));
    }
}
