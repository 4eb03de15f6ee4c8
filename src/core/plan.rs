//! Plan configuration for the two pricing shapes.
//!
//! All amounts are expressed in the base currency. Plans are plain values:
//! they are deserialized or constructed once and never mutated.
use crate::core::error::{Result, ensure_amount, ensure_rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Flat-fee plan: a fixed monthly price plus a percentage of revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub fixed_monthly: Decimal,
    pub revenue_percentage: Decimal,
}

impl LaunchConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("launch.fixed_monthly", self.fixed_monthly)?;
        ensure_rate("launch.revenue_percentage", self.revenue_percentage)?;
        Ok(())
    }

    /// `fixed_monthly + revenue_percentage * revenue`
    pub fn monthly_fee(&self, revenue: Decimal) -> Result<Decimal> {
        self.validate()?;
        let revenue = ensure_amount("revenue", revenue)?;
        Ok(self.fixed_monthly + self.revenue_percentage * revenue)
    }
}

/// Seed for the tiered plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub fixed_monthly: Decimal,
    pub per_department: Decimal,
    pub base_take_rate: Decimal,
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_amount("scale.fixed_monthly", self.fixed_monthly)?;
        ensure_amount("scale.per_department", self.per_department)?;
        ensure_rate("scale.base_take_rate", self.base_take_rate)?;
        Ok(())
    }

    /// `fixed_monthly + per_department * departments + effective_rate * revenue`
    pub fn monthly_fee(
        &self,
        effective_rate: Decimal,
        departments: u32,
        revenue: Decimal,
    ) -> Result<Decimal> {
        self.validate()?;
        let effective_rate = ensure_rate("effective_rate", effective_rate)?;
        let revenue = ensure_amount("revenue", revenue)?;
        Ok(self.fixed_monthly
            + self.per_department * Decimal::from(departments)
            + effective_rate * revenue)
    }
}

/// Both plans offered side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plans {
    pub launch: LaunchConfig,
    pub scale: ScaleConfig,
}

impl Plans {
    pub fn validate(&self) -> Result<()> {
        self.launch.validate()?;
        self.scale.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Launch,
    Scale,
}

impl Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PlanKind::Launch => "Launch",
                PlanKind::Scale => "Scale",
            }
        )
    }
}

impl FromStr for PlanKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "launch" => Ok(PlanKind::Launch),
            "scale" => Ok(PlanKind::Scale),
            _ => Err(anyhow::anyhow!("Invalid plan: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PricingError;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn launch() -> LaunchConfig {
        LaunchConfig {
            fixed_monthly: d("99"),
            revenue_percentage: d("0.02"),
        }
    }

    fn scale() -> ScaleConfig {
        ScaleConfig {
            fixed_monthly: d("499"),
            per_department: d("49"),
            base_take_rate: d("0.015"),
        }
    }

    #[test]
    fn test_launch_fee() {
        assert_eq!(launch().monthly_fee(d("0")).unwrap(), d("99"));
        assert_eq!(launch().monthly_fee(d("100000")).unwrap(), d("2099"));
    }

    #[test]
    fn test_scale_fee() {
        let fee = scale().monthly_fee(d("0.014"), 3, d("2000000")).unwrap();
        assert_eq!(fee, d("499") + d("147") + d("28000"));
    }

    #[test]
    fn test_negative_revenue_is_rejected() {
        assert!(matches!(
            launch().monthly_fee(d("-1")),
            Err(PricingError::NegativeAmount { field: "revenue", .. })
        ));
        assert!(matches!(
            scale().monthly_fee(d("0.015"), 1, d("-0.01")),
            Err(PricingError::NegativeAmount { field: "revenue", .. })
        ));
    }

    #[test]
    fn test_invalid_plans_are_rejected() {
        let mut bad = scale();
        bad.per_department = d("-5");
        assert!(matches!(
            bad.validate(),
            Err(PricingError::NegativeAmount {
                field: "scale.per_department",
                ..
            })
        ));

        let mut bad = launch();
        bad.revenue_percentage = d("1.5");
        assert!(matches!(
            bad.validate(),
            Err(PricingError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_plan_kind_parsing() {
        assert_eq!("launch".parse::<PlanKind>().unwrap(), PlanKind::Launch);
        assert_eq!("SCALE".parse::<PlanKind>().unwrap(), PlanKind::Scale);
        assert!("enterprise".parse::<PlanKind>().is_err());
        assert_eq!(PlanKind::Scale.to_string(), "Scale");
    }

    #[test]
    fn test_plans_deserialize_from_yaml_numbers() {
        let yaml = r#"
launch:
  fixed_monthly: 99
  revenue_percentage: 0.02
scale:
  fixed_monthly: 499
  per_department: 49
  base_take_rate: 0.015
"#;
        let plans: Plans = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plans.launch, launch());
        assert_eq!(plans.scale, scale());
        assert!(plans.validate().is_ok());
    }
}
