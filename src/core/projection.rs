//! Forward projection of a fund's value under periodic unit purchases.

use crate::core::fund::Fund;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Daily => 365,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Yearly => 1,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Frequency::Daily => "daily",
                Frequency::Weekly => "weekly",
                Frequency::Monthly => "monthly",
                Frequency::Yearly => "yearly",
            }
        )
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(anyhow::anyhow!("Invalid frequency: {}", s)),
        }
    }
}

/// User supplied growth assumptions, independent of any fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub contribution_units: f64,
    pub frequency: Frequency,
    pub growth_rate: f64,
    pub years: i64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            contribution_units: 0.0,
            frequency: Frequency::Monthly,
            growth_rate: 10.0,
            years: 10,
        }
    }
}

/// Longest horizon a projection accepts; anything beyond is invalid input.
pub const MAX_PROJECTION_YEARS: i64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub starting_value: f64,
    pub unit_price: f64,
    pub contribution_units: f64,
    pub frequency: Frequency,
    /// Percent per year, `10.0` means 10%.
    pub annual_growth_rate: f64,
    pub years: i64,
}

impl ProjectionInput {
    pub fn for_fund(fund: &Fund, assumptions: &Assumptions) -> Self {
        ProjectionInput {
            starting_value: fund.current_value(),
            unit_price: fund.nav(),
            contribution_units: assumptions.contribution_units,
            frequency: assumptions.frequency,
            annual_growth_rate: assumptions.growth_rate,
            years: assumptions.years,
        }
    }

    fn is_valid(&self) -> bool {
        self.unit_price.is_finite()
            && self.unit_price > 0.0
            && self.starting_value.is_finite()
            && self.starting_value >= 0.0
            && self.contribution_units.is_finite()
            && self.contribution_units >= 0.0
            && self.annual_growth_rate.is_finite()
            && self.annual_growth_rate >= 0.0
            && (0..=MAX_PROJECTION_YEARS).contains(&self.years)
    }

    /// Total amount invested over one year of contributions.
    pub fn annual_contribution(&self) -> f64 {
        self.contribution_units * self.unit_price * f64::from(self.frequency.periods_per_year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub year: u32,
    pub value: f64,
}

/// Projects yearly values, year 0 included.
///
/// The whole year's contribution is added before one annual compounding
/// step, and the running total is rounded to a whole currency unit every
/// year. Invalid inputs give an empty series.
pub fn project(input: &ProjectionInput) -> Vec<ProjectionPoint> {
    if !input.is_valid() {
        return Vec::new();
    }

    let rate = input.annual_growth_rate / 100.0;
    let contribution = input.annual_contribution();

    let Ok(years) = u32::try_from(input.years) else {
        return Vec::new();
    };

    let mut value = input.starting_value.round();
    let mut series = vec![ProjectionPoint { year: 0, value }];
    for year in 1..=years {
        value = ((value + contribution) * (1.0 + rate)).round();
        series.push(ProjectionPoint { year, value });
    }

    series
}
