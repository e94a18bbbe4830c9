//! Finished-good cost rollup.
//!
//! A [`BomLineItem`] is priced from the materials it consumes plus a handful of fixed
//! per-unit costs, then loaded with overhead percentages that are summed (never
//! compounded) into one blended rate `p`. Channel markups (B2B, D2C) are added to `p`
//! and applied once to the raw cost. Everything here is pure and synchronous: every
//! operation takes its input by value and returns an updated copy.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Decimal places kept on a material row's derived rate.
pub const MATERIAL_RATE_DP: u32 = 4;
/// Decimal places kept on the derived unit prices.
pub const UNIT_RATE_DP: u32 = 2;

/// Rounds half away from zero, the way a currency display rounds, and pads to
/// exactly `dp` places so `43.7` is carried as `43.70`.
#[must_use]
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// The two kinds of catalog item a BOM can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Raw material (`rm`)
    #[serde(rename = "rm")]
    RawMaterial,
    /// Semi-finished good (`sfg`)
    #[serde(rename = "sfg")]
    SemiFinishedGood,
}

impl ItemKind {
    /// Short code used in storage and in the submission body.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RawMaterial => "rm",
            Self::SemiFinishedGood => "sfg",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RawMaterial => "Raw material",
            Self::SemiFinishedGood => "Semi-finished good",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rm" => Ok(Self::RawMaterial),
            "sfg" => Ok(Self::SemiFinishedGood),
            other => Err(crate::errors::Error::UnknownItemKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Reference to one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    /// Which catalog the item lives in
    pub kind: ItemKind,
    /// Primary key within that catalog
    pub id: i64,
}

/// One row of a BOM: a catalog item cut to `height × width`, `qty` pieces per unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialConsumption {
    /// Matched catalog item, `None` until the user picks one
    pub item: Option<ItemRef>,
    /// Piece height in inches
    pub height: Decimal,
    /// Piece width in inches
    pub width: Decimal,
    /// Pieces consumed per unit
    pub qty: Decimal,
    /// Cost per square inch of the referenced item
    pub sq_inch_rate: Decimal,
    /// Derived cost of this row, see [`recompute_material_rate`]
    pub rate: Decimal,
}

/// Costs added to the raw material cost as flat per-unit amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCosts {
    /// Stitching cost per unit
    pub stitching: Decimal,
    /// Printing cost per unit
    pub printing: Decimal,
    /// Any other per-unit cost
    pub others: Decimal,
}

/// Overhead loadings, each a percentage of the raw cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overheads {
    /// Rejection allowance
    pub rejection: Decimal,
    /// Quality control
    #[serde(rename = "QC", alias = "qc")]
    pub qc: Decimal,
    /// Machine maintenance
    #[serde(rename = "machineMaintainance", alias = "machine_maintainance")]
    pub machine_maintainance: Decimal,
    /// Material handling
    #[serde(rename = "materialHandling", alias = "material_handling")]
    pub material_handling: Decimal,
    /// Packaging
    pub packaging: Decimal,
    /// Shipping
    pub shipping: Decimal,
    /// Company overhead
    #[serde(rename = "companyOverHead", alias = "company_over_head")]
    pub company_over_head: Decimal,
    /// Indirect expenses
    #[serde(rename = "indirectExpense", alias = "indirect_expense")]
    pub indirect_expense: Decimal,
}

impl Overheads {
    /// The loadings a new finished good starts with when nothing is configured.
    /// They blend to 15%.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rejection: dec!(2),
            qc: dec!(0.75),
            machine_maintainance: dec!(1.75),
            material_handling: dec!(1.75),
            packaging: dec!(2),
            shipping: dec!(1),
            company_over_head: dec!(4),
            indirect_expense: dec!(1.75),
        }
    }

    /// Blended overhead percentage `p`: the plain sum of every loading.
    ///
    /// `None` if the sum is too large to represent.
    #[must_use]
    pub fn blended(&self) -> Option<Decimal> {
        [
            self.rejection,
            self.qc,
            self.machine_maintainance,
            self.material_handling,
            self.packaging,
            self.shipping,
            self.company_over_head,
            self.indirect_expense,
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}

/// Channel markups, in percent, added on top of the blended overhead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMarkups {
    /// Business-to-business markup
    #[serde(rename = "B2B", alias = "b2b")]
    pub b2b: Decimal,
    /// Direct-to-consumer markup
    #[serde(rename = "D2C", alias = "d2c")]
    pub d2c: Decimal,
}

/// The three derived per-unit prices. Never edited directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitRates {
    /// Standard unit price
    #[serde(rename = "unitRate")]
    pub unit_rate: Decimal,
    /// B2B unit price
    #[serde(rename = "unitB2BRate")]
    pub unit_b2b_rate: Decimal,
    /// D2C unit price
    #[serde(rename = "unitD2CRate")]
    pub unit_d2c_rate: Decimal,
}

/// Starting values for a newly created finished good.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineDefaults {
    /// Fixed per-unit costs
    #[serde(default)]
    pub fixed_costs: FixedCosts,
    /// Overhead loadings
    #[serde(default = "Overheads::standard")]
    pub overheads: Overheads,
    /// Channel markups
    #[serde(default)]
    pub markups: ChannelMarkups,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            fixed_costs: FixedCosts::default(),
            overheads: Overheads::standard(),
            markups: ChannelMarkups::default(),
        }
    }
}

/// A finished good being priced: its BOM plus every cost input and the derived prices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BomLineItem {
    /// Finished good name
    pub name: String,
    /// Components consumed to build one unit, in entry order
    pub materials: Vec<MaterialConsumption>,
    /// Flat per-unit costs
    pub fixed_costs: FixedCosts,
    /// Overhead loadings
    pub overheads: Overheads,
    /// Channel markups
    pub markups: ChannelMarkups,
    /// Derived prices, overwritten by every recomputation
    pub rates: UnitRates,
}

impl BomLineItem {
    /// An empty line item with one blank material row, the way the add form opens.
    #[must_use]
    pub fn new(name: impl Into<String>, defaults: &LineDefaults) -> Self {
        recompute(Self {
            name: name.into(),
            materials: vec![MaterialConsumption::default()],
            fixed_costs: defaults.fixed_costs.clone(),
            overheads: defaults.overheads.clone(),
            markups: defaults.markups.clone(),
            rates: UnitRates::default(),
        })
    }
}

/// Intermediate figures of one rollup, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostBreakdown {
    /// Sum of all material row rates
    pub material_cost: Decimal,
    /// Material cost plus fixed costs (`totalR`)
    pub total_raw_cost: Decimal,
    /// Blended overhead percentage (`p`)
    pub overhead_percent: Decimal,
    /// The rounded prices derived from the figures above
    pub rates: UnitRates,
}

impl CostBreakdown {
    /// Runs the rollup over `line` as it stands. Material rates are taken as given.
    ///
    /// A line whose figures are too large to represent is priced at zero, the same
    /// way an overflowing material row is.
    #[must_use]
    pub fn of(line: &BomLineItem) -> Self {
        Self::checked(line).unwrap_or_else(|| {
            tracing::debug!(name = %line.name, "line totals overflowed, treating line as unpriced");
            Self {
                material_cost: Decimal::ZERO,
                total_raw_cost: Decimal::ZERO,
                overhead_percent: Decimal::ZERO,
                rates: UnitRates {
                    unit_rate: round_to(Decimal::ZERO, UNIT_RATE_DP),
                    unit_b2b_rate: round_to(Decimal::ZERO, UNIT_RATE_DP),
                    unit_d2c_rate: round_to(Decimal::ZERO, UNIT_RATE_DP),
                },
            }
        })
    }

    fn checked(line: &BomLineItem) -> Option<Self> {
        let material_cost = line
            .materials
            .iter()
            .map(|m| m.rate)
            .try_fold(Decimal::ZERO, Decimal::checked_add)?;
        let fixed = &line.fixed_costs;
        let total_raw_cost = [fixed.stitching, fixed.printing, fixed.others]
            .into_iter()
            .try_fold(material_cost, Decimal::checked_add)?;
        let overhead_percent = line.overheads.blended()?;

        let price_at = |markup: Decimal| -> Option<Decimal> {
            let percent = overhead_percent.checked_add(markup)?;
            let loading = total_raw_cost
                .checked_mul(percent)?
                .checked_div(Decimal::ONE_HUNDRED)?;
            Some(round_to(total_raw_cost.checked_add(loading)?, UNIT_RATE_DP))
        };

        Some(Self {
            material_cost,
            total_raw_cost,
            overhead_percent,
            rates: UnitRates {
                unit_rate: price_at(Decimal::ZERO)?,
                unit_b2b_rate: price_at(line.markups.b2b)?,
                unit_d2c_rate: price_at(line.markups.d2c)?,
            },
        })
    }
}

/// Derives a row's `rate = height × width × qty × sq_inch_rate`, rounded to four places.
///
/// A row missing any factor (zero) is simply not priceable yet and gets rate 0.
/// A product too large to represent is treated the same way.
#[must_use]
pub fn recompute_material_rate(material: MaterialConsumption) -> MaterialConsumption {
    let factors = [
        material.height,
        material.width,
        material.qty,
        material.sq_inch_rate,
    ];

    let rate = if factors.iter().any(Decimal::is_zero) {
        Decimal::ZERO
    } else {
        factors
            .iter()
            .skip(1)
            .try_fold(factors[0], |acc, f| acc.checked_mul(*f))
            .map_or_else(
                || {
                    tracing::debug!("material rate overflowed, treating row as unpriced");
                    Decimal::ZERO
                },
                |product| round_to(product, MATERIAL_RATE_DP),
            )
    };

    MaterialConsumption { rate, ..material }
}

/// Rolls the current material rates and cost inputs up into the three unit prices.
///
/// Only `rates` changes on the returned line item.
#[must_use]
pub fn recompute_line_totals(line: BomLineItem) -> BomLineItem {
    let rates = CostBreakdown::of(&line).rates;
    BomLineItem { rates, ..line }
}

/// Refreshes every material rate, then the line totals.
#[must_use]
pub fn recompute(line: BomLineItem) -> BomLineItem {
    let materials = line
        .materials
        .into_iter()
        .map(recompute_material_rate)
        .collect();
    recompute_line_totals(BomLineItem { materials, ..line })
}
