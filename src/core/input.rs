//! Edit boundary for the BOM form.
//!
//! Raw field values arrive as strings. They become numbers in exactly one place,
//! [`parse_non_negative_decimal`], and every edit helper here recomputes the line
//! item before handing it back so derived rates are never stale.

use crate::{
    core::{
        catalog::CatalogItem,
        costing::{BomLineItem, MaterialConsumption, recompute},
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Turns raw field input into a non-negative decimal.
///
/// Empty, non-numeric, non-finite and negative input all normalize to zero so an
/// incomplete form is priced at zero rather than rejected.
#[must_use]
pub fn parse_non_negative_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(trimmed).ok().or_else(|| {
        // Exponent forms like "1e3" only parse as floats.
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(|f| Decimal::try_from(f).ok())
    });

    match parsed {
        Some(value) if value.is_sign_positive() => value.normalize(),
        _ => Decimal::ZERO,
    }
}

/// Editable line-level numeric fields. The derived unit rates are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    /// Fixed stitching cost
    Stitching,
    /// Fixed printing cost
    Printing,
    /// Other fixed costs
    Others,
    /// Rejection percent
    Rejection,
    /// QC percent
    Qc,
    /// Machine maintenance percent
    MachineMaintainance,
    /// Material handling percent
    MaterialHandling,
    /// Packaging percent
    Packaging,
    /// Shipping percent
    Shipping,
    /// Company overhead percent
    CompanyOverHead,
    /// Indirect expense percent
    IndirectExpense,
    /// B2B markup percent
    B2b,
    /// D2C markup percent
    D2c,
}

impl LineField {
    /// Every editable field, in form order.
    pub const ALL: [Self; 13] = [
        Self::Stitching,
        Self::Printing,
        Self::Others,
        Self::Rejection,
        Self::Qc,
        Self::MachineMaintainance,
        Self::MaterialHandling,
        Self::Packaging,
        Self::Shipping,
        Self::CompanyOverHead,
        Self::IndirectExpense,
        Self::B2b,
        Self::D2c,
    ];

    /// Name the field carries in the submission body.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Stitching => "stitching",
            Self::Printing => "printing",
            Self::Others => "others",
            Self::Rejection => "rejection",
            Self::Qc => "QC",
            Self::MachineMaintainance => "machineMaintainance",
            Self::MaterialHandling => "materialHandling",
            Self::Packaging => "packaging",
            Self::Shipping => "shipping",
            Self::CompanyOverHead => "companyOverHead",
            Self::IndirectExpense => "indirectExpense",
            Self::B2b => "B2B",
            Self::D2c => "D2C",
        }
    }

    /// Whether the field is a percentage rather than a currency amount.
    #[must_use]
    pub const fn is_percent(self) -> bool {
        !matches!(self, Self::Stitching | Self::Printing | Self::Others)
    }
}

/// Case-folds a field name and drops separators so `machine_maintainance`,
/// `machineMaintainance` and `Machine Maintainance` all compare equal.
fn fold_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for LineField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let folded = fold_name(s);
        Self::ALL
            .into_iter()
            .find(|field| fold_name(field.wire_name()) == folded)
            .ok_or_else(|| Error::UnknownField {
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for LineField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Editable fields of a material row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    /// Piece height
    Height,
    /// Piece width
    Width,
    /// Piece count
    Qty,
}

impl FromStr for MaterialField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match fold_name(s).as_str() {
            "height" | "h" => Ok(Self::Height),
            "width" | "w" => Ok(Self::Width),
            "qty" | "quantity" => Ok(Self::Qty),
            _ => Err(Error::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

impl BomLineItem {
    /// Current value of an editable field.
    #[must_use]
    pub const fn field(&self, field: LineField) -> Decimal {
        match field {
            LineField::Stitching => self.fixed_costs.stitching,
            LineField::Printing => self.fixed_costs.printing,
            LineField::Others => self.fixed_costs.others,
            LineField::Rejection => self.overheads.rejection,
            LineField::Qc => self.overheads.qc,
            LineField::MachineMaintainance => self.overheads.machine_maintainance,
            LineField::MaterialHandling => self.overheads.material_handling,
            LineField::Packaging => self.overheads.packaging,
            LineField::Shipping => self.overheads.shipping,
            LineField::CompanyOverHead => self.overheads.company_over_head,
            LineField::IndirectExpense => self.overheads.indirect_expense,
            LineField::B2b => self.markups.b2b,
            LineField::D2c => self.markups.d2c,
        }
    }

    fn field_mut(&mut self, field: LineField) -> &mut Decimal {
        match field {
            LineField::Stitching => &mut self.fixed_costs.stitching,
            LineField::Printing => &mut self.fixed_costs.printing,
            LineField::Others => &mut self.fixed_costs.others,
            LineField::Rejection => &mut self.overheads.rejection,
            LineField::Qc => &mut self.overheads.qc,
            LineField::MachineMaintainance => &mut self.overheads.machine_maintainance,
            LineField::MaterialHandling => &mut self.overheads.material_handling,
            LineField::Packaging => &mut self.overheads.packaging,
            LineField::Shipping => &mut self.overheads.shipping,
            LineField::CompanyOverHead => &mut self.overheads.company_over_head,
            LineField::IndirectExpense => &mut self.overheads.indirect_expense,
            LineField::B2b => &mut self.markups.b2b,
            LineField::D2c => &mut self.markups.d2c,
        }
    }
}

/// Sets one line-level field from raw input and recomputes.
#[must_use]
pub fn apply_line_edit(mut line: BomLineItem, field: LineField, raw: &str) -> BomLineItem {
    *line.field_mut(field) = parse_non_negative_decimal(raw);
    recompute(line)
}

fn row_mut(line: &mut BomLineItem, index: usize) -> Result<&mut MaterialConsumption> {
    line.materials
        .get_mut(index)
        .ok_or(Error::MaterialRowNotFound { index })
}

/// Sets one dimension of a material row from raw input and recomputes.
///
/// # Errors
/// Returns [`Error::MaterialRowNotFound`] if `index` is past the last row.
pub fn apply_material_edit(
    mut line: BomLineItem,
    index: usize,
    field: MaterialField,
    raw: &str,
) -> Result<BomLineItem> {
    let value = parse_non_negative_decimal(raw);
    let row = row_mut(&mut line, index)?;
    match field {
        MaterialField::Height => row.height = value,
        MaterialField::Width => row.width = value,
        MaterialField::Qty => row.qty = value,
    }
    Ok(recompute(line))
}

/// Points a material row at a catalog item, taking over the item's square-inch rate.
///
/// # Errors
/// Returns [`Error::MaterialRowNotFound`] if `index` is past the last row.
pub fn select_item(mut line: BomLineItem, index: usize, item: &CatalogItem) -> Result<BomLineItem> {
    let row = row_mut(&mut line, index)?;
    row.item = Some(item.item);
    row.sq_inch_rate = item.sq_inch_rate;
    Ok(recompute(line))
}

/// Appends a blank material row.
#[must_use]
pub fn add_material_row(mut line: BomLineItem) -> BomLineItem {
    line.materials.push(MaterialConsumption::default());
    line
}

/// Removes a material row and recomputes.
///
/// # Errors
/// Returns [`Error::MaterialRowNotFound`] if `index` is past the last row.
pub fn remove_material_row(mut line: BomLineItem, index: usize) -> Result<BomLineItem> {
    if index >= line.materials.len() {
        return Err(Error::MaterialRowNotFound { index });
    }
    line.materials.remove(index);
    Ok(recompute(line))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::costing::{ItemKind, ItemRef, LineDefaults};
    use rust_decimal_macros::dec;

    fn felt() -> CatalogItem {
        CatalogItem {
            item: ItemRef {
                kind: ItemKind::RawMaterial,
                id: 7,
            },
            name: "Felt".to_string(),
            sq_inch_rate: dec!(1.5),
        }
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_non_negative_decimal("12"), dec!(12));
        assert_eq!(parse_non_negative_decimal(" 0.75 "), dec!(0.75));
        assert_eq!(parse_non_negative_decimal("1e2"), dec!(100));
    }

    #[test]
    fn test_parse_garbage_normalizes_to_zero() {
        assert_eq!(parse_non_negative_decimal(""), Decimal::ZERO);
        assert_eq!(parse_non_negative_decimal("   "), Decimal::ZERO);
        assert_eq!(parse_non_negative_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_non_negative_decimal("NaN"), Decimal::ZERO);
        assert_eq!(parse_non_negative_decimal("inf"), Decimal::ZERO);
        assert_eq!(parse_non_negative_decimal("-3"), Decimal::ZERO);
    }

    #[test]
    fn test_line_field_accepts_wire_and_snake_names() {
        assert_eq!("QC".parse::<LineField>().unwrap(), LineField::Qc);
        assert_eq!(
            "machine_maintainance".parse::<LineField>().unwrap(),
            LineField::MachineMaintainance
        );
        assert_eq!(
            "companyOverHead".parse::<LineField>().unwrap(),
            LineField::CompanyOverHead
        );
        assert_eq!("b2b".parse::<LineField>().unwrap(), LineField::B2b);
        assert!(matches!(
            "unitRate".parse::<LineField>(),
            Err(Error::UnknownField { name: _ })
        ));
    }

    #[test]
    fn test_line_field_round_trips_through_wire_name() {
        for field in LineField::ALL {
            assert_eq!(field.wire_name().parse::<LineField>().unwrap(), field);
        }
    }

    #[test]
    fn test_apply_line_edit_recomputes() {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        let line = apply_line_edit(line, LineField::Others, "100");
        // Default loadings blend to 15%.
        assert_eq!(line.rates.unit_rate, dec!(115.00));

        let line = apply_line_edit(line, LineField::B2b, "10");
        assert_eq!(line.rates.unit_b2b_rate, dec!(125.00));

        // Garbage clears the field instead of failing.
        let line = apply_line_edit(line, LineField::Others, "ten");
        assert_eq!(line.field(LineField::Others), Decimal::ZERO);
        assert_eq!(line.rates.unit_rate, dec!(0.00));
    }

    #[test]
    fn test_largest_accepted_amount_prices_at_zero() {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        let line = apply_line_edit(line, LineField::Stitching, "79228162514264337593543950335");

        assert_eq!(line.field(LineField::Stitching), Decimal::MAX);
        assert_eq!(line.rates.unit_rate, Decimal::ZERO);
        assert_eq!(line.rates.unit_d2c_rate, Decimal::ZERO);
    }

    #[test]
    fn test_material_edits_drive_row_rate() -> Result<()> {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        let line = select_item(line, 0, &felt())?;
        let line = apply_material_edit(line, 0, MaterialField::Height, "2")?;
        let line = apply_material_edit(line, 0, MaterialField::Width, "3")?;
        assert_eq!(line.materials[0].rate, Decimal::ZERO);

        let line = apply_material_edit(line, 0, MaterialField::Qty, "4")?;
        assert_eq!(line.materials[0].rate, dec!(36.0000));

        let line = apply_material_edit(line, 0, MaterialField::Qty, "")?;
        assert_eq!(line.materials[0].rate, Decimal::ZERO);
        Ok(())
    }

    #[test]
    fn test_select_item_takes_catalog_rate() -> Result<()> {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        let line = select_item(line, 0, &felt())?;
        assert_eq!(line.materials[0].item, Some(felt().item));
        assert_eq!(line.materials[0].sq_inch_rate, dec!(1.5));
        Ok(())
    }

    #[test]
    fn test_out_of_range_row() {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        assert!(matches!(
            apply_material_edit(line.clone(), 3, MaterialField::Qty, "1"),
            Err(Error::MaterialRowNotFound { index: 3 })
        ));
        assert!(matches!(
            select_item(line.clone(), 1, &felt()),
            Err(Error::MaterialRowNotFound { index: 1 })
        ));
        assert!(matches!(
            remove_material_row(line, 1),
            Err(Error::MaterialRowNotFound { index: 1 })
        ));
    }

    #[test]
    fn test_add_and_remove_rows() -> Result<()> {
        let line = BomLineItem::new("Pouch", &LineDefaults::default());
        let line = add_material_row(line);
        assert_eq!(line.materials.len(), 2);

        let line = select_item(line, 1, &felt())?;
        let line = apply_material_edit(line, 1, MaterialField::Height, "1")?;
        let line = apply_material_edit(line, 1, MaterialField::Width, "1")?;
        let line = apply_material_edit(line, 1, MaterialField::Qty, "2")?;
        assert_eq!(line.rates.unit_rate, dec!(3.45));

        let line = remove_material_row(line, 1)?;
        assert_eq!(line.materials.len(), 1);
        assert_eq!(line.rates.unit_rate, dec!(0.00));
        Ok(())
    }

    #[test]
    fn test_material_field_names() {
        assert_eq!("Qty".parse::<MaterialField>().unwrap(), MaterialField::Qty);
        assert_eq!("quantity".parse::<MaterialField>().unwrap(), MaterialField::Qty);
        assert_eq!("height".parse::<MaterialField>().unwrap(), MaterialField::Height);
        assert!("depth".parse::<MaterialField>().is_err());
    }
}
