//! Finished good business logic - persisting priced BOMs.
//!
//! A finished good is stored as the flattened [`FgSubmission`]: one header row with
//! every cost input and the derived unit prices, plus one component row per consumed
//! material. Header and components are always written together in one database
//! transaction so a half-saved BOM is never visible.

use crate::{
    core::{
        catalog,
        costing::{
            BomLineItem, ChannelMarkups, FixedCosts, ItemKind, Overheads, UnitRates,
        },
        submission::{ComponentLine, FgSubmission},
    },
    entities::{
        FgComponent, FinishedGood, amount_from_text, amount_to_text, fg_component, finished_good,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Retrieves all active finished goods, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_finished_goods(
    db: &DatabaseConnection,
) -> Result<Vec<finished_good::Model>> {
    FinishedGood::find()
        .filter(finished_good::Column::IsDeleted.eq(false))
        .order_by_asc(finished_good::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active finished good by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_finished_good_by_name<C>(db: &C, name: &str) -> Result<Option<finished_good::Model>>
where
    C: ConnectionTrait,
{
    FinishedGood::find()
        .filter(finished_good::Column::Name.eq(name.trim()))
        .filter(finished_good::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Component rows of a finished good, raw materials first, each kind in entry order.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_components(
    db: &DatabaseConnection,
    finished_good_id: i64,
) -> Result<Vec<fg_component::Model>> {
    FgComponent::find()
        .filter(fg_component::Column::FinishedGoodId.eq(finished_good_id))
        .order_by_asc(fg_component::Column::ItemKind)
        .order_by_asc(fg_component::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_active(db: &DatabaseConnection, id: i64) -> Result<finished_good::Model> {
    FinishedGood::find_by_id(id)
        .one(db)
        .await?
        .filter(|fg| !fg.is_deleted)
        .ok_or_else(|| Error::FinishedGoodNotFound {
            name: id.to_string(),
        })
}

fn header_fields(
    mut header: finished_good::ActiveModel,
    submission: &FgSubmission,
) -> finished_good::ActiveModel {
    let FixedCosts {
        stitching,
        printing,
        others,
    } = submission.fixed_costs;
    let Overheads {
        rejection,
        qc,
        machine_maintainance,
        material_handling,
        packaging,
        shipping,
        company_over_head,
        indirect_expense,
    } = submission.overheads;
    let ChannelMarkups { b2b, d2c } = submission.markups;
    let UnitRates {
        unit_rate,
        unit_b2b_rate,
        unit_d2c_rate,
    } = submission.rates;

    header.name = Set(submission.name.trim().to_string());
    header.stitching = Set(amount_to_text(stitching));
    header.printing = Set(amount_to_text(printing));
    header.others = Set(amount_to_text(others));
    header.rejection = Set(amount_to_text(rejection));
    header.qc = Set(amount_to_text(qc));
    header.machine_maintainance = Set(amount_to_text(machine_maintainance));
    header.material_handling = Set(amount_to_text(material_handling));
    header.packaging = Set(amount_to_text(packaging));
    header.shipping = Set(amount_to_text(shipping));
    header.company_over_head = Set(amount_to_text(company_over_head));
    header.indirect_expense = Set(amount_to_text(indirect_expense));
    header.b2b = Set(amount_to_text(b2b));
    header.d2c = Set(amount_to_text(d2c));
    header.unit_rate = Set(amount_to_text(unit_rate));
    header.unit_b2b_rate = Set(amount_to_text(unit_b2b_rate));
    header.unit_d2c_rate = Set(amount_to_text(unit_d2c_rate));
    header.updated_at = Set(chrono::Utc::now().naive_utc());
    header
}

async fn insert_components(
    txn: &DatabaseTransaction,
    finished_good_id: i64,
    submission: &FgSubmission,
) -> Result<()> {
    let groups = [
        (ItemKind::RawMaterial, &submission.rm),
        (ItemKind::SemiFinishedGood, &submission.sfg),
    ];

    for (kind, lines) in groups {
        for (position, line) in (0_i32..).zip(lines.iter()) {
            fg_component::ActiveModel {
                finished_good_id: Set(finished_good_id),
                item_kind: Set(kind.as_str().to_string()),
                item_id: Set(line.item_id),
                position: Set(position),
                height: Set(amount_to_text(line.height)),
                width: Set(amount_to_text(line.width)),
                qty: Set(amount_to_text(line.qty)),
                rate: Set(amount_to_text(line.rate)),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }
    Ok(())
}

async fn ensure_name_free(
    txn: &DatabaseTransaction,
    name: &str,
    current_id: Option<i64>,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Finished good name cannot be empty".to_string(),
        });
    }
    match get_finished_good_by_name(txn, name).await? {
        Some(existing) if Some(existing.id) != current_id => Err(Error::Validation {
            message: format!("A finished good named '{}' already exists", name.trim()),
        }),
        _ => Ok(()),
    }
}

/// Saves a new finished good with its components.
///
/// # Errors
/// Returns an error if the name is blank or already used by an active finished
/// good, or any database write fails (nothing is saved in that case).
#[instrument(skip(db, submission), fields(name = %submission.name))]
pub async fn create_finished_good(
    db: &DatabaseConnection,
    submission: &FgSubmission,
) -> Result<finished_good::Model> {
    let txn = db.begin().await?;
    ensure_name_free(&txn, &submission.name, None).await?;

    let now = chrono::Utc::now().naive_utc();
    let header = header_fields(
        finished_good::ActiveModel {
            is_deleted: Set(false),
            created_at: Set(now),
            ..Default::default()
        },
        submission,
    );
    let created = header.insert(&txn).await?;
    insert_components(&txn, created.id, submission).await?;
    txn.commit().await?;

    info!(
        id = created.id,
        rm = submission.rm.len(),
        sfg = submission.sfg.len(),
        unit_rate = %created.unit_rate,
        "finished good created"
    );
    Ok(created)
}

/// Overwrites a finished good's header and replaces all of its components.
///
/// # Errors
/// Returns an error if the finished good does not exist or is deleted, the new
/// name clashes with another active finished good, or a database write fails.
#[instrument(skip(db, submission), fields(name = %submission.name))]
pub async fn update_finished_good(
    db: &DatabaseConnection,
    id: i64,
    submission: &FgSubmission,
) -> Result<finished_good::Model> {
    let existing = find_active(db, id).await?;

    let txn = db.begin().await?;
    ensure_name_free(&txn, &submission.name, Some(id)).await?;

    let updated = header_fields(existing.into(), submission)
        .update(&txn)
        .await?;
    FgComponent::delete_many()
        .filter(fg_component::Column::FinishedGoodId.eq(id))
        .exec(&txn)
        .await?;
    insert_components(&txn, id, submission).await?;
    txn.commit().await?;

    info!(id, unit_rate = %updated.unit_rate, "finished good updated");
    Ok(updated)
}

/// Soft deletes a finished good. Its components stay for history.
///
/// # Errors
/// Returns an error if the finished good does not exist or is already deleted, or
/// the database update fails.
#[instrument(skip(db))]
pub async fn delete_finished_good(
    db: &DatabaseConnection,
    id: i64,
) -> Result<finished_good::Model> {
    let mut active: finished_good::ActiveModel = find_active(db, id).await?.into();
    active.is_deleted = Set(true);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

fn component_line(model: &fg_component::Model) -> Result<ComponentLine> {
    Ok(ComponentLine {
        item_id: model.item_id,
        height: amount_from_text(&model.height)?,
        width: amount_from_text(&model.width)?,
        qty: amount_from_text(&model.qty)?,
        rate: amount_from_text(&model.rate)?,
    })
}

/// Loads a finished good back into its stored submission shape.
///
/// # Errors
/// Returns an error if the finished good does not exist or is deleted, a stored
/// item kind or amount is unknown, or the database query fails.
pub async fn load_submission(db: &DatabaseConnection, id: i64) -> Result<FgSubmission> {
    let header = find_active(db, id).await?;
    let components = get_components(db, id).await?;

    let mut rm = Vec::new();
    let mut sfg = Vec::new();
    for component in &components {
        match component.item_kind.parse::<ItemKind>()? {
            ItemKind::RawMaterial => rm.push(component_line(component)?),
            ItemKind::SemiFinishedGood => sfg.push(component_line(component)?),
        }
    }

    Ok(FgSubmission {
        name: header.name,
        fixed_costs: FixedCosts {
            stitching: amount_from_text(&header.stitching)?,
            printing: amount_from_text(&header.printing)?,
            others: amount_from_text(&header.others)?,
        },
        overheads: Overheads {
            rejection: amount_from_text(&header.rejection)?,
            qc: amount_from_text(&header.qc)?,
            machine_maintainance: amount_from_text(&header.machine_maintainance)?,
            material_handling: amount_from_text(&header.material_handling)?,
            packaging: amount_from_text(&header.packaging)?,
            shipping: amount_from_text(&header.shipping)?,
            company_over_head: amount_from_text(&header.company_over_head)?,
            indirect_expense: amount_from_text(&header.indirect_expense)?,
        },
        markups: ChannelMarkups {
            b2b: amount_from_text(&header.b2b)?,
            d2c: amount_from_text(&header.d2c)?,
        },
        rates: UnitRates {
            unit_rate: amount_from_text(&header.unit_rate)?,
            unit_b2b_rate: amount_from_text(&header.unit_b2b_rate)?,
            unit_d2c_rate: amount_from_text(&header.unit_d2c_rate)?,
        },
        rm,
        sfg,
    })
}

/// Rebuilds the editing state of a finished good, repriced at current catalog rates.
///
/// Components whose catalog item was deleted price at zero until replaced.
///
/// # Errors
/// Returns an error if the finished good cannot be loaded.
pub async fn load_line_item(db: &DatabaseConnection, id: i64) -> Result<BomLineItem> {
    let submission = load_submission(db, id).await?;
    let rates = catalog::get_active_rates(db).await?;
    Ok(submission.into_line_item(&rates))
}
