//! Finished good Discord commands - building BOMs and reading back their prices.
//!
//! Every editing command follows the same cycle: load the stored finished good into
//! its editing state (repriced at current catalog rates), apply one edit, flatten it
//! back into a submission and save. The reply always shows the fresh breakdown.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            catalog,
            costing::BomLineItem,
            finished_good,
            input::{self, LineField, MaterialField},
            report,
            submission::build_submission,
        },
        entities::{amount_from_text, finished_good::Model as FinishedGoodModel},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;
    use tracing::debug;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    /// Looks up a finished good by name and loads its editing state, telling the user
    /// when it does not exist.
    async fn load(ctx: Context<'_>, name: &str) -> Result<Option<(FinishedGoodModel, BomLineItem)>> {
        let db = &ctx.data().database;
        let Some(model) = finished_good::get_finished_good_by_name(db, name).await? else {
            ctx.say(&format!("❌ Finished good '{name}' not found.")).await?;
            return Ok(None);
        };
        let line = finished_good::load_line_item(db, model.id).await?;
        Ok(Some((model, line)))
    }

    /// Saves the edited line item and replies with its breakdown.
    async fn save_and_show(ctx: Context<'_>, id: i64, line: BomLineItem, note: &str) -> Result<()> {
        let db = &ctx.data().database;
        let submission = build_submission(line.clone());
        debug!(id, rm = submission.rm.len(), sfg = submission.sfg.len(), "saving finished good");
        finished_good::update_finished_good(db, id, &submission).await?;
        show(ctx, &line, note).await
    }

    async fn show(ctx: Context<'_>, line: &BomLineItem, note: &str) -> Result<()> {
        let names = catalog::get_item_names(&ctx.data().database).await?;
        let embed = serenity::CreateEmbed::default()
            .description(report::format_cost_breakdown(line, &names))
            .color(0x0058_65F2);

        let reply = poise::CreateReply::default().embed(embed);
        let reply = if note.is_empty() { reply } else { reply.content(note) };
        ctx.send(reply).await?;
        Ok(())
    }

    /// Converts a 1-based row number from the user into an index.
    fn row_index(row: u32) -> Option<usize> {
        usize::try_from(row).ok()?.checked_sub(1)
    }

    /// Index of the first row with no item picked, appending one if every row is in use.
    fn blank_row(line: BomLineItem) -> (BomLineItem, usize) {
        if let Some(index) = line.materials.iter().position(|row| row.item.is_none()) {
            return (line, index);
        }
        let line = input::add_material_row(line);
        let index = line.materials.len() - 1;
        (line, index)
    }

    /// Parent command for finished goods and their bill of materials.
    #[poise::command(
        slash_command,
        subcommands(
            "fg_create",
            "fg_add_material",
            "fg_edit_material",
            "fg_remove_material",
            "fg_set",
            "fg_cost",
            "fg_list",
            "fg_delete",
            "fg_export"
        )
    )]
    pub async fn fg(ctx: Context<'_>) -> Result<()> {
        ctx.say("Finished good command. Use `/help` to see the available subcommands.")
            .await?;
        Ok(())
    }

    /// Starts a new finished good using the configured default overheads.
    #[poise::command(slash_command, rename = "create")]
    pub async fn fg_create(
        ctx: Context<'_>,
        #[description = "Unique name for the finished good"] name: String,
    ) -> Result<()> {
        let line = BomLineItem::new(name.trim(), &ctx.data().defaults);

        match finished_good::create_finished_good(&ctx.data().database, &build_submission(line.clone())).await {
            Ok(_) => {
                show(
                    ctx,
                    &line,
                    &format!("✅ Finished good '{}' created. Add rows with `/fg add_material`.", line.name),
                )
                .await?;
            }
            Err(Error::Validation { message }) => {
                ctx.say(&format!("⚠️ {message}.")).await?;
            }
            Err(e) => {
                ctx.say(&format!("❌ Failed to create '{name}'. Please try again later."))
                    .await?;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Adds a material row to a finished good's BOM.
    #[poise::command(slash_command, rename = "add_material")]
    pub async fn fg_add_material(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
        #[description = "Raw material or semi-finished good"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        item: String,
        #[description = "Piece height in inches"] height: String,
        #[description = "Piece width in inches"] width: String,
        #[description = "Pieces per unit"] qty: String,
    ) -> Result<()> {
        let Some(catalog_item) = catalog::find_item_by_name(&ctx.data().database, &item).await? else {
            ctx.say(&format!("❌ Catalog item '{item}' not found.")).await?;
            return Ok(());
        };
        let Some((model, line)) = load(ctx, &fg).await? else {
            return Ok(());
        };

        let (line, index) = blank_row(line);
        let line = input::select_item(line, index, &catalog_item)?;
        let line = input::apply_material_edit(line, index, MaterialField::Height, &height)?;
        let line = input::apply_material_edit(line, index, MaterialField::Width, &width)?;
        let line = input::apply_material_edit(line, index, MaterialField::Qty, &qty)?;

        let names = HashMap::from([(catalog_item.item, catalog_item.name.clone())]);
        let note = format!(
            "✅ Row {} added: {}",
            index + 1,
            report::format_material_row(&line.materials[index], &names)
        );
        save_and_show(ctx, model.id, line, &note).await
    }

    /// Changes the height, width or quantity of one BOM row.
    #[poise::command(slash_command, rename = "edit_material")]
    pub async fn fg_edit_material(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
        #[description = "Row number as shown by /fg cost"] row: u32,
        #[description = "height, width or qty"]
        #[autocomplete = "autocomplete::autocomplete_material_field"]
        field: String,
        #[description = "New value (blank or non-numeric counts as zero)"] value: String,
    ) -> Result<()> {
        let Ok(field) = field.parse::<MaterialField>() else {
            ctx.say(&format!("❌ Unknown row field '{field}'. Use height, width or qty."))
                .await?;
            return Ok(());
        };
        let Some((model, line)) = load(ctx, &fg).await? else {
            return Ok(());
        };

        match row_index(row).map(|index| input::apply_material_edit(line, index, field, &value)) {
            Some(Ok(line)) => save_and_show(ctx, model.id, line, &format!("✅ Row {row} updated.")).await,
            Some(Err(Error::MaterialRowNotFound { .. })) | None => {
                ctx.say(&format!("❌ '{fg}' has no row {row}.")).await?;
                Ok(())
            }
            Some(Err(e)) => Err(e),
        }
    }

    /// Removes one BOM row.
    #[poise::command(slash_command, rename = "remove_material")]
    pub async fn fg_remove_material(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
        #[description = "Row number as shown by /fg cost"] row: u32,
    ) -> Result<()> {
        let Some((model, line)) = load(ctx, &fg).await? else {
            return Ok(());
        };

        match row_index(row).map(|index| input::remove_material_row(line, index)) {
            Some(Ok(line)) => save_and_show(ctx, model.id, line, &format!("✅ Row {row} removed.")).await,
            Some(Err(Error::MaterialRowNotFound { .. })) | None => {
                ctx.say(&format!("❌ '{fg}' has no row {row}.")).await?;
                Ok(())
            }
            Some(Err(e)) => Err(e),
        }
    }

    /// Sets a fixed cost, an overhead percentage, or a B2B/D2C markup.
    #[poise::command(slash_command, rename = "set")]
    pub async fn fg_set(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
        #[description = "Field to set (e.g., stitching, QC, B2B)"]
        #[autocomplete = "autocomplete::autocomplete_line_field"]
        field: String,
        #[description = "New value (blank or non-numeric counts as zero)"] value: String,
    ) -> Result<()> {
        let Ok(field) = field.parse::<LineField>() else {
            ctx.say(&format!("❌ Unknown field '{field}'.")).await?;
            return Ok(());
        };
        let Some((model, line)) = load(ctx, &fg).await? else {
            return Ok(());
        };

        let line = input::apply_line_edit(line, field, &value);
        let shown = if field.is_percent() {
            report::format_percent(line.field(field))
        } else {
            report::format_currency(line.field(field))
        };
        save_and_show(ctx, model.id, line, &format!("✅ {field} set to {shown}.")).await
    }

    /// Shows the full cost breakdown of a finished good at current catalog rates.
    #[poise::command(slash_command, rename = "cost")]
    pub async fn fg_cost(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
    ) -> Result<()> {
        let Some((model, line)) = load(ctx, &fg).await? else {
            return Ok(());
        };

        let stored = amount_from_text(&model.unit_rate)?;
        let note = if line.rates.unit_rate == stored {
            String::new()
        } else {
            format!(
                "ℹ️ Catalog rates changed since the last save (stored unit rate {}).",
                report::format_currency(stored)
            )
        };
        show(ctx, &line, &note).await
    }

    /// Lists all finished goods with their stored unit prices.
    #[poise::command(slash_command, rename = "list")]
    pub async fn fg_list(ctx: Context<'_>) -> Result<()> {
        let goods = finished_good::get_all_active_finished_goods(&ctx.data().database).await?;

        if goods.is_empty() {
            ctx.say("No finished goods yet. Use `/fg create` to start one!")
                .await?;
            return Ok(());
        }

        let embed_fields: Vec<(String, String, bool)> = goods
            .iter()
            .take(25)
            .map(|fg| {
                (
                    fg.name.clone(),
                    // Stored prices are already two-place decimal text
                    format!(
                        "Unit {} | B2B {} | D2C {}",
                        fg.unit_rate, fg.unit_b2b_rate, fg.unit_d2c_rate
                    ),
                    false,
                )
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("**Finished Goods**")
            .color(0x0058_65F2)
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Deletes a finished good.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn fg_delete(
        ctx: Context<'_>,
        #[description = "Finished good to delete"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(model) = finished_good::get_finished_good_by_name(db, &fg).await? else {
            ctx.say(&format!("❌ Finished good '{fg}' not found.")).await?;
            return Ok(());
        };

        match finished_good::delete_finished_good(db, model.id).await {
            Ok(_) => {
                ctx.say(&format!("✅ Finished good '{fg}' has been deleted."))
                    .await?;
            }
            Err(e) => {
                ctx.say(&format!("❌ Failed to delete '{fg}'.")).await?;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Exports the stored submission body of a finished good as JSON.
    #[poise::command(slash_command, rename = "export")]
    pub async fn fg_export(
        ctx: Context<'_>,
        #[description = "Finished good"]
        #[autocomplete = "autocomplete::autocomplete_finished_good_name"]
        fg: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(model) = finished_good::get_finished_good_by_name(db, &fg).await? else {
            ctx.say(&format!("❌ Finished good '{fg}' not found.")).await?;
            return Ok(());
        };

        let json = finished_good::load_submission(db, model.id).await?.to_json()?;
        let attachment = serenity::CreateAttachment::bytes(json.into_bytes(), format!("{}.json", model.name));
        ctx.send(
            poise::CreateReply::default()
                .content(format!("📎 Submission body for '{}'", model.name))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
