//! Catalog Discord commands - managing raw materials and semi-finished goods.
//!
//! Each catalog item carries a rate per square inch that BOM rows multiply by
//! their cut area and quantity.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{catalog, costing::ItemKind},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;

    /// Catalog kind as offered in the Discord option picker.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum KindChoice {
        #[name = "Raw material"]
        RawMaterial,
        #[name = "Semi-finished good"]
        SemiFinishedGood,
    }

    impl From<KindChoice> for ItemKind {
        fn from(choice: KindChoice) -> Self {
            match choice {
                KindChoice::RawMaterial => Self::RawMaterial,
                KindChoice::SemiFinishedGood => Self::SemiFinishedGood,
            }
        }
    }

    /// Converts a Discord number option into a rate, rejecting NaN, infinity and negatives.
    fn to_rate(rate: f64) -> Option<Decimal> {
        Decimal::try_from(rate)
            .ok()
            .filter(|value| *value >= Decimal::ZERO)
    }

    /// Parent command for the raw material and semi-finished good catalog.
    #[poise::command(
        slash_command,
        subcommands("catalog_add", "catalog_list", "catalog_update", "catalog_delete")
    )]
    pub async fn catalog(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Catalog command. Available subcommands:\n\
            `/catalog add` - Add a raw material or semi-finished good\n\
            `/catalog list` - List catalog items\n\
            `/catalog update` - Change an item's rate per square inch\n\
            `/catalog delete` - Delete an item";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a raw material or semi-finished good to the catalog.
    #[poise::command(slash_command, rename = "add")]
    pub async fn catalog_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Raw material or semi-finished good"] kind: KindChoice,
        #[description = "Unique name for the item (e.g., 'Canvas 12oz')"] name: String,
        #[description = "Cost per square inch (e.g., 0.045)"] rate: f64,
    ) -> Result<()> {
        let Some(sq_inch_rate) = to_rate(rate) else {
            ctx.say("❌ Rate must be a non-negative number.").await?;
            return Ok(());
        };

        let kind = ItemKind::from(kind);
        let db = &ctx.data().database;
        match catalog::create_item(db, kind, name.clone(), sq_inch_rate).await {
            Ok(item) => {
                ctx.say(&format!(
                    "✅ {} '{}' added at **{}** per sq in.",
                    kind.label(),
                    item.name,
                    sq_inch_rate.normalize()
                ))
                .await?;
            }
            Err(Error::Validation { message }) => {
                ctx.say(&format!("⚠️ {message}.")).await?;
            }
            Err(e) => {
                ctx.say(&format!("❌ Failed to add '{name}'. Please try again later."))
                    .await?;
                return Err(e);
            }
        }

        Ok(())
    }

    /// Lists catalog items of one kind with their rates.
    #[poise::command(slash_command, rename = "list")]
    pub async fn catalog_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Raw material or semi-finished good"] kind: KindChoice,
    ) -> Result<()> {
        let kind = ItemKind::from(kind);
        let items = catalog::get_all_active_items(&ctx.data().database, kind).await?;

        if items.is_empty() {
            ctx.say(&format!(
                "No {} items yet. Use `/catalog add` to create some!",
                kind.label().to_lowercase()
            ))
            .await?;
            return Ok(());
        }

        // Discord embeds hold at most 25 fields
        let embed_fields: Vec<(String, String, bool)> = items
            .iter()
            .take(25)
            .map(|item| {
                (
                    item.name.clone(),
                    format!("{} per sq in", item.sq_inch_rate),
                    true,
                )
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title(format!("**{} Catalog**", kind.label()))
            .color(0x0058_65F2)
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Changes the rate per square inch of a catalog item.
    ///
    /// Finished goods pick the new rate up the next time they are edited.
    #[poise::command(slash_command, rename = "update")]
    pub async fn catalog_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to update"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
        #[description = "New cost per square inch"] rate: f64,
    ) -> Result<()> {
        let Some(sq_inch_rate) = to_rate(rate) else {
            ctx.say("❌ Rate must be a non-negative number.").await?;
            return Ok(());
        };

        let db = &ctx.data().database;
        let Some(item) = catalog::find_item_by_name(db, &name).await? else {
            ctx.say(&format!("❌ Catalog item '{name}' not found.")).await?;
            return Ok(());
        };

        match catalog::update_item_rate(db, item.item, sq_inch_rate).await {
            Ok(updated) => {
                ctx.say(&format!(
                    "✅ '{}' now costs **{}** per sq in (was {}).",
                    updated.name,
                    sq_inch_rate.normalize(),
                    item.sq_inch_rate.normalize()
                ))
                .await?;
            }
            Err(e) => {
                ctx.say(&format!("❌ Failed to update '{name}'.")).await?;
                return Err(e);
            }
        }

        Ok(())
    }

    /// Removes an item from the catalog. Existing BOM rows that use it price at zero.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn catalog_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to delete"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(item) = catalog::find_item_by_name(db, &name).await? else {
            ctx.say(&format!("❌ Catalog item '{name}' not found.")).await?;
            return Ok(());
        };

        match catalog::delete_item(db, item.item).await {
            Ok(_) => {
                ctx.say(&format!("✅ '{name}' has been deleted.")).await?;
            }
            Err(e) => {
                ctx.say(&format!("❌ Failed to delete '{name}'.")).await?;
                return Err(e);
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
