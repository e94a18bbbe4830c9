//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! catalog item names, finished good names and BOM field names, suggesting valid
//! options as the user types.

use crate::{
    bot::BotData,
    core::{catalog, costing::ItemKind, finished_good, input::LineField},
    errors::Error,
};

/// Discord shows at most this many suggestions.
const AUTOCOMPLETE_LIMIT: usize = 25;

fn matching(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();

    // Sort alphabetically for consistent UX
    matches.sort();
    matches.dedup();
    matches.truncate(AUTOCOMPLETE_LIMIT);
    matches
}

/// Provides autocomplete suggestions for catalog item names of either kind.
pub async fn autocomplete_item_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let mut names = Vec::new();
    for kind in [ItemKind::RawMaterial, ItemKind::SemiFinishedGood] {
        if let Ok(items) = catalog::get_all_active_items(db, kind).await {
            names.extend(items.into_iter().map(|item| item.name));
        }
    }

    matching(names, partial)
}

/// Provides autocomplete suggestions for finished good names.
pub async fn autocomplete_finished_good_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(goods) = finished_good::get_all_active_finished_goods(&ctx.data().database).await
    else {
        return Vec::new();
    };

    matching(goods.into_iter().map(|fg| fg.name), partial)
}

/// Provides autocomplete suggestions for editable line-level field names.
#[allow(clippy::unused_async)]
pub async fn autocomplete_line_field(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        LineField::ALL.iter().map(|field| field.wire_name().to_string()),
        partial,
    )
}

/// Provides autocomplete suggestions for material row fields.
#[allow(clippy::unused_async)]
pub async fn autocomplete_material_field(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        ["height", "width", "qty"].map(str::to_string),
        partial,
    )
}
