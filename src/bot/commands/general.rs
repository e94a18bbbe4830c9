//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BomBuddy Help**\n\
        Prices finished goods from their bill of materials.\n\n\
        **Catalog Commands**\n\
        • `/catalog add <kind> <name> <rate>` - Adds a raw material or semi-finished good with its rate per square inch.\n\
        • `/catalog list <kind>` - Lists catalog items.\n\
        • `/catalog update <name> <rate>` - Changes an item's rate per square inch.\n\
        • `/catalog delete <name>` - Removes an item from the catalog.\n\n\
        **Finished Good Commands**\n\
        • `/fg create <name>` - Starts a finished good with the default overheads.\n\
        • `/fg add_material <fg> <item> <height> <width> <qty>` - Adds a BOM row.\n\
        • `/fg edit_material <fg> <row> <field> <value>` - Changes a row's height, width or qty.\n\
        • `/fg remove_material <fg> <row>` - Removes a BOM row.\n\
        • `/fg set <fg> <field> <value>` - Sets a fixed cost, overhead % or B2B/D2C markup.\n\
        • `/fg cost <fg>` - Shows the full cost breakdown.\n\
        • `/fg list`, `/fg delete <fg>`, `/fg export <fg>`\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Blank or non-numeric values count as zero, so a BOM can be filled in gradually.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
