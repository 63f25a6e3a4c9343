//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**SmartKharch Help**\n\
        Track daily expenses, set monthly budgets and get alerted when spending runs away.\n\n\
        **Expenses**\n\
        • `/expense add <category> <amount> [date] [note]` - Records an expense (date as YYYY-MM-DD, default today).\n\
        • `/expense delete <id>` - Deletes an expense by its number.\n\
        • `/expense history [month] [category]` - Lists recent expenses.\n\n\
        **Budgets**\n\
        • `/budget set [month] [food] [shopping] ...` - Sets category limits for a month (YYYY-MM, default this month).\n\
        • `/budget show [month]` - Shows spending against the month's budget.\n\n\
        **Reports**\n\
        • `/alerts [month]` - Overspent categories and month-over-month spending jumps.\n\
        • `/insights [month]` - Category breakdown, daily totals and the monthly trend.\n\
        • `/periods` - Months with recorded expenses.\n\
        • `/export` - Downloads expenses and budgets as CSV files.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
