//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests category names and recorded periods as the user types.

use crate::{
    bot::BotData,
    core::{Category, expense},
    errors::Error,
};
use tracing::warn;

/// Discord autocomplete limit
const MAX_CHOICES: usize = 25;

/// Categories whose name contains `partial`, case-insensitively, in category order.
#[must_use]
pub fn matching_categories(partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    Category::ALL
        .iter()
        .map(|category| category.label())
        .filter(|label| label.to_lowercase().contains(&partial_lower))
        .map(ToString::to_string)
        .collect()
}

/// Provides autocomplete suggestions for category names.
#[allow(clippy::unused_async)]
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_categories(partial)
}

/// Provides autocomplete suggestions for periods that have expenses, most recent first.
pub async fn autocomplete_period(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let periods = match expense::list_periods(db).await {
        Ok(periods) => periods,
        Err(e) => {
            warn!("Period autocomplete failed: {e}");
            return Vec::new();
        }
    };

    let partial = partial.trim();
    periods
        .into_iter()
        .map(|period| period.to_string())
        .filter(|period| period.contains(partial))
        .take(MAX_CHOICES)
        .collect()
}
