//! Budget Discord commands - `/budget set` and `/budget show`.
//!
//! A budget holds one limit per category for a month. `/budget set` only changes the
//! categories it is given; the rest keep their saved limit (or zero for a new month).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, or_reject, utils::parse_period_arg},
        core::{
            Category, Period,
            budget::{self, BudgetMap},
            expense, insights, ledger,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    /// Converts the optional per-category amounts of `/budget set`.
    pub fn parse_budget_inputs(values: [(Category, Option<f64>); 6]) -> Result<BudgetMap> {
        values
            .into_iter()
            .filter_map(|(category, value)| value.map(|v| (category, v)))
            .map(|(category, value)| Ok((category, expense::amount_from_input(value)?)))
            .collect()
    }

    /// Status line for one category: spent against limit with a progress bar.
    pub fn budget_line(spent: Decimal, limit: Decimal) -> String {
        let percent = insights::percent_of(spent, limit);
        let status = if spent > limit {
            "🔴"
        } else if percent >= 80.0 {
            "🟡"
        } else {
            "🟢"
        };

        if limit.is_zero() {
            return format!(
                "{status} {} / {} (no allowance)",
                insights::format_amount(spent),
                insights::format_amount(limit)
            );
        }
        format!(
            "{status} {} / {}\n{}",
            insights::format_amount(spent),
            insights::format_amount(limit),
            insights::format_bar(percent, Some(10))
        )
    }

    /// Parent command for monthly budgets.
    #[poise::command(slash_command, subcommands("budget_set", "budget_show"))]
    pub async fn budget(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Budget command. Available subcommands:\n\
            `/budget set` - Set category limits for a month\n\
            `/budget show` - Compare a month's spending with its budget";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets category limits for a month.
    ///
    /// Categories left out keep their saved limit, or zero when the month has no
    /// budget yet.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "set")]
    pub async fn budget_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (defaults to this month)"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        month: Option<String>,
        #[description = "Food limit"] food: Option<f64>,
        #[description = "Shopping limit"] shopping: Option<f64>,
        #[description = "Travel limit"] travel: Option<f64>,
        #[description = "Groceries limit"] groceries: Option<f64>,
        #[description = "Bills limit"] bills: Option<f64>,
        #[description = "Others limit"] others: Option<f64>,
    ) -> Result<()> {
        let Some(requested) = or_reject(ctx, parse_period_arg(month.as_deref())).await? else {
            return Ok(());
        };
        let period =
            requested.unwrap_or_else(|| Period::from_date(chrono::Local::now().date_naive()));

        let inputs = parse_budget_inputs([
            (Category::Food, food),
            (Category::Shopping, shopping),
            (Category::Travel, travel),
            (Category::Groceries, groceries),
            (Category::Bills, bills),
            (Category::Others, others),
        ]);
        let Some(inputs) = or_reject(ctx, inputs).await? else {
            return Ok(());
        };
        if inputs.is_empty() {
            ctx.say("❌ Give at least one category limit, e.g. `/budget set food:5000`.")
                .await?;
            return Ok(());
        }

        let db = &ctx.data().database;
        let existing = budget::get_budget_for_period(db, &period).await?;
        let merged = budget::merge_budget_inputs(existing.as_ref(), &inputs);
        let saved = budget::save_budget(db, &period, &merged).await?;

        let fields: Vec<(String, String, bool)> = Category::ALL
            .into_iter()
            .map(|category| {
                let marker = if inputs.contains_key(&category) { " ✏️" } else { "" };
                (
                    format!("{category}{marker}"),
                    insights::format_amount(saved.amount_for(category)),
                    true,
                )
            })
            .collect();
        let total: Decimal = merged.values().copied().sum();

        let embed = serenity::CreateEmbed::default()
            .title(format!("💰 Budget saved for {period}"))
            .color(0x0058_65F2)
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Total budget: {}",
                insights::format_amount(total)
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows a month's spending against its budget.
    #[poise::command(slash_command, rename = "show")]
    pub async fn budget_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (defaults to this month)"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        month: Option<String>,
    ) -> Result<()> {
        let Some(requested) = or_reject(ctx, parse_period_arg(month.as_deref())).await? else {
            return Ok(());
        };
        let period =
            requested.unwrap_or_else(|| Period::from_date(chrono::Local::now().date_naive()));

        let ledger = ledger::load_ledger(&ctx.data().database).await?;
        let Some(limits) = ledger.budget_for(&period) else {
            ctx.say(format!(
                "📭 No budget saved for {period}. Use `/budget set` to create one."
            ))
            .await?;
            return Ok(());
        };

        let spent: BTreeMap<Category, Decimal> =
            insights::category_totals(&ledger.expenses_for(&period))
                .into_iter()
                .map(|share| (share.category, share.total))
                .collect();

        let fields: Vec<(String, String, bool)> = limits
            .iter()
            .map(|(&category, &limit)| {
                let spent = spent.get(&category).copied().unwrap_or(Decimal::ZERO);
                (category.to_string(), budget_line(spent, limit), false)
            })
            .collect();

        let total_spent: Decimal = spent.values().copied().sum();
        let total_budget: Decimal = limits.values().copied().sum();

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 Budget for {period}"))
            .color(0x0034_98DB)
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Spent {} of {}",
                insights::format_amount(total_spent),
                insights::format_amount(total_budget)
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
