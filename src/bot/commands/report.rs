//! Report Discord commands - `/alerts`, `/insights`, `/periods` and `/export`.
//!
//! Each command loads one ledger snapshot and renders it; nothing here writes to the
//! database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::autocomplete,
            or_reject,
            utils::{EMBED_DESCRIPTION_LIMIT, EMBED_FIELD_LIMIT, join_limited, parse_period_arg, plural},
        },
        core::{
            Period, flatfile, insights,
            ledger::{self, AlertReport, Ledger},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    const ALERT_COLOR: u32 = 0x00E7_4C3C;
    const CLEAR_COLOR: u32 = 0x002E_CC71;

    /// Embed fields for an alert report: budget check first, then spending jumps.
    pub fn alert_fields(report: &AlertReport) -> Vec<(String, String, bool)> {
        let budget_value = match &report.period {
            None => "No month selected.".to_string(),
            Some(period) if !report.has_budget => {
                format!("No budget saved for {period}. Use `/budget set` to create one.")
            }
            Some(_) if report.budget_alerts.is_empty() => {
                "✅ All categories are within budget.".to_string()
            }
            Some(_) => {
                let lines: Vec<String> =
                    report.budget_alerts.iter().map(ToString::to_string).collect();
                join_limited(&lines, EMBED_FIELD_LIMIT, "")
            }
        };
        let budget_name = report.period.as_ref().map_or_else(
            || "Budget check".to_string(),
            |period| format!("Budget check · {period}"),
        );

        let spike_lines: Vec<String> = report
            .spending_alerts
            .iter()
            .map(ToString::to_string)
            .collect();
        let spike_value = join_limited(
            &spike_lines,
            EMBED_FIELD_LIMIT,
            "✅ No category grew by more than 20% month over month.",
        );

        vec![
            (budget_name, budget_value, false),
            ("Month-over-month".to_string(), spike_value, false),
        ]
    }

    /// Embed fields summarising one period, plus the trend over all periods.
    pub fn insight_fields(ledger: &Ledger, period: &Period) -> Vec<(String, String, bool)> {
        let records = ledger.expenses_for(period);
        let shares = insights::top_categories(&records);

        let mut fields = vec![
            (
                "Total".to_string(),
                insights::format_amount(insights::total_spent(&records)),
                true,
            ),
            ("Expenses".to_string(), records.len().to_string(), true),
        ];
        if let Some(top) = shares.first() {
            fields.push(("Top category".to_string(), top.category.to_string(), true));
        }

        let category_lines: Vec<String> = shares
            .iter()
            .map(|share| {
                format!(
                    "**{}** {} {}",
                    share.category,
                    insights::format_amount(share.total),
                    insights::format_bar(share.percent, Some(10))
                )
            })
            .collect();
        fields.push((
            "By category".to_string(),
            join_limited(&category_lines, EMBED_FIELD_LIMIT, "-"),
            false,
        ));

        let daily_lines: Vec<String> = insights::daily_totals(&records)
            .into_iter()
            .map(|(day, total)| format!("{day} · {}", insights::format_amount(total)))
            .collect();
        fields.push((
            "Daily totals".to_string(),
            join_limited(&daily_lines, EMBED_FIELD_LIMIT, "-"),
            false,
        ));

        // Most recent months first so truncation drops the oldest
        let trend_lines: Vec<String> = insights::monthly_totals(&ledger.expenses)
            .into_iter()
            .rev()
            .map(|(month, total)| format!("{month} · {}", insights::format_amount(total)))
            .collect();
        fields.push((
            "Monthly trend".to_string(),
            join_limited(&trend_lines, EMBED_FIELD_LIMIT, "-"),
            false,
        ));

        fields
    }

    /// One `/periods` line: `2024-02 · ₹350.00 · 3 expenses 💰`
    pub fn period_line(ledger: &Ledger, period: &Period) -> String {
        let records = ledger.expenses_for(period);
        let mut line = format!(
            "{period} · {} · {}",
            insights::format_amount(insights::total_spent(&records)),
            plural(records.len(), "expense")
        );
        if ledger.budget_for(period).is_some() {
            line.push_str(" 💰");
        }
        line
    }

    /// Shows budget overspending for a month and month-over-month spending jumps.
    ///
    /// Without a month, the most recent month with expenses is checked.
    #[poise::command(slash_command)]
    pub async fn alerts(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (defaults to the latest month with expenses)"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        month: Option<String>,
    ) -> Result<()> {
        let Some(requested) = or_reject(ctx, parse_period_arg(month.as_deref())).await? else {
            return Ok(());
        };

        let ledger = ledger::load_ledger(&ctx.data().database).await?;
        if ledger.expenses.is_empty() {
            ctx.say("📭 No expenses recorded yet. Record one with `/expense add`.")
                .await?;
            return Ok(());
        }

        let period = ledger.selected_period(requested);
        let report = ledger.alert_report(period.as_ref());
        let color = if report.budget_alerts.is_empty() && report.spending_alerts.is_empty() {
            CLEAR_COLOR
        } else {
            ALERT_COLOR
        };

        let embed = serenity::CreateEmbed::default()
            .title("🚨 Spending Alerts")
            .color(color)
            .fields(alert_fields(&report))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} · {}",
                plural(report.budget_alerts.len(), "budget alert"),
                plural(report.spending_alerts.len(), "spending alert")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows a month's category breakdown, daily totals and the monthly trend.
    #[poise::command(slash_command)]
    pub async fn insights(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (defaults to the latest month with expenses)"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        month: Option<String>,
    ) -> Result<()> {
        let Some(requested) = or_reject(ctx, parse_period_arg(month.as_deref())).await? else {
            return Ok(());
        };

        let ledger = ledger::load_ledger(&ctx.data().database).await?;
        let Some(period) = ledger.selected_period(requested) else {
            ctx.say("📭 No expenses recorded yet. Record one with `/expense add`.")
                .await?;
            return Ok(());
        };
        if ledger.expenses_for(&period).is_empty() {
            ctx.say(format!("📭 No expenses recorded for {period}."))
                .await?;
            return Ok(());
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("📈 Insights for {period}"))
            .color(0x0034_98DB)
            .fields(insight_fields(&ledger, &period));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists the months with recorded expenses, most recent first.
    #[poise::command(slash_command)]
    pub async fn periods(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let ledger = ledger::load_ledger(&ctx.data().database).await?;
        let periods = ledger.periods();

        if periods.is_empty() {
            ctx.say("📭 No expenses recorded yet. Record one with `/expense add`.")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = periods
            .iter()
            .map(|period| period_line(&ledger, period))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("🗓️ Months")
            .description(join_limited(&lines, EMBED_DESCRIPTION_LIMIT, ""))
            .color(0x0058_65F2)
            .footer(serenity::CreateEmbedFooter::new("💰 = budget saved"));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Exports all expenses and budgets as CSV files.
    ///
    /// When flat-file paths are configured, the files are also written there.
    #[poise::command(slash_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let ledger = ledger::load_ledger(&data.database).await?;
        let (expense_csv, budget_csv) = flatfile::export_ledger(&ledger)?;
        let written = flatfile::save_flat_files(&data.config, &expense_csv, &budget_csv).await?;

        let mut content = format!(
            "📦 Exported {} and {}.",
            plural(ledger.expenses.len(), "expense"),
            plural(ledger.budgets.len(), "budget")
        );
        for path in &written {
            write!(content, "\nSaved `{}`", path.display())?;
        }
        info!(
            expenses = ledger.expenses.len(),
            budgets = ledger.budgets.len(),
            "Exported ledger"
        );

        let reply = poise::CreateReply::default()
            .content(content)
            .attachment(serenity::CreateAttachment::bytes(expense_csv, "expenses.csv"))
            .attachment(serenity::CreateAttachment::bytes(budget_csv, "budgets.csv"));
        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
