//! Expense Discord commands - `/expense add`, `/expense delete` and `/expense history`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::autocomplete,
            or_reject,
            utils::{EMBED_DESCRIPTION_LIMIT, join_limited, parse_category_arg, parse_period_arg, plural},
        },
        core::{
            Category, Period,
            alerts::{self, Alert},
            budget, expense,
            insights::format_amount,
        },
        entities::expense::Model as ExpenseModel,
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use poise::serenity_prelude as serenity;
    use rust_decimal::Decimal;
    use std::fmt::Write;
    use std::str::FromStr;

    /// Validates the raw `/expense add` arguments against `today`.
    pub fn parse_expense_input(
        category: &str,
        amount: f64,
        date: Option<&str>,
        today: NaiveDate,
    ) -> Result<(Category, Decimal, NaiveDate)> {
        let category = Category::from_str(category)?;
        let amount = expense::amount_from_input(amount)?;
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => expense::parse_expense_date(raw)?,
            None => today,
        };
        expense::validate_expense_date(date, today)?;
        Ok((category, amount, date))
    }

    /// One history line: `#12 · 2024-02-01 · Food · ₹120.00 · note`
    pub fn history_line(expense: &ExpenseModel) -> String {
        let mut line = format!(
            "`#{}` · {} · **{}** · {}",
            expense.id,
            expense.date,
            expense.category,
            format_amount(expense.amount)
        );
        if let Some(note) = &expense.note {
            line.push_str(" · ");
            line.push_str(note);
        }
        line
    }

    /// Parent command for recording and reviewing expenses.
    #[poise::command(
        slash_command,
        subcommands("expense_add", "expense_delete", "expense_history")
    )]
    pub async fn expense(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Expense command. Available subcommands:\n\
            `/expense add` - Record an expense\n\
            `/expense delete` - Delete an expense by number\n\
            `/expense history` - List recent expenses";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records an expense.
    ///
    /// The date defaults to today and may be up to a year in the past. If the expense
    /// takes its category over the month's budget, the reply says so.
    #[poise::command(slash_command, rename = "add")]
    pub async fn expense_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Amount spent"] amount: f64,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        let input = parse_expense_input(&category, amount, date.as_deref(), today);
        let Some((category, amount, date)) = or_reject(ctx, input).await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let recorded = expense::create_expense(db, date, amount, category, note).await?;

        let mut reply = format!(
            "✅ Recorded {} on {} for {} (Expense #{})",
            format_amount(recorded.amount),
            recorded.category,
            recorded.date,
            recorded.id
        );

        let period = Period::from_date(recorded.date);
        if let Some(limits) = budget::get_budget_for_period(db, &period).await? {
            let records = expense::get_expenses_for_period(db, &period).await?;
            for alert in alerts::check_budget_exceedance(&records, &limits) {
                if matches!(alert, Alert::Overspent { category: over, .. } if over == category) {
                    write!(reply, "\n{alert}")?;
                }
            }
        }

        ctx.say(reply).await?;
        Ok(())
    }

    /// Deletes an expense by its number.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn expense_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense number shown in /expense history"] id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let result = expense::delete_expense(db, id).await;
        let Some(deleted) = or_reject(ctx, result).await? else {
            return Ok(());
        };

        ctx.say(format!(
            "🗑️ Deleted expense #{}: {} on {} for {}",
            deleted.id,
            format_amount(deleted.amount),
            deleted.category,
            deleted.date
        ))
        .await?;
        Ok(())
    }

    /// Lists the most recent expenses, newest first.
    #[poise::command(slash_command, rename = "history")]
    pub async fn expense_history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this month (YYYY-MM)"]
        #[autocomplete = "autocomplete::autocomplete_period"]
        month: Option<String>,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let Some(period) = or_reject(ctx, parse_period_arg(month.as_deref())).await? else {
            return Ok(());
        };
        let Some(category) = or_reject(ctx, parse_category_arg(category.as_deref())).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let limit = u64::try_from(data.config.history_limit).unwrap_or(u64::MAX);
        let expenses =
            expense::recent_expenses(&data.database, period.as_ref(), category, limit).await?;

        if expenses.is_empty() {
            ctx.say("📭 No expenses found. Record one with `/expense add`.")
                .await?;
            return Ok(());
        }

        let mut title = String::from("🧾 Recent Expenses");
        if let Some(period) = &period {
            write!(title, " · {period}")?;
        }
        if let Some(category) = category {
            write!(title, " · {category}")?;
        }

        let lines: Vec<String> = expenses.iter().map(history_line).collect();
        let embed = serenity::CreateEmbed::default()
            .title(title)
            .description(join_limited(&lines, EMBED_DESCRIPTION_LIMIT, ""))
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {}",
                plural(expenses.len(), "expense")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::Category;
    use crate::errors::Error;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_expense_input_defaults_to_today() {
        let today = test_date(2024, 6, 15);
        let (category, amount, date) = parse_expense_input("food", 120.5, None, today).unwrap();
        assert_eq!(category, Category::Food);
        assert_eq!(amount, dec!(120.50));
        assert_eq!(date, today);
    }

    #[test]
    fn test_parse_expense_input_with_date() {
        let today = test_date(2024, 6, 15);
        let (_, _, date) = parse_expense_input("Bills", 10.0, Some("2024-05-01"), today).unwrap();
        assert_eq!(date, test_date(2024, 5, 1));
    }

    #[test]
    fn test_parse_expense_input_rejections() {
        let today = test_date(2024, 6, 15);
        assert!(matches!(
            parse_expense_input("Pets", 1.0, None, today),
            Err(Error::UnknownCategory { .. })
        ));
        assert!(matches!(
            parse_expense_input("Food", -1.0, None, today),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_expense_input("Food", 1.0, Some("2024-06-16"), today),
            Err(Error::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_expense_input("Food", 1.0, Some("15/06/2024"), today),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[tokio::test]
    async fn test_history_line() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let plain = create_test_expense(&db, "2024-02-01", Category::Food, dec!(120)).await?;
        assert_eq!(
            history_line(&plain),
            format!("`#{}` · 2024-02-01 · **Food** · ₹120.00", plain.id)
        );

        let noted = crate::core::expense::create_expense(
            &db,
            test_date(2024, 2, 2),
            dec!(5),
            Category::Others,
            Some("tip".to_string()),
        )
        .await?;
        assert!(history_line(&noted).ends_with("₹5.00 · tip"));
        Ok(())
    }
}
