use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, format_amount, render_transactions};
use crate::cli::registry::CommandEntry;
use crate::ledger::{parse_amount, Transaction, TransactionKind, SUGGESTED_CATEGORIES};

const DEFAULT_CATEGORY: &str = "Other";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record a new income or expense",
            "add <YYYY-MM-DD> <amount> <income|expense> [category]",
            cmd_add,
        ),
        CommandEntry::new(
            "update",
            "Replace the transaction at a row number",
            "update <row> <YYYY-MM-DD> <amount> <income|expense> [category]",
            cmd_update,
        )
        .with_aliases(&["edit"]),
        CommandEntry::new(
            "delete",
            "Remove the transaction at a row number",
            "delete <row>",
            cmd_delete,
        )
        .with_aliases(&["remove", "rm"]),
        CommandEntry::new("undo", "Revert the last add, update or delete", "undo", cmd_undo),
        CommandEntry::new("list", "Show all transactions by date", "list", cmd_list)
            .with_aliases(&["ls"]),
        CommandEntry::new(
            "summary",
            "Show income, expense and balance totals",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Show totals per category",
            "categories",
            cmd_categories,
        ),
    ]
}

/// Fields shared by `add` and `update`.
struct EntryArgs {
    date: String,
    amount: f64,
    kind: TransactionKind,
    category: Option<String>,
}

fn parse_entry(args: &[&str], usage: &str) -> Result<EntryArgs, CommandError> {
    let [date, amount, kind, category @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let category = (!category.is_empty()).then(|| category.join(" "));
    Ok(EntryArgs {
        date: date.to_string(),
        amount: parse_amount(amount)?,
        kind: kind.parse()?,
        category,
    })
}

/// Converts a 1-based row number into a ledger index.
fn parse_row(raw: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(CommandError::InvalidArguments(
            "row numbers start at 1".into(),
        )),
        Ok(row) => Ok(row - 1),
        Err(_) => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a row number"
        ))),
    }
}

fn describe(txn: &Transaction, symbol: &str) -> String {
    let category = if txn.category().is_empty() {
        "(no category)"
    } else {
        txn.category()
    };
    format!(
        "{} {} {} {}",
        txn.date_str(),
        txn.kind(),
        format_amount(txn.amount(), symbol),
        category
    )
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entry = parse_entry(args, "add <YYYY-MM-DD> <amount> <income|expense> [category]")?;
    let category = entry.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let report = context
        .manager_mut()
        .add(&entry.date, entry.amount, entry.kind, &category)?;

    let row = context
        .manager()
        .ledger()
        .position(report.value.id())
        .map(|index| index + 1)
        .unwrap_or_default();
    output::success(format!(
        "Transaction added: {} (row {row})",
        describe(&report.value, context.currency_symbol())
    ));
    context.report_save(&report.save);
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "update <row> <YYYY-MM-DD> <amount> <income|expense> [category]";
    let Some((row, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let index = parse_row(row)?;
    let entry = parse_entry(rest, usage)?;
    let category = match entry.category {
        Some(category) => category,
        None => context
            .manager()
            .ledger()
            .get(index)
            .map(|txn| txn.category().to_string())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
    };

    let report = context
        .manager_mut()
        .update_at(index, &entry.date, entry.amount, entry.kind, &category)?;
    let (previous, replacement) = &report.value;
    let symbol = context.currency_symbol();
    output::success(format!(
        "Transaction updated: {} -> {}",
        describe(previous, symbol),
        describe(replacement, symbol)
    ));
    context.report_save(&report.save);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <row>".into()));
    };
    let index = parse_row(row)?;
    let report = context.manager_mut().delete_at(index)?;
    output::success(format!(
        "Transaction deleted: {}",
        describe(&report.value, context.currency_symbol())
    ));
    context.report_save(&report.save);
    Ok(())
}

fn cmd_undo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.manager_mut().undo()?;
    let outcome = &report.value;
    let label = outcome.kind.label();
    if outcome.applied {
        output::success(format!(
            "Last action undone ({label} of {}).",
            describe(&outcome.transaction, context.currency_symbol())
        ));
    } else {
        output::warning(format!(
            "The last {label} no longer matches any transaction; nothing changed."
        ));
    }
    context.report_save(&report.save);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = context.manager().list();
    if transactions.is_empty() {
        output::info("No transactions recorded yet.");
        return Ok(());
    }
    println!("{}", render_transactions(transactions, context.currency_symbol()));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.manager().summary();
    let symbol = context.currency_symbol();
    output::section("Summary");
    output::info(format!(
        "Income = {} | Expense = {} | Balance = {} | Transactions: {}",
        format_amount(summary.total_income, symbol),
        format_amount(summary.total_expense, symbol),
        format_amount(summary.balance, symbol),
        summary.count
    ));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager().category_totals();
    let symbol = context.currency_symbol();
    output::section("Category totals");
    if totals.is_empty() {
        output::info("No transactions recorded yet.");
    }
    let width = totals
        .iter()
        .map(|(category, _)| category.chars().count())
        .max()
        .unwrap_or(0);
    for (category, total) in totals.iter() {
        println!("  {category:<width$}  {}", format_amount(total, symbol));
    }
    output::hint(format!("Suggested categories: {}", SUGGESTED_CATEGORIES.join(", ")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LedgerError, ValidationError};

    #[test]
    fn rows_are_one_based() {
        assert_eq!(parse_row("1").unwrap(), 0);
        assert_eq!(parse_row("12").unwrap(), 11);
        assert!(matches!(parse_row("0"), Err(CommandError::InvalidArguments(_))));
        assert!(matches!(parse_row("x"), Err(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn entry_args_join_category_words() {
        let args = ["2024-01-01", "12.5", "expense", "Eating", "out"];
        let entry = parse_entry(&args, "add").unwrap();
        assert_eq!(entry.date, "2024-01-01");
        assert_eq!(entry.amount, 12.5);
        assert_eq!(entry.kind, TransactionKind::Expense);
        assert_eq!(entry.category.as_deref(), Some("Eating out"));
    }

    #[test]
    fn entry_args_report_reasons() {
        assert!(matches!(
            parse_entry(&["2024-01-01", "12.5"], "add"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_entry(&["2024-01-01", "-3", "income"], "add"),
            Err(CommandError::Core(LedgerError::Validation(
                ValidationError::NonPositiveAmount(_)
            )))
        ));
        assert!(matches!(
            parse_entry(&["2024-01-01", "3", "gift"], "add"),
            Err(CommandError::Core(LedgerError::Validation(
                ValidationError::UnknownKind(_)
            )))
        ));
    }
}
