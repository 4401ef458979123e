use crate::core::pricing::{self, Ledger};
use crate::core::validation;
use crate::error::{OrderError, OrderResult};
use crate::excel::{export_order, OrderWorkbook, PhotoStatus};
use crate::types::{LineItem, OrderRequest};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Format a money amount with two decimals and thousands separators
pub fn format_money(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Read line items from a JSON file: `{"items": [...]}` or a bare array
pub fn read_items(path: &Path) -> OrderResult<Vec<LineItem>> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let request: OrderRequest = if value.is_array() {
        serde_json::from_value(serde_json::json!({ "items": value }))?
    } else {
        serde_json::from_value(value)?
    };
    Ok(request.items)
}

fn print_ledger(ledger: &Ledger) {
    println!("   Items:                {}", ledger.item_count());
    println!("   Total quantity:       {}", ledger.total_quantity);
    println!("   Total price:          {} ¥", format_money(ledger.total_price));
    println!(
        "   Commission ({}%):      {} ¥",
        ledger.rates.commission_rate * 100.0,
        format_money(ledger.total_commission)
    );
    println!(
        "   Total w/ commission:  {} ¥",
        format_money(ledger.total_with_commission)
    );
    println!("   Exchange rate:        {}", ledger.rates.exchange_rate);
    println!(
        "   Total converted:      {}",
        format!("{} ₽", format_money(ledger.total_converted)).bold().green()
    );
}

/// Execute the export command
pub fn export(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> OrderResult<()> {
    println!("{}", "🔥 Order Forge - Excel Export".bold().green());
    println!("   Input:  {}", input.display());

    let items = read_items(&input)?;
    if verbose {
        println!("   Found {} items\n", items.len());
    }

    let exported = export_order(&items, &OrderWorkbook::new())?;
    let output = output.unwrap_or_else(|| PathBuf::from(&exported.filename));
    println!("   Output: {}\n", output.display());

    fs::write(&output, &exported.bytes)?;

    if verbose {
        for row in &exported.report.rows {
            match &row.photo {
                PhotoStatus::Absent => {}
                PhotoStatus::Embedded => {
                    println!("   Row {}: photo embedded", row.row);
                }
                PhotoStatus::Failed(reason) => {
                    println!("   Row {}: {}", row.row, reason.yellow());
                }
            }
        }
        println!();
    }

    print_ledger(&exported.ledger);
    println!();

    let failed = exported.report.failed_photos();
    if failed > 0 {
        println!(
            "{}",
            format!("⚠️  {failed} photo(s) could not be embedded").yellow()
        );
    }
    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {} ({} bytes)\n", output.display(), exported.bytes.len());

    Ok(())
}

/// Execute the totals command
pub fn totals(input: PathBuf) -> OrderResult<()> {
    println!("{}", "🔥 Order Forge - Order Totals".bold().green());
    println!("   Input: {}\n", input.display());

    let items = read_items(&input)?;
    let ledger = pricing::compute(&items)?;

    println!("{}", "📋 Lines:".bold().cyan());
    for (idx, (item, line)) in items.iter().zip(&ledger.lines).enumerate() {
        println!(
            "   {:>3}. {} × {} = {} ¥ → {} ₽",
            idx + 1,
            line.quantity,
            format_money(line.price),
            format_money(line.line_total),
            format_money(line.total_converted)
        );
        if !item.url.is_empty() {
            println!("        {}", item.url.bright_blue());
        }
    }
    println!();

    println!("{}", "✅ Totals:".bold().green());
    print_ledger(&ledger);
    println!();

    Ok(())
}

/// Execute the check command: fails unless at least one item is valid
pub fn check(input: PathBuf) -> OrderResult<()> {
    println!("{}", "🔍 Order Forge - Item Check".bold().green());
    println!("   Input: {}\n", input.display());

    let items = read_items(&input)?;
    if items.is_empty() {
        return Err(OrderError::EmptyInput);
    }

    let mut valid = 0;
    for (idx, item) in items.iter().enumerate() {
        let issues = validation::validate_item(item);
        if issues.is_empty() {
            valid += 1;
            println!("   {:>3}. {}", idx + 1, "ok".green());
        } else {
            println!("   {:>3}. {}", idx + 1, "incomplete".red());
            for issue in issues {
                println!("        - {issue}");
            }
        }
    }
    println!();
    println!("   Filled in: {} of {}", valid, items.len());

    if validation::is_order_valid(&items) {
        println!("{}", "✅ Order can be exported".bold().green());
        Ok(())
    } else {
        println!("{}", "❌ No complete items".bold().red());
        Err(OrderError::Invalid(
            "at least one item needs a marketplace link, price and quantity".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(12.5), "12.50");
        assert_eq!(format_money(1234.5), "1,234.50");
        assert_eq!(format_money(4483.5), "4,483.50");
        assert_eq!(format_money(1234567.891), "1,234,567.89");
        assert_eq!(format_money(-1000.0), "-1,000.00");
        assert_eq!(format_money(-0.001), "0.00");
    }

    #[test]
    fn test_read_items_wrapped_and_bare() {
        let dir = TempDir::new().unwrap();

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, r#"{"items": [{"id": "1", "price": 5, "quantity": 2}]}"#).unwrap();
        let items = read_items(&wrapped).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);

        let bare = dir.path().join("bare.json");
        fs::write(&bare, r#"[{"id": "1"}, {"id": "2"}]"#).unwrap();
        assert_eq!(read_items(&bare).unwrap().len(), 2);
    }

    #[test]
    fn test_read_items_missing_file() {
        let result = read_items(Path::new("/nonexistent/items.json"));
        assert!(matches!(result, Err(OrderError::Io(_))));
    }

    #[test]
    fn test_read_items_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_items(&path), Err(OrderError::Json(_))));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("items.json");
        let output = dir.path().join("order.xlsx");
        fs::write(
            &input,
            r#"{"items": [{"id": "1", "url": "https://1688.com/x", "price": 100, "quantity": 2}]}"#,
        )
        .unwrap();

        export(input, Some(output.clone()), true).unwrap();
        assert!(output.exists());
        assert!(fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn test_export_empty_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("items.json");
        fs::write(&input, r#"{"items": []}"#).unwrap();

        let result = export(input, Some(dir.path().join("out.xlsx")), false);
        assert!(matches!(result, Err(OrderError::EmptyInput)));
    }

    #[test]
    fn test_check_requires_a_valid_item() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        fs::write(
            &good,
            r#"[{"id": "1", "url": "https://taobao.com/x", "price": 1, "quantity": 1}, {"id": "2"}]"#,
        )
        .unwrap();
        assert!(check(good).is_ok());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"[{"id": "1", "url": "https://example.com", "price": 1}]"#).unwrap();
        assert!(matches!(check(bad), Err(OrderError::Invalid(_))));
    }
}
