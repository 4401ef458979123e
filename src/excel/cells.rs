//! A1-style cell references for the formulas the workbook writes

/// Convert a 0-based column index to an Excel column letter
///
/// Examples:
/// - 0 → A
/// - 1 → B
/// - 25 → Z
/// - 26 → AA
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// `H10` for column index 7, 1-based row 10
pub fn cell(col: u16, row: u32) -> String {
    format!("{}{}", column_index_to_letter(col as usize), row)
}

/// `$G$5` from `G5`
pub fn absolute(cell_ref: &str) -> String {
    let split = cell_ref
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(cell_ref.len());
    let (letters, digits) = cell_ref.split_at(split);
    format!("${letters}${digits}")
}

/// `'Sheet name'!$G$5`, the target of a workbook-level defined name
pub fn sheet_absolute(sheet: &str, cell_ref: &str) -> String {
    format!("='{}'!{}", sheet.replace('\'', "''"), absolute(cell_ref))
}

/// `=SUM(F10:F12)` over 1-based rows `first..=last` of one column
pub fn sum_column(col: u16, first: u32, last: u32) -> String {
    format!("=SUM({}:{})", cell(col, first), cell(col, last))
}

/// 0-based (row, col) of an A1 reference, for the worksheet API
pub fn position(cell_ref: &str) -> Option<(u32, u16)> {
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    let col = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize)
        - 1;
    Some((row - 1, u16::try_from(col).ok()?))
}
