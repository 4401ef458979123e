//! Fixed sheet geometry and labels
//!
//! Row numbers here are 1-based, as a user sees them in Excel. Consumers rely on
//! these positions, so they never depend on content.

pub const SHEET_NAME: &str = "Заказ";
pub const TITLE: &str = "Бланк заказа 1688/Taobao";

pub const COMMISSION_RATE_NAME: &str = "CommissionRate";
pub const EXCHANGE_RATE_NAME: &str = "ExchangeRate";

pub const TITLE_ROW: u32 = 1;
pub const SUMMARY_FIRST_ROW: u32 = 2;
pub const SUMMARY_LAST_ROW: u32 = 7;
pub const HEADER_ROW: u32 = 9;
pub const FIRST_DATA_ROW: u32 = 10;

/// Summary block value cells
pub const ORDER_DATE_CELL: &str = "C2";
pub const ITEM_COUNT_CELL: &str = "C3";
pub const TOTAL_QUANTITY_CELL: &str = "C4";
pub const TOTAL_PRICE_CELL: &str = "G2";
pub const TOTAL_COMMISSION_CELL: &str = "G3";
pub const TOTAL_WITH_COMMISSION_CELL: &str = "G4";
pub const COMMISSION_RATE_CELL: &str = "G5";
pub const EXCHANGE_RATE_CELL: &str = "G6";
pub const TOTAL_CONVERTED_CELL: &str = "G7";

pub const TITLE_HEIGHT: f64 = 30.0;
pub const SUMMARY_HEIGHT: f64 = 22.0;
pub const HEADER_HEIGHT: f64 = 35.0;
pub const PHOTO_ROW_HEIGHT: f64 = 85.0;
pub const PLAIN_ROW_HEIGHT: f64 = 25.0;
pub const TOTALS_HEIGHT: f64 = 30.0;

/// Thumbnail edge, in pixels
pub const THUMBNAIL_SIZE: u32 = 80;
pub const THUMBNAIL_OFFSET: u32 = 2;

pub const PHOTO_ERROR_MARKER: &str = "Фото (ошибка)";
pub const LINK_TOOLTIP: &str = "Открыть ссылку";
pub const TOTALS_LABEL: &str = "ИТОГО:";
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub const MONEY_FORMAT: &str = "#,##0.00";
pub const PERCENT_FORMAT: &str = "0%";

/// Table columns, in sheet order (0-based index = position in this array)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Number,
    Photo,
    Link,
    Size,
    Color,
    Quantity,
    Price,
    LineTotal,
    Commission,
    TotalWithCommission,
    TotalConverted,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Number,
        Column::Photo,
        Column::Link,
        Column::Size,
        Column::Color,
        Column::Quantity,
        Column::Price,
        Column::LineTotal,
        Column::Commission,
        Column::TotalWithCommission,
        Column::TotalConverted,
    ];

    pub fn index(self) -> u16 {
        self as u16
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Number => "№",
            Column::Photo => "Фото",
            Column::Link => "Ссылка на товар",
            Column::Size => "Размер",
            Column::Color => "Цвет",
            Column::Quantity => "Кол-во",
            Column::Price => "Цена за 1 (юань)",
            Column::LineTotal => "Сумма (юань)",
            Column::Commission => "Комиссия 5%",
            Column::TotalWithCommission => "Итого с комиссией (юань)",
            Column::TotalConverted => "Итого (руб)",
        }
    }

    pub fn width(self) -> f64 {
        match self {
            Column::Number => 6.0,
            Column::Photo => 15.0,
            Column::Link => 45.0,
            Column::Size | Column::Color | Column::Price => 12.0,
            Column::Quantity => 10.0,
            Column::LineTotal | Column::Commission | Column::TotalConverted => 14.0,
            Column::TotalWithCommission => 16.0,
        }
    }

    /// Columns holding currency amounts
    pub fn is_money(self) -> bool {
        matches!(
            self,
            Column::Price
                | Column::LineTotal
                | Column::Commission
                | Column::TotalWithCommission
                | Column::TotalConverted
        )
    }

    /// Columns summed in the totals row
    pub fn is_summed(self) -> bool {
        matches!(
            self,
            Column::Quantity
                | Column::LineTotal
                | Column::Commission
                | Column::TotalWithCommission
                | Column::TotalConverted
        )
    }
}

/// Summary block labels: (label, 1-based row)
pub const SUMMARY_LEFT: [(&str, u32); 3] = [
    ("Дата заказа:", 2),
    ("Всего товаров:", 3),
    ("Всего кол-во:", 4),
];

pub const SUMMARY_RIGHT: [(&str, u32); 6] = [
    ("Общая цена:", 2),
    ("Комиссия 5%:", 3),
    ("Итого с комиссией:", 4),
    ("Комиссия (%):", 5),
    ("Курс (руб/юань):", 6),
    ("Итого в рублях:", 7),
];

/// Unit suffix written in column H next to each right-hand value
pub fn summary_unit(row: u32) -> &'static str {
    match row {
        2..=4 => "юань",
        6 => "руб/юань",
        7 => "руб",
        _ => "",
    }
}

/// 1-based row of the data row for the item at `index`
pub fn data_row(index: usize) -> u32 {
    FIRST_DATA_ROW + index as u32
}

/// 1-based row of the totals row for `item_count` items
pub fn totals_row(item_count: usize) -> u32 {
    FIRST_DATA_ROW + item_count as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        let letter = |c: Column| crate::excel::cells::column_index_to_letter(c.index() as usize);
        assert_eq!(letter(Column::Number), "A");
        assert_eq!(letter(Column::Photo), "B");
        assert_eq!(letter(Column::Quantity), "F");
        assert_eq!(letter(Column::Price), "G");
        assert_eq!(letter(Column::TotalConverted), "K");
    }

    #[test]
    fn test_column_order_matches_index() {
        for (idx, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index() as usize, idx);
        }
    }

    #[test]
    fn test_money_and_summed_columns() {
        let money: Vec<_> = Column::ALL.iter().filter(|c| c.is_money()).collect();
        let summed: Vec<_> = Column::ALL.iter().filter(|c| c.is_summed()).collect();
        assert_eq!(money.len(), 5);
        assert_eq!(summed.len(), 5);
        assert!(!Column::Price.is_summed());
        assert!(!Column::Quantity.is_money());
    }

    #[test]
    fn test_row_positions() {
        assert_eq!(data_row(0), 10);
        assert_eq!(data_row(4), 14);
        assert_eq!(totals_row(1), 11);
        assert_eq!(totals_row(2), 12);
    }

    #[test]
    fn test_summary_units() {
        assert_eq!(summary_unit(2), "юань");
        // G5 carries its own percent format
        assert_eq!(summary_unit(5), "");
        assert_eq!(summary_unit(7), "руб");
        assert_eq!(summary_unit(1), "");
    }
}
