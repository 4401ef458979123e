//! Order workbook builder: items + ledger → .xlsx bytes

use super::cells;
use super::layout::{self, Column};
use super::photo::decode_photo;
use crate::core::pricing::{Ledger, LineTotals};
use crate::error::{OrderError, OrderResult, PhotoError};
use crate::types::LineItem;
use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{
    Format, FormatAlign, FormatBorder, FormatUnderline, Formula, Image, Url, Workbook, Worksheet,
};
use serde::Serialize;
use tracing::{debug, warn};

const LABEL_FILL: u32 = 0xE6F3FF;
const RATE_FILL: u32 = 0xFFEB9C;
const GOLD_FILL: u32 = 0xFFD700;
const HEADER_FILL: u32 = 0x4472C4;
const LINK_COLOR: u32 = 0x0000FF;

/// What happened to one item's photo cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum PhotoStatus {
    Absent,
    Embedded,
    Failed(String),
}

/// Layout facts for one data row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub item_id: String,
    /// 1-based sheet row
    pub row: u32,
    pub height: f64,
    pub photo: PhotoStatus,
}

/// Per-row outcome of a build, for logging and tests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub rows: Vec<RowReport>,
    /// 1-based sheet row of the totals row
    pub totals_row: u32,
}

impl BuildReport {
    pub fn failed_photos(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.photo, PhotoStatus::Failed(_)))
            .count()
    }

    pub fn embedded_photos(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.photo == PhotoStatus::Embedded)
            .count()
    }
}

/// Reusable cell formats for one sheet
struct SheetFormats {
    title: Format,
    label: Format,
    label_total: Format,
    summary: Format,
    summary_money: Format,
    rate_percent: Format,
    rate: Format,
    total_converted: Format,
    total_converted_unit: Format,
    header: Format,
    text: Format,
    link: Format,
    centered: Format,
    money: Format,
    totals: Format,
    totals_money: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let bordered = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::VerticalCenter);

        let label = bordered.clone().set_bold().set_background_color(LABEL_FILL);

        let rate = bordered.clone().set_background_color(RATE_FILL);

        let gold_bold = bordered
            .clone()
            .set_bold()
            .set_font_size(12)
            .set_background_color(GOLD_FILL);

        let header = Format::new()
            .set_bold()
            .set_font_color(0xFFFFFF)
            .set_background_color(HEADER_FILL)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_top(FormatBorder::Medium)
            .set_border_bottom(FormatBorder::Medium);

        let text = bordered.clone().set_text_wrap();

        let centered = bordered.clone().set_align(FormatAlign::Center);

        let totals = centered
            .clone()
            .set_bold()
            .set_font_size(11)
            .set_background_color(GOLD_FILL)
            .set_border_top(FormatBorder::Medium)
            .set_border_bottom(FormatBorder::Medium);

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            label_total: gold_bold.clone(),
            summary_money: bordered.clone().set_num_format(layout::MONEY_FORMAT),
            rate_percent: rate.clone().set_num_format(layout::PERCENT_FORMAT),
            total_converted: gold_bold.clone().set_num_format(layout::MONEY_FORMAT),
            total_converted_unit: bordered.clone().set_background_color(GOLD_FILL),
            link: text
                .clone()
                .set_font_color(LINK_COLOR)
                .set_underline(FormatUnderline::Single),
            money: centered.clone().set_num_format(layout::MONEY_FORMAT),
            totals_money: totals.clone().set_num_format(layout::MONEY_FORMAT),
            summary: bordered,
            label,
            rate,
            header,
            text,
            centered,
            totals,
        }
    }
}

/// Builds the order workbook.
///
/// Holds no state between builds: each call creates its own `Workbook`, so
/// one builder can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct OrderWorkbook {
    order_date: NaiveDate,
}

impl Default for OrderWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderWorkbook {
    /// Builder dated today (UTC)
    pub fn new() -> Self {
        Self {
            order_date: Utc::now().date_naive(),
        }
    }

    pub fn with_order_date(mut self, order_date: NaiveDate) -> Self {
        self.order_date = order_date;
        self
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    /// Build the workbook and return its bytes
    pub fn build(&self, items: &[LineItem], ledger: &Ledger) -> OrderResult<Vec<u8>> {
        self.build_with_report(items, ledger).map(|(bytes, _)| bytes)
    }

    /// Build the workbook, also reporting how each row was laid out
    pub fn build_with_report(
        &self,
        items: &[LineItem],
        ledger: &Ledger,
    ) -> OrderResult<(Vec<u8>, BuildReport)> {
        if items.is_empty() {
            return Err(OrderError::EmptyInput);
        }
        if items.len() != ledger.lines.len() {
            return Err(OrderError::LedgerMismatch {
                items: items.len(),
                lines: ledger.lines.len(),
            });
        }
        ledger.ensure_finite()?;

        let formats = SheetFormats::new();
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(layout::SHEET_NAME)?;

        Self::set_columns(worksheet)?;
        self.write_title_and_summary(worksheet, items, ledger, &formats)?;
        Self::write_header(worksheet, &formats)?;

        let mut rows = Vec::with_capacity(items.len());
        for (index, (item, line)) in items.iter().zip(&ledger.lines).enumerate() {
            rows.push(Self::write_item_row(worksheet, index, item, line, &formats)?);
        }

        let totals_row = layout::totals_row(items.len());
        Self::write_totals(worksheet, items.len(), ledger, &formats)?;

        workbook.define_name(
            layout::COMMISSION_RATE_NAME,
            &cells::sheet_absolute(layout::SHEET_NAME, layout::COMMISSION_RATE_CELL),
        )?;
        workbook.define_name(
            layout::EXCHANGE_RATE_NAME,
            &cells::sheet_absolute(layout::SHEET_NAME, layout::EXCHANGE_RATE_CELL),
        )?;

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| OrderError::Encoding(format!("Failed to save workbook: {e}")))?;

        let report = BuildReport { rows, totals_row };
        debug!(
            items = items.len(),
            photos = report.embedded_photos(),
            failed_photos = report.failed_photos(),
            bytes = bytes.len(),
            "order workbook built"
        );

        Ok((bytes, report))
    }

    fn set_columns(worksheet: &mut Worksheet) -> OrderResult<()> {
        for column in Column::ALL {
            worksheet.set_column_width(column.index(), column.width())?;
        }
        Ok(())
    }

    /// Rows 1–7: title banner and the summary block.
    ///
    /// G2–G4 are written here as plain numbers and overwritten with
    /// references to the totals row once that row exists.
    fn write_title_and_summary(
        &self,
        worksheet: &mut Worksheet,
        items: &[LineItem],
        ledger: &Ledger,
        formats: &SheetFormats,
    ) -> OrderResult<()> {
        let title_row = layout::TITLE_ROW - 1;
        worksheet.merge_range(title_row, 0, title_row, 2, layout::TITLE, &formats.title)?;
        worksheet.set_row_height(title_row, layout::TITLE_HEIGHT)?;

        for row in layout::SUMMARY_FIRST_ROW..=layout::SUMMARY_LAST_ROW {
            let r = row - 1;
            worksheet.set_row_height(r, layout::SUMMARY_HEIGHT)?;
            for col in 0..8u16 {
                worksheet.write_blank(r, col, &formats.summary)?;
            }
        }

        // Left pair: labels merged over A:B, values in C
        for (label, row) in layout::SUMMARY_LEFT {
            worksheet.merge_range(row - 1, 0, row - 1, 1, label, &formats.label)?;
        }
        let (r, c) = Self::position(layout::ORDER_DATE_CELL)?;
        let order_date = self.order_date.format(layout::DATE_FORMAT).to_string();
        worksheet.write_string_with_format(r, c, &order_date, &formats.summary)?;
        let (r, c) = Self::position(layout::ITEM_COUNT_CELL)?;
        worksheet.write_number_with_format(r, c, items.len() as f64, &formats.summary)?;
        let (r, c) = Self::position(layout::TOTAL_QUANTITY_CELL)?;
        worksheet.write_number_with_format(r, c, ledger.total_quantity as f64, &formats.summary)?;
        for row in 5..layout::SUMMARY_LAST_ROW {
            worksheet.write_blank(row - 1, 0, &formats.label)?;
        }

        // Right pair: labels merged over E:F, values in G, units in H
        for (label, row) in layout::SUMMARY_RIGHT {
            let r = row - 1;
            let (label_format, unit_format) = if row == layout::SUMMARY_LAST_ROW {
                (&formats.label_total, &formats.total_converted_unit)
            } else {
                (&formats.label, &formats.summary)
            };
            worksheet.merge_range(r, 4, r, 5, label, label_format)?;
            match layout::summary_unit(row) {
                "" => worksheet.write_blank(r, 7, unit_format)?,
                unit => worksheet.write_string_with_format(r, 7, unit, unit_format)?,
            };
        }

        let money = [
            (layout::TOTAL_PRICE_CELL, ledger.total_price),
            (layout::TOTAL_COMMISSION_CELL, ledger.total_commission),
            (layout::TOTAL_WITH_COMMISSION_CELL, ledger.total_with_commission),
        ];
        for (cell_ref, value) in money {
            let (r, c) = Self::position(cell_ref)?;
            worksheet.write_number_with_format(r, c, value, &formats.summary_money)?;
        }

        let (r, c) = Self::position(layout::COMMISSION_RATE_CELL)?;
        worksheet.write_number_with_format(r, c, ledger.rates.commission_rate, &formats.rate_percent)?;
        let (r, c) = Self::position(layout::EXCHANGE_RATE_CELL)?;
        worksheet.write_number_with_format(r, c, ledger.rates.exchange_rate, &formats.rate)?;

        let converted = Formula::new(format!(
            "={}*{}",
            layout::TOTAL_WITH_COMMISSION_CELL,
            layout::EXCHANGE_RATE_CELL
        ))
        .set_result(ledger.total_converted.to_string());
        let (r, c) = Self::position(layout::TOTAL_CONVERTED_CELL)?;
        worksheet.write_formula_with_format(r, c, converted, &formats.total_converted)?;

        Ok(())
    }

    fn write_header(worksheet: &mut Worksheet, formats: &SheetFormats) -> OrderResult<()> {
        let r = layout::HEADER_ROW - 1;
        for column in Column::ALL {
            worksheet.write_string_with_format(r, column.index(), column.header(), &formats.header)?;
        }
        worksheet.set_row_height(r, layout::HEADER_HEIGHT)?;
        Ok(())
    }

    /// One data row: literal inputs, live formulas with cached results, and
    /// the photo. A photo that cannot be embedded leaves a marker instead.
    fn write_item_row(
        worksheet: &mut Worksheet,
        index: usize,
        item: &LineItem,
        line: &LineTotals,
        formats: &SheetFormats,
    ) -> OrderResult<RowReport> {
        let row = layout::data_row(index);
        let r = row - 1;
        let at = |column: Column| cells::cell(column.index(), row);

        worksheet.write_number_with_format(
            r,
            Column::Number.index(),
            (index + 1) as f64,
            &formats.summary,
        )?;
        worksheet.write_blank(r, Column::Photo.index(), &formats.text)?;
        Self::write_link(worksheet, r, &item.url, formats)?;
        worksheet.write_string_with_format(r, Column::Size.index(), &item.size, &formats.text)?;
        worksheet.write_string_with_format(r, Column::Color.index(), &item.color, &formats.text)?;
        worksheet.write_number_with_format(
            r,
            Column::Quantity.index(),
            f64::from(line.quantity),
            &formats.centered,
        )?;
        worksheet.write_number_with_format(r, Column::Price.index(), line.price, &formats.money)?;

        let derived = [
            (
                Column::LineTotal,
                format!("={}*{}", at(Column::Price), at(Column::Quantity)),
                line.line_total,
            ),
            (
                Column::Commission,
                format!("={}*{}", at(Column::LineTotal), layout::COMMISSION_RATE_NAME),
                line.commission,
            ),
            (
                Column::TotalWithCommission,
                format!("={}+{}", at(Column::LineTotal), at(Column::Commission)),
                line.total_with_commission,
            ),
            (
                Column::TotalConverted,
                format!(
                    "={}*{}",
                    at(Column::TotalWithCommission),
                    layout::EXCHANGE_RATE_NAME
                ),
                line.total_converted,
            ),
        ];
        for (column, formula, result) in derived {
            let formula = Formula::new(formula).set_result(result.to_string());
            worksheet.write_formula_with_format(r, column.index(), formula, &formats.money)?;
        }

        let photo = match item.photo.as_deref() {
            None => PhotoStatus::Absent,
            Some(payload) => match Self::embed_photo(worksheet, r, payload) {
                Ok(()) => PhotoStatus::Embedded,
                Err(e) => {
                    warn!(item = index + 1, id = %item.id, error = %e, "Error adding image");
                    worksheet.write_string_with_format(
                        r,
                        Column::Photo.index(),
                        layout::PHOTO_ERROR_MARKER,
                        &formats.text,
                    )?;
                    PhotoStatus::Failed(e.to_string())
                }
            },
        };

        let height = if photo == PhotoStatus::Embedded {
            layout::PHOTO_ROW_HEIGHT
        } else {
            layout::PLAIN_ROW_HEIGHT
        };
        worksheet.set_row_height(r, height)?;

        Ok(RowReport {
            item_id: item.id.clone(),
            row,
            height,
            photo,
        })
    }

    /// Clickable link, or a blank cell when there is no URL. A URL the
    /// writer refuses (unknown scheme, too long) is kept as plain text.
    fn write_link(
        worksheet: &mut Worksheet,
        r: u32,
        url: &str,
        formats: &SheetFormats,
    ) -> OrderResult<()> {
        let col = Column::Link.index();
        let url = url.trim();
        if url.is_empty() {
            worksheet.write_blank(r, col, &formats.text)?;
            return Ok(());
        }

        let link = Url::new(url).set_text(url).set_tip(layout::LINK_TOOLTIP);
        if let Err(e) = worksheet.write_url_with_format(r, col, link, &formats.link) {
            debug!(url, error = %e, "link written as text");
            worksheet.write_string_with_format(r, col, url, &formats.text)?;
        }
        Ok(())
    }

    fn embed_photo(worksheet: &mut Worksheet, r: u32, payload: &str) -> Result<(), PhotoError> {
        let photo = decode_photo(payload)?;
        let size = f64::from(layout::THUMBNAIL_SIZE);
        let image = Image::new_from_buffer(&photo.bytes)
            .map_err(|e| PhotoError::Image(e.to_string()))?
            .set_scale_to_size(size, size, false)
            .set_alt_text(format!("photo ({})", photo.format.name()));
        worksheet
            .insert_image_with_offset(
                r,
                Column::Photo.index(),
                &image,
                layout::THUMBNAIL_OFFSET,
                layout::THUMBNAIL_OFFSET,
            )
            .map_err(|e| PhotoError::Image(e.to_string()))?;
        Ok(())
    }

    /// Totals row with `SUM` formulas, then point the summary block at it
    fn write_totals(
        worksheet: &mut Worksheet,
        item_count: usize,
        ledger: &Ledger,
        formats: &SheetFormats,
    ) -> OrderResult<()> {
        let row = layout::totals_row(item_count);
        let r = row - 1;
        let first = layout::FIRST_DATA_ROW;
        let last = row - 1;

        for column in Column::ALL {
            let format = if column.is_money() {
                &formats.totals_money
            } else {
                &formats.totals
            };
            worksheet.write_blank(r, column.index(), format)?;
        }
        worksheet.write_string_with_format(
            r,
            Column::Number.index(),
            layout::TOTALS_LABEL,
            &formats.totals,
        )?;

        for column in Column::ALL.into_iter().filter(|c| c.is_summed()) {
            let result = Self::column_total(ledger, column);
            let format = if column.is_money() {
                &formats.totals_money
            } else {
                &formats.totals
            };
            let formula = Formula::new(cells::sum_column(column.index(), first, last))
                .set_result(result.to_string());
            worksheet.write_formula_with_format(r, column.index(), formula, format)?;
        }
        worksheet.set_row_height(r, layout::TOTALS_HEIGHT)?;

        let summary_links = [
            (layout::TOTAL_PRICE_CELL, Column::LineTotal, ledger.total_price),
            (layout::TOTAL_COMMISSION_CELL, Column::Commission, ledger.total_commission),
            (
                layout::TOTAL_WITH_COMMISSION_CELL,
                Column::TotalWithCommission,
                ledger.total_with_commission,
            ),
        ];
        for (target, column, result) in summary_links {
            let formula = Formula::new(format!("={}", cells::cell(column.index(), row)))
                .set_result(result.to_string());
            let (r, c) = Self::position(target)?;
            worksheet.write_formula_with_format(r, c, formula, &formats.summary_money)?;
        }

        Ok(())
    }

    /// Ledger aggregate cached under a summed column
    fn column_total(ledger: &Ledger, column: Column) -> f64 {
        match column {
            Column::Quantity => ledger.total_quantity as f64,
            Column::LineTotal => ledger.total_price,
            Column::Commission => ledger.total_commission,
            Column::TotalWithCommission => ledger.total_with_commission,
            Column::TotalConverted => ledger.total_converted,
            _ => 0.0,
        }
    }

    /// 0-based position of an A1 reference from the layout
    fn position(cell_ref: &str) -> OrderResult<(u32, u16)> {
        cells::position(cell_ref)
            .ok_or_else(|| OrderError::Encoding(format!("invalid cell reference {cell_ref}")))
    }
}
