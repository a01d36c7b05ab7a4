//! Parse channel and business exports into records.

use super::schema::{BusinessRecord, Channel, ChannelRecord, LoadedData, RawTable, SourceTables};
use super::table::{Row, TableHeaders};
use crate::utils::config::{
    ATTRIBUTED_REVENUE_COLUMNS, CAMPAIGN_COLUMNS, CLICK_COLUMNS, COGS_COLUMNS, DATE_COLUMNS,
    GROSS_PROFIT_COLUMNS, IMPRESSION_COLUMNS, NEW_CUSTOMER_COLUMNS, NEW_ORDER_COLUMNS,
    ORDER_COLUMNS, SPEND_COLUMNS, STATE_COLUMNS, TACTIC_COLUMNS, TOTAL_REVENUE_COLUMNS,
};
use crate::utils::error::LoadError;
use crate::utils::warning::{DataQualityWarning, PipelineWarning};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Load all four source tables
///
/// **Public** - loader stage entry point
///
/// # Arguments
/// * `sources` - Raw channel and business tables
///
/// # Returns
/// Channel and business records plus any data-quality warnings
///
/// # Errors
/// * `LoadError::DataFormat` - a required column is missing, the business
///   table has no rows, or no channel table has any
/// * `LoadError::Parse` - a cell cannot be converted
/// * `LoadError::Csv` - the CSV itself is malformed
pub fn load_sources(sources: &SourceTables) -> Result<LoadedData, LoadError> {
    let mut loaded = LoadedData::default();

    for (channel, table) in sources.channel_tables() {
        let records = load_channel_table(channel, table, &mut loaded.warnings)?;
        debug!("Loaded {} {} rows from {}", records.len(), channel, table.name);
        loaded.channel_records.extend(records);
    }

    if loaded.channel_records.is_empty() {
        let names: Vec<&str> = sources
            .channel_tables()
            .into_iter()
            .map(|(_, table)| table.name.as_str())
            .collect();
        return Err(LoadError::DataFormat {
            file: names.join(", "),
            detail: "no data rows in any channel table".to_string(),
        });
    }

    loaded.business_records = load_business_table(&sources.business, &mut loaded.warnings)?;

    info!(
        "Loaded {} channel rows and {} business days",
        loaded.channel_records.len(),
        loaded.business_records.len()
    );

    Ok(loaded)
}

/// Parse one channel export
///
/// **Public** - every row is attributed to `channel`
pub fn load_channel_table(
    channel: Channel,
    table: &RawTable,
    warnings: &mut Vec<PipelineWarning>,
) -> Result<Vec<ChannelRecord>, LoadError> {
    let (headers, rows) = read_table(table)?;

    let date = headers.require(DATE_COLUMNS)?;
    let campaign = headers.require(CAMPAIGN_COLUMNS)?;
    let spend = headers.require(SPEND_COLUMNS)?;
    let impressions = headers.require(IMPRESSION_COLUMNS)?;
    let clicks = headers.require(CLICK_COLUMNS)?;
    let attributed = headers.require(ATTRIBUTED_REVENUE_COLUMNS)?;
    let tactic = headers.find(TACTIC_COLUMNS);
    let state = headers.find(STATE_COLUMNS);

    let mut records = Vec::with_capacity(rows.len());

    for (line, record) in &rows {
        let row = Row {
            file: &table.name,
            line: *line,
            record,
        };

        let parsed = ChannelRecord {
            date: row.date(&date)?,
            channel,
            campaign_id: row.label(&campaign)?,
            spend: row.number(&spend)?,
            impressions: row.count(&impressions)?,
            clicks: row.count(&clicks)?,
            attributed_revenue: row.number(&attributed)?,
            tactic: row.optional_label(tactic.as_ref()),
            state: row.optional_label(state.as_ref()),
        };

        check_non_negative(&row, &spend.name, parsed.spend, warnings);
        check_non_negative(&row, &attributed.name, parsed.attributed_revenue, warnings);

        records.push(parsed);
    }

    Ok(records)
}

/// Parse the business export
///
/// **Public** - duplicate dates keep the first row and raise a warning
pub fn load_business_table(
    table: &RawTable,
    warnings: &mut Vec<PipelineWarning>,
) -> Result<Vec<BusinessRecord>, LoadError> {
    let (headers, rows) = read_table(table)?;

    let date = headers.require(DATE_COLUMNS)?;
    let total_revenue = headers.require(TOTAL_REVENUE_COLUMNS)?;
    let orders = headers.find(ORDER_COLUMNS);
    let new_orders = headers.find(NEW_ORDER_COLUMNS);
    let new_customers = headers.find(NEW_CUSTOMER_COLUMNS);
    let gross_profit = headers.find(GROSS_PROFIT_COLUMNS);
    let cogs = headers.find(COGS_COLUMNS);

    if rows.is_empty() {
        return Err(LoadError::DataFormat {
            file: table.name.clone(),
            detail: "no data rows".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (line, record) in &rows {
        let row = Row {
            file: &table.name,
            line: *line,
            record,
        };

        let parsed = BusinessRecord {
            date: row.date(&date)?,
            total_revenue: row.number(&total_revenue)?,
            total_orders: row.optional_count(orders.as_ref())?.unwrap_or(0),
            new_customers: row.optional_count(new_customers.as_ref())?.unwrap_or(0),
            new_orders: row.optional_count(new_orders.as_ref())?,
            gross_profit: row.optional_number(gross_profit.as_ref())?,
            cogs: row.optional_number(cogs.as_ref())?,
        };

        if !seen.insert(parsed.date) {
            let warning = DataQualityWarning::DuplicateBusinessDate {
                file: table.name.clone(),
                date: parsed.date,
                line: *line,
            };
            warn!("{}", PipelineWarning::from(warning.clone()));
            warnings.push(warning.into());
            continue;
        }

        check_non_negative(&row, &total_revenue.name, parsed.total_revenue, warnings);

        records.push(parsed);
    }

    Ok(records)
}

/// Read headers and rows, keeping each row's line number
///
/// **Private** - shared by both table loaders
fn read_table(table: &RawTable) -> Result<(TableHeaders, Vec<(u64, StringRecord)>), LoadError> {
    let csv_error = |source| LoadError::Csv {
        file: table.name.clone(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(table.content.as_bytes());

    let headers = TableHeaders::new(&table.name, reader.headers().map_err(csv_error)?);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;

        // Blank trailing lines in hand-edited exports
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push((line, record));
    }

    debug!("Read {} data rows from {}", rows.len(), table.name);

    Ok((headers, rows))
}

/// Record a warning when a money column is negative
///
/// **Private** - helper for the table loaders
fn check_non_negative(row: &Row<'_>, column: &str, value: f64, warnings: &mut Vec<PipelineWarning>) {
    if value >= 0.0 {
        return;
    }

    let warning = DataQualityWarning::NegativeValue {
        file: row.file.to_string(),
        column: column.to_string(),
        line: row.line,
        value,
    };
    warn!("{}", PipelineWarning::from(warning.clone()));
    warnings.push(warning.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FACEBOOK_CSV: &str = "\
date,tactic,state,campaign,impression,clicks,spend,attributed revenue
2025-05-16,ASC,NY,Prospecting,1000,50,100.0,300.0
2025-05-16,ASC,CA,Retargeting,500,20,\"$1,050.25\",40
";

    const BUSINESS_CSV: &str = "\
date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS
2025-05-16,120,40,35,1000,400,600
2025-05-17,80,20,18,900,350,550
";

    #[test]
    fn test_load_channel_table() {
        let table = RawTable::from_text("Facebook.csv", FACEBOOK_CSV);
        let mut warnings = Vec::new();
        let records = load_channel_table(Channel::Facebook, &table, &mut warnings).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 5, 16).unwrap());
        assert_eq!(records[0].channel, Channel::Facebook);
        assert_eq!(records[0].campaign_id, "Prospecting");
        assert_eq!(records[0].impressions, 1000);
        assert_eq!(records[0].attributed_revenue, 300.0);
        assert_eq!(records[0].tactic.as_deref(), Some("ASC"));
        assert_eq!(records[1].spend, 1050.25);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_business_table() {
        let table = RawTable::from_text("Business.csv", BUSINESS_CSV);
        let mut warnings = Vec::new();
        let records = load_business_table(&table, &mut warnings).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total_revenue, 1000.0);
        assert_eq!(records[0].total_orders, 120);
        assert_eq!(records[0].new_orders, Some(40));
        assert_eq!(records[0].new_customers, 35);
        assert_eq!(records[1].gross_profit, Some(350.0));
        assert_eq!(records[1].cogs, Some(550.0));
    }

    #[test]
    fn test_business_optional_columns_default() {
        let table = RawTable::from_text("Business.csv", "date,total_revenue\n2025-05-16,10\n");
        let records = load_business_table(&table, &mut Vec::new()).unwrap();

        assert_eq!(records[0].total_orders, 0);
        assert_eq!(records[0].new_customers, 0);
        assert_eq!(records[0].gross_profit, None);
    }

    #[test]
    fn test_missing_column_is_data_format_error() {
        let table = RawTable::from_text("Google.csv", "date,campaign,spend,clicks\n");
        let err = load_channel_table(Channel::Google, &table, &mut Vec::new()).unwrap_err();

        match err {
            LoadError::DataFormat { file, detail } => {
                assert_eq!(file, "Google.csv");
                assert!(detail.contains("impressions"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_reports_line_and_column() {
        let csv = "date,campaign,impressions,clicks,spend,attributed_revenue\n\
                   2025-05-16,A,10,1,5,5\n\
                   2025-05-17,A,10,1,lots,5\n";
        let table = RawTable::from_text("TikTok.csv", csv);
        let err = load_channel_table(Channel::TikTok, &table, &mut Vec::new()).unwrap_err();

        match err {
            LoadError::Parse { file, column, line, value, .. } => {
                assert_eq!(file, "TikTok.csv");
                assert_eq!(column, "spend");
                assert_eq!(line, 3);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let table = RawTable::from_text("Business.csv", "date,total_revenue\nnot-a-date,10\n");
        let err = load_business_table(&table, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_duplicate_business_date_keeps_first() {
        let csv = "date,total_revenue\n2025-05-16,10\n2025-05-16,99\n";
        let table = RawTable::from_text("Business.csv", csv);
        let mut warnings = Vec::new();
        let records = load_business_table(&table, &mut warnings).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_revenue, 10.0);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            PipelineWarning::DataQuality(DataQualityWarning::DuplicateBusinessDate { line: 3, .. })
        ));
    }

    #[test]
    fn test_negative_spend_warns() {
        let csv = "date,campaign,impressions,clicks,spend,attributed_revenue\n2025-05-16,A,10,1,-5,0\n";
        let table = RawTable::from_text("Facebook.csv", csv);
        let mut warnings = Vec::new();
        let records = load_channel_table(Channel::Facebook, &table, &mut warnings).unwrap();

        assert_eq!(records[0].spend, -5.0);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_header_only_business_table_is_rejected() {
        let table = RawTable::from_text("Business.csv", "date,total_revenue\n\n");
        let err = load_business_table(&table, &mut Vec::new()).unwrap_err();

        match err {
            LoadError::DataFormat { file, detail } => {
                assert_eq!(file, "Business.csv");
                assert!(detail.contains("no data rows"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_empty_channel_table_is_allowed() {
        let header = "date,campaign,impressions,clicks,spend,attributed_revenue\n";
        let sources = SourceTables {
            facebook: RawTable::from_text("Facebook.csv", format!("{header}2025-05-16,A,10,1,5,5\n")),
            google: RawTable::from_text("Google.csv", header),
            tiktok: RawTable::from_text("TikTok.csv", header),
            business: RawTable::from_text("Business.csv", BUSINESS_CSV),
        };

        let loaded = load_sources(&sources).unwrap();
        assert_eq!(loaded.channel_records.len(), 1);

        let empty = SourceTables {
            facebook: RawTable::from_text("Facebook.csv", header),
            ..sources
        };
        let err = load_sources(&empty).unwrap_err();
        assert!(matches!(err, LoadError::DataFormat { ref file, .. } if file.contains("TikTok.csv")));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let csv = "date,total_revenue\n2025-05-16,10\n,\n";
        let table = RawTable::from_text("Business.csv", csv);
        let records = load_business_table(&table, &mut Vec::new()).unwrap();
        assert_eq!(records.len(), 1);
    }
}
