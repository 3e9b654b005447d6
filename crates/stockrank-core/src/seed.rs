//! Built-in sample dataset for exercising the ranking pass without a data feed.
//!
//! Approximate figures for large US companies across sectors, including the
//! financial, energy and utility names that composite scoring leaves out.

use crate::domain::{MetricValues, SnapshotDate};
use crate::ingest::{import_rows, ImportReport, ImportRow};
use crate::store::SnapshotStore;
use crate::CoreError;

// ask, market_cap, ebitda, pe_ttm, pe_ftm, peg, roa %, roe %, dividend_yield %, book_value
type SampleCompany = (&'static str, &'static str, &'static str, &'static str, [f64; 10]);

const SAMPLE: [SampleCompany; 46] = [
    ("AAPL", "Apple Inc.", "Technology", "Consumer Electronics", [232.0, 3520.0e9, 134.0e9, 38.5, 33.2, 2.1, 30.5, 160.0, 0.44, 4.38]),
    ("MSFT", "Microsoft Corp.", "Technology", "Software—Infrastructure", [420.0, 3120.0e9, 125.0e9, 35.8, 30.5, 2.3, 21.5, 38.0, 0.72, 36.12]),
    ("GOOGL", "Alphabet Inc.", "Communication Services", "Internet Content & Information", [175.0, 2150.0e9, 112.0e9, 23.5, 20.8, 1.1, 16.2, 30.5, 0.45, 24.5]),
    ("AMZN", "Amazon.com Inc.", "Consumer Cyclical", "Internet Retail", [215.0, 2200.0e9, 92.0e9, 42.0, 32.5, 1.8, 8.5, 22.5, 0.0, 22.1]),
    ("META", "Meta Platforms Inc.", "Communication Services", "Internet Content & Information", [580.0, 1480.0e9, 72.0e9, 26.2, 22.0, 1.0, 18.5, 35.0, 0.35, 64.5]),
    ("NVDA", "NVIDIA Corp.", "Technology", "Semiconductors", [130.0, 3200.0e9, 78.0e9, 55.0, 32.0, 1.2, 55.0, 120.0, 0.03, 2.74]),
    ("AVGO", "Broadcom Inc.", "Technology", "Semiconductors", [220.0, 1020.0e9, 22.0e9, 95.0, 30.0, 1.6, 10.2, 25.0, 1.15, 12.3]),
    ("INTC", "Intel Corp.", "Technology", "Semiconductors", [22.0, 95.0e9, 5.0e9, 0.0, 25.0, 3.5, -1.5, -3.0, 0.0, 24.5]),
    ("CSCO", "Cisco Systems Inc.", "Technology", "Communication Equipment", [58.0, 232.0e9, 17.0e9, 24.0, 15.0, 2.5, 10.5, 28.0, 2.75, 11.2]),
    ("QCOM", "Qualcomm Inc.", "Technology", "Semiconductors", [165.0, 183.0e9, 12.0e9, 16.5, 14.0, 1.2, 18.0, 42.0, 1.95, 15.7]),
    ("UNH", "UnitedHealth Group", "Healthcare", "Healthcare Plans", [520.0, 475.0e9, 30.0e9, 18.0, 16.0, 1.5, 8.5, 25.0, 1.45, 88.5]),
    ("JNJ", "Johnson & Johnson", "Healthcare", "Drug Manufacturers", [152.0, 365.0e9, 28.0e9, 22.0, 15.0, 2.8, 8.0, 20.0, 3.25, 28.4]),
    ("LLY", "Eli Lilly & Co.", "Healthcare", "Drug Manufacturers", [800.0, 760.0e9, 12.0e9, 85.0, 38.0, 1.5, 15.0, 55.0, 0.65, 18.5]),
    ("MRK", "Merck & Co.", "Healthcare", "Drug Manufacturers", [100.0, 252.0e9, 18.0e9, 16.0, 12.0, 1.5, 12.0, 35.0, 2.85, 12.8]),
    ("PFE", "Pfizer Inc.", "Healthcare", "Drug Manufacturers", [26.0, 147.0e9, 12.0e9, 18.0, 10.5, 1.5, 3.5, 8.0, 6.5, 12.5]),
    ("JPM", "JPMorgan Chase", "Financial Services", "Banks", [245.0, 700.0e9, 0.0, 13.0, 12.0, 1.5, 1.2, 16.0, 2.0, 110.5]),
    ("V", "Visa Inc.", "Financial Services", "Credit Services", [310.0, 580.0e9, 22.0e9, 32.0, 28.0, 1.8, 18.0, 48.0, 0.72, 20.4]),
    ("MA", "Mastercard Inc.", "Financial Services", "Credit Services", [520.0, 470.0e9, 15.0e9, 36.0, 30.0, 1.9, 25.0, 170.0, 0.55, 8.5]),
    ("BAC", "Bank of America", "Financial Services", "Banks", [44.0, 340.0e9, 0.0, 14.0, 12.0, 1.2, 0.9, 10.0, 2.3, 34.8]),
    ("GS", "Goldman Sachs", "Financial Services", "Capital Markets", [580.0, 180.0e9, 0.0, 15.0, 13.0, 0.9, 1.0, 12.0, 2.1, 325.0]),
    ("AXP", "American Express", "Financial Services", "Credit Services", [285.0, 200.0e9, 0.0, 20.0, 17.0, 1.3, 3.5, 32.0, 1.0, 32.8]),
    ("WMT", "Walmart Inc.", "Consumer Defensive", "Discount Stores", [90.0, 720.0e9, 35.0e9, 38.0, 30.0, 3.5, 7.0, 20.0, 0.95, 22.8]),
    ("PG", "Procter & Gamble", "Consumer Defensive", "Household Products", [165.0, 390.0e9, 22.0e9, 28.0, 24.0, 3.5, 12.0, 30.0, 2.35, 18.5]),
    ("KO", "Coca-Cola Co.", "Consumer Defensive", "Beverages", [62.0, 265.0e9, 15.0e9, 25.0, 22.0, 3.0, 10.0, 40.0, 2.8, 6.2]),
    ("COST", "Costco Wholesale", "Consumer Defensive", "Discount Stores", [920.0, 405.0e9, 12.0e9, 52.0, 45.0, 4.5, 12.0, 30.0, 0.5, 55.2]),
    ("MCD", "McDonald's Corp.", "Consumer Cyclical", "Restaurants", [290.0, 210.0e9, 14.0e9, 25.0, 23.0, 2.5, 15.0, 0.0, 2.25, -8.5]),
    ("CAT", "Caterpillar Inc.", "Industrials", "Farm & Heavy Construction", [350.0, 168.0e9, 16.0e9, 16.0, 16.5, 1.8, 12.0, 55.0, 1.55, 28.5]),
    ("DE", "Deere & Company", "Industrials", "Farm & Heavy Construction", [440.0, 122.0e9, 14.0e9, 15.5, 18.0, 2.0, 10.0, 35.0, 1.35, 45.2]),
    ("BA", "Boeing Co.", "Industrials", "Aerospace & Defense", [175.0, 130.0e9, 0.0, 0.0, 0.0, 0.0, -5.0, 0.0, 0.0, -25.4]),
    ("UPS", "United Parcel Service", "Industrials", "Integrated Freight", [120.0, 100.0e9, 12.0e9, 18.0, 16.0, 2.0, 12.0, 30.0, 4.8, 12.3]),
    ("XOM", "Exxon Mobil Corp.", "Energy", "Oil & Gas", [108.0, 472.0e9, 65.0e9, 14.0, 13.0, 2.5, 10.0, 18.0, 3.35, 48.5]),
    ("CVX", "Chevron Corp.", "Energy", "Oil & Gas", [152.0, 275.0e9, 45.0e9, 14.5, 13.5, 2.8, 8.0, 14.0, 4.2, 88.5]),
    ("COP", "ConocoPhillips", "Energy", "Oil & Gas", [100.0, 128.0e9, 22.0e9, 12.0, 11.5, 1.5, 8.5, 18.0, 2.85, 38.2]),
    ("EOG", "EOG Resources", "Energy", "Oil & Gas", [125.0, 72.0e9, 10.0e9, 10.0, 10.5, 0.9, 12.0, 22.0, 2.8, 42.5]),
    ("LIN", "Linde PLC", "Basic Materials", "Specialty Chemicals", [440.0, 210.0e9, 12.0e9, 32.0, 28.0, 2.5, 6.0, 15.0, 1.2, 85.0]),
    ("NUE", "Nucor Corp.", "Basic Materials", "Steel", [135.0, 32.0e9, 5.5e9, 12.0, 14.0, 1.2, 10.0, 18.0, 1.35, 62.5]),
    ("NEE", "NextEra Energy", "Utilities", "Utilities—Regulated Electric", [75.0, 152.0e9, 12.0e9, 22.0, 20.0, 2.5, 3.5, 10.0, 2.75, 22.5]),
    ("DUK", "Duke Energy", "Utilities", "Utilities—Regulated Electric", [108.0, 83.0e9, 12.0e9, 18.0, 17.0, 3.0, 2.5, 8.0, 3.65, 62.5]),
    ("SO", "Southern Co.", "Utilities", "Utilities—Regulated Electric", [85.0, 92.0e9, 10.0e9, 20.0, 18.0, 2.8, 3.0, 12.0, 3.25, 28.5]),
    ("DIS", "Walt Disney Co.", "Communication Services", "Entertainment", [110.0, 200.0e9, 14.0e9, 38.0, 22.0, 1.5, 4.5, 8.0, 0.82, 52.8]),
    ("NFLX", "Netflix Inc.", "Communication Services", "Entertainment", [1000.0, 430.0e9, 10.0e9, 48.0, 35.0, 1.5, 15.0, 32.0, 0.0, 25.8]),
    ("T", "AT&T Inc.", "Communication Services", "Telecom", [25.0, 178.0e9, 42.0e9, 16.0, 10.0, 2.5, 4.0, 12.0, 4.05, 12.5]),
    ("VZ", "Verizon Communications", "Communication Services", "Telecom", [42.0, 177.0e9, 48.0e9, 10.0, 9.0, 2.5, 5.0, 18.0, 6.2, 22.8]),
    ("HD", "Home Depot Inc.", "Consumer Cyclical", "Home Improvement Retail", [380.0, 378.0e9, 24.0e9, 25.0, 23.0, 2.0, 30.0, 0.0, 2.35, -2.5]),
    ("PLD", "Prologis Inc.", "Real Estate", "REIT—Industrial", [108.0, 100.0e9, 5.5e9, 38.0, 35.0, 3.5, 3.0, 6.0, 3.15, 52.5]),
    ("O", "Realty Income Corp.", "Real Estate", "REIT—Retail", [55.0, 48.0e9, 3.5e9, 52.0, 42.0, 3.5, 2.5, 4.0, 5.55, 28.5]),
];

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

fn non_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

/// Sample rows without a date, so they land on whatever date the caller picks.
pub fn sample_rows() -> Vec<ImportRow> {
    SAMPLE
        .iter()
        .map(|&(symbol, name, sector, industry, figures)| {
            let [ask, market_cap, ebitda, pe_ttm, pe_ftm, peg, roa, roe, dividend_yield, book_value] =
                figures;
            ImportRow {
                symbol: symbol.to_owned(),
                name: Some(name.to_owned()),
                sector: Some(sector.to_owned()),
                industry: Some(industry.to_owned()),
                date: None,
                metrics: MetricValues {
                    ask: Some(ask),
                    market_cap: Some(market_cap),
                    book_value: Some(book_value),
                    ebitda: positive(ebitda),
                    pe_ratio_ttm: positive(pe_ttm),
                    pe_ratio_ftm: positive(pe_ftm),
                    peg_ratio: positive(peg),
                    return_on_assets: non_zero(roa),
                    return_on_equity: non_zero(roe),
                    dividend_yield: positive(dividend_yield),
                    ..MetricValues::default()
                },
            }
        })
        .collect()
}

/// Import the sample dataset on `date`.
pub fn seed<S: SnapshotStore>(store: &S, date: SnapshotDate) -> Result<ImportReport, CoreError> {
    import_rows(store, sample_rows(), date)
}
