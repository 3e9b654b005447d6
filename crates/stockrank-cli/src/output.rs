use serde_json::Value;
use stockrank_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

type Columns = [(&'static str, &'static str)];

const ENTRY_COLUMNS: [(&str, &str); 9] = [
    ("rank", "RANK"),
    ("symbol", "SYMBOL"),
    ("name", "NAME"),
    ("score", "SCORE"),
    ("pe_ratio_ttm", "P/E TTM"),
    ("pe_ratio_ftm", "P/E FTM"),
    ("peg_ratio", "PEG"),
    ("garp_ratio", "GARP"),
    ("return_on_assets", "ROA"),
];

const COMPANY_COLUMNS: [(&str, &str); 4] = [
    ("symbol", "SYMBOL"),
    ("name", "NAME"),
    ("sector", "SECTOR"),
    ("industry", "INDUSTRY"),
];

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("command     : {}", envelope.meta.command);
    println!("schema      : {}", envelope.meta.schema_version);
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    let listing = [("entries", &ENTRY_COLUMNS[..]), ("companies", &COMPANY_COLUMNS[..])]
        .into_iter()
        .find_map(|(key, columns)| {
            envelope
                .data
                .get(key)
                .and_then(Value::as_array)
                .map(|rows| (rows, columns))
        });
    match listing {
        Some((rows, columns)) => {
            for line in table_lines(rows, columns) {
                println!("{line}");
            }
        }
        None => {
            println!("data:");
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                println!("  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

/// Header plus one aligned line per row.
fn table_lines(entries: &[Value], columns: &Columns) -> Vec<String> {
    let rows = entries
        .iter()
        .map(|entry| {
            columns
                .iter()
                .map(|(key, _)| cell(entry.get(*key)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(index, (_, header))| {
            rows.iter()
                .map(|row| row[index].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let header = columns
        .iter()
        .zip(&widths)
        .map(|((_, header), &width)| format!("{header:<width$}"))
        .collect::<Vec<_>>();
    let mut lines = vec![header.join("  ").trim_end().to_owned()];

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>();
        lines.push(line.join("  ").trim_end().to_owned());
    }
    lines
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::from("-"),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(float) if number.is_f64() => format!("{float:.2}"),
            _ => number.to_string(),
        },
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
