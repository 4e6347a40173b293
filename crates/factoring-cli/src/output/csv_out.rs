use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, record_lists, result_of};

/// Write the result as CSV to stdout.
///
/// A result holding a list of records (projection days, invoices, quotes)
/// is written one row per record; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(result) => match record_lists(result).first() {
            Some((_, records)) => write_records(&mut wtr, records),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in flatten(result) {
                    let _ = wtr.write_record([key, val]);
                }
            }
        },
        Value::Array(records) => write_records(&mut wtr, records),
        other => {
            let _ = wtr.write_record([format_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, records: &[Value]) {
    let rows: Vec<Vec<(String, String)>> = records
        .iter()
        .filter_map(Value::as_object)
        .map(flatten)
        .collect();
    let Some(first) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.iter().map(|(k, _)| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k.as_str() == *h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        let _ = wtr.write_record(&cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_written_as_rows() {
        let records = vec![
            json!({ "day": 1, "date": "01-10-2025", "projected_capital": "215.08" }),
            json!({ "day": 2, "date": "02-10-2025", "projected_capital": "215.46" }),
        ];
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_records(&mut wtr, &records);
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,01-10-2025,215.08");
    }
}
