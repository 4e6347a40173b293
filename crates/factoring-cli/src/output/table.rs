use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar, record_lists, result_of};

/// Result fields as a two-column table, then one table per record list
/// (invoices, quotes, projection days), then warnings and methodology.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => {
            print_fields(result);
            for (name, records) in record_lists(result) {
                println!("\n{}:", name);
                print_records(records);
            }
        }
        Value::Array(records) => print_records(records),
        other => println!("{}", format_scalar(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_footer(envelope);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let fields = flatten(map);
    if fields.is_empty() {
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_records(records: &[Value]) {
    let rows: Vec<Vec<(String, String)>> = records
        .iter()
        .filter_map(Value::as_object)
        .map(flatten)
        .collect();
    let Some(first) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.iter().map(|(k, _)| k.clone()).collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in &rows {
        builder.push_record(headers.iter().map(|h| {
            row.iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
