use serde_json::{Map, Value};

use super::{format_scalar, result_of};

/// Headline figure of each calculation, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "floored_disbursement",
    "found_advance_rate",
    "final_balance",
    "corrected_commission_total",
    "target_amount",
    "net_disbursement_theoretical",
];

/// Print just the key answer value from the output.
///
/// Priority keys are looked up in the result and its nested objects.
/// A result that is a list of records (quotes) prints one line per record.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(val) = find_priority(map) {
            println!("{}", format_scalar(val));
            return;
        }
        if let Some(Value::Array(records)) = map.get("quotes") {
            for record in records {
                print_record_line(record);
            }
            return;
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}

fn print_record_line(record: &Value) {
    let Value::Object(map) = record else {
        println!("{}", format_scalar(record));
        return;
    };
    let label = map
        .get("invoice_number")
        .map(format_scalar)
        .unwrap_or_default();
    let target = lookup_nested(map, "target_amount").map(format_scalar).unwrap_or_default();
    let rate = lookup_nested(map, "found_advance_rate").map(format_scalar).unwrap_or_default();
    println!("{}: {} @ {}", label, target, rate);
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS.iter().find_map(|key| lookup_nested(map, key))
}

fn lookup_nested<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
        return Some(val);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|inner| lookup_nested(inner, key))
}
