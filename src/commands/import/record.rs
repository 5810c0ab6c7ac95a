use crate::model::LineItem;

// BadItem is an `item` line with missing fields or an unparseable quantity;
// the grouper drops it without ending the current order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RawRecord {
    Order { date_key: String },
    Item(LineItem),
    BadItem,
    Unrecognized,
}

pub(super) fn parse_record(line: &str) -> RawRecord {
    let fields: Vec<&str> = line.split(',').collect();
    let kind = fields[0];

    if kind.eq_ignore_ascii_case("order") {
        let Some(date_key) = fields.get(1) else {
            return RawRecord::Unrecognized;
        };
        return RawRecord::Order {
            date_key: (*date_key).to_string(),
        };
    }

    if kind.eq_ignore_ascii_case("item") {
        let (Some(quantity_field), Some(description)) = (fields.get(1), fields.get(2)) else {
            return RawRecord::BadItem;
        };
        let Ok(quantity) = quantity_field.parse::<i64>() else {
            return RawRecord::BadItem;
        };
        return RawRecord::Item(LineItem {
            description: (*description).to_string(),
            quantity,
        });
    }

    RawRecord::Unrecognized
}
