use crate::core::timestamp::parse_timestamp;
use crate::core::xml::TEXT_KEY;
use crate::domain::model::{AvailableDates, Timestamp};
use serde_json::Value;

/// 依點分隔路徑取值 (例如 `Name._text`)；數字段落可索引陣列。
/// 任何一段不存在時回傳 `None`，不會失敗。
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

/// 把單一節點或陣列統一成節點列表；不存在或 `null` 視為空列表
pub fn as_node_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// 將伺服器回傳的圖層整理成 `{ layer_id: [timestamps] }`。
///
/// 日期欄位可能是逗號分隔字串、字串陣列、或帶 `_text` 的節點 (單一或陣列)。
/// 沒有 id 的圖層會被略過；同一個 id 出現多次時時間點取聯集。
pub fn format_capabilities_info(
    raw_layers: &[&Value],
    layer_id_path: &str,
    dates_path: &str,
) -> AvailableDates {
    raw_layers
        .iter()
        .filter_map(|layer| {
            let Some(layer_id) = lookup_path(layer, layer_id_path).and_then(Value::as_str) else {
                tracing::debug!("Skipping layer without id at '{}'", layer_id_path);
                return None;
            };

            let dates = extract_dates(lookup_path(layer, dates_path));
            Some((layer_id.to_string(), dates))
        })
        .collect()
}

fn extract_dates(raw_dates: Option<&Value>) -> Vec<Timestamp> {
    let entries: Vec<&str> = match raw_dates {
        Some(Value::String(joined)) => joined.split(',').collect(),
        other => as_node_list(other)
            .into_iter()
            .filter_map(date_text)
            .collect(),
    };

    entries
        .into_iter()
        .filter(|entry| !entry.is_empty())
        .map(parse_timestamp)
        .collect()
}

fn date_text(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(text) => Some(text),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
        _ => None,
    }
}
