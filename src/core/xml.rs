//! XML → 精簡樹狀結構 (`serde_json::Value`)。
//!
//! 元素轉成物件，子元素以標籤名稱 (含 namespace prefix) 為 key；
//! 同一層重複出現的標籤變成陣列，只出現一次則保持物件。
//! 屬性放在 `_attributes`，去除前後空白的文字放在 `_text`，CDATA 放在 `_cdata`。
//! 註解、處理指令、XML 宣告與 DOCTYPE 一律忽略。

use crate::utils::error::{DatesError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

pub const ATTRIBUTES_KEY: &str = "_attributes";
pub const TEXT_KEY: &str = "_text";
pub const CDATA_KEY: &str = "_cdata";

pub fn xml_to_tree(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root = Map::new();
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let (name, element) = open_element(&e)?;
                ensure_single_root(&stack, &mut seen_root, &name)?;
                stack.push((name, element));
            }
            Event::Empty(e) => {
                let (name, element) = open_element(&e)?;
                ensure_single_root(&stack, &mut seen_root, &name)?;
                match stack.last_mut() {
                    Some((_, parent)) => insert_child(parent, &name, Value::Object(element)),
                    None => insert_child(&mut root, &name, Value::Object(element)),
                }
            }
            Event::End(_) => {
                // quick-xml 已檢查結束標籤與開始標籤相符
                let (name, element) = stack.pop().ok_or_else(|| DatesError::DocumentError {
                    message: format!(
                        "unexpected closing tag at position {}",
                        reader.buffer_position()
                    ),
                })?;
                match stack.last_mut() {
                    Some((_, parent)) => insert_child(parent, &name, Value::Object(element)),
                    None => insert_child(&mut root, &name, Value::Object(element)),
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some((_, element)) => {
                        insert_child(element, TEXT_KEY, Value::String(text.to_string()))
                    }
                    None => {
                        return Err(DatesError::DocumentError {
                            message: format!(
                                "text outside of the root element at position {}",
                                reader.buffer_position()
                            ),
                        })
                    }
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                if let Some((_, element)) = stack.last_mut() {
                    insert_child(element, CDATA_KEY, Value::String(text));
                }
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(DatesError::DocumentError {
            message: format!("unclosed element <{}>", name),
        });
    }

    Ok(Value::Object(root))
}

fn open_element(e: &BytesStart<'_>) -> Result<(String, Map<String, Value>)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Map::new();

    let mut attributes = Map::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, Value::String(value));
    }
    if !attributes.is_empty() {
        element.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
    }

    Ok((name, element))
}

fn ensure_single_root(
    stack: &[(String, Map<String, Value>)],
    seen_root: &mut bool,
    name: &str,
) -> Result<()> {
    if stack.is_empty() {
        if *seen_root {
            return Err(DatesError::DocumentError {
                message: format!("more than one root element (found <{}>)", name),
            });
        }
        *seen_root = true;
    }
    Ok(())
}

/// 同名 key 第二次出現時轉成陣列
fn insert_child(parent: &mut Map<String, Value>, key: &str, value: Value) {
    match parent.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(key.to_string(), value);
        }
    }
}
