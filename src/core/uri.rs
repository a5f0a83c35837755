use crate::utils::error::Result;
use std::fmt;
use url::Url;

/// 額外查詢參數的值
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Bool(bool),
    Number(f64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => write!(f, "{}", s),
            QueryValue::Bool(b) => write!(f, "{}", b),
            // 超過 2^53 的整數已無法精確表示，交給 f64 的 Display
            QueryValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.007e15 => {
                write!(f, "{}", *n as i64)
            }
            QueryValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Number(value as f64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Number(value)
    }
}

/// 將 `extra` 合併進 `server_uri` 既有的查詢參數後重新組出 URI，
/// 回傳 decodeURI 之後的字串。
///
/// 同名參數以 `extra` 為準並保留原本的位置，新參數附加在最後。
pub fn format_server_uri(server_uri: &str, extra: &[(&str, QueryValue)]) -> Result<String> {
    let mut url = Url::parse(server_uri)?;

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in extra {
        let value = value.to_string();
        match query.iter().position(|(k, _)| k.as_str() == *key) {
            Some(index) => {
                query[index].1 = value;
                let mut seen = 0;
                query.retain(|(k, _)| {
                    if k.as_str() != *key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => query.push((key.to_string(), value)),
        }
    }

    if query.is_empty() {
        url.set_query(None);
    } else {
        let serialized = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&serialized));
    }

    Ok(decode_uri(url.as_str()))
}

// decodeURI 不會還原的保留字元
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// 還原 percent-encoding，但保留 URI 保留字元的跳脫。
/// 無效的跳脫序列或解碼後不是合法 UTF-8 時原樣保留。
pub fn decode_uri(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = hex_byte(bytes, i + 1) {
                if byte < 0x80 {
                    if RESERVED.contains(&byte) {
                        out.extend_from_slice(&bytes[i..i + 3]);
                    } else {
                        out.push(byte);
                    }
                    i += 3;
                    continue;
                }

                // 多位元組 UTF-8 序列
                let width = utf8_width(byte);
                let mut seq = vec![byte];
                for n in 1..width {
                    let at = i + n * 3;
                    match (bytes.get(at), hex_byte(bytes, at + 1)) {
                        (Some(b'%'), Some(b)) => seq.push(b),
                        _ => break,
                    }
                }
                if seq.len() == width && std::str::from_utf8(&seq).is_ok() {
                    out.extend_from_slice(&seq);
                    i += width * 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

fn hex_byte(bytes: &[u8], at: usize) -> Option<u8> {
    let hi = (*bytes.get(at)? as char).to_digit(16)?;
    let lo = (*bytes.get(at + 1)? as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}
