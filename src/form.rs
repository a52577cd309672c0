// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 查询字符串与表单正文的解码。

use std::collections::HashMap;

use crate::exception::FormError;

/// 解码 `a=1&b=2` 形式的键值对。空白的键值对被跳过，重复的键以最后一次为准。
pub fn parse_urlencoded(text: &str) -> Result<HashMap<String, String>, FormError> {
    let mut fields = HashMap::new();
    if text.trim().is_empty() {
        return Ok(fields);
    }

    for pair in text.split('&') {
        if pair.trim().is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => return Err(FormError::MissingValue(pair.to_string())),
        };
        if key.is_empty() {
            return Err(FormError::EmptyName(pair.to_string()));
        }
        fields.insert(url_decode(key), url_decode(value));
    }
    Ok(fields)
}

/// 解码 `multipart/form-data` 正文，只保留文本字段。
pub fn parse_multipart(
    body: &str,
    content_type: &str,
) -> Result<HashMap<String, String>, FormError> {
    let boundary = parameter(content_type, "boundary").ok_or(FormError::MissingBoundary)?;
    let delimiter = format!("--{}", boundary);

    let mut fields = HashMap::new();
    for part in body.split(delimiter.as_str()) {
        let part = part.trim();
        if part.is_empty() || part == "--" {
            continue;
        }
        let (name, content) = parse_part(part)?;
        fields.insert(name, content);
    }
    Ok(fields)
}

fn parse_part(part: &str) -> Result<(String, String), FormError> {
    let lines: Vec<&str> = part.split('\n').map(|l| l.trim_end_matches('\r')).collect();

    let mut name = None;
    let mut content_start = None;
    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            content_start = Some(index + 1);
            break;
        }
        let is_disposition = line
            .get(..20)
            .map_or(false, |p| p.eq_ignore_ascii_case("Content-Disposition:"));
        if is_disposition {
            name = parameter(line, "name");
        }
    }

    let name = name.filter(|n| !n.is_empty()).ok_or(FormError::MissingFieldName)?;
    let content = match content_start {
        Some(start) if start < lines.len() => lines[start..].join("\n").trim().to_string(),
        _ => String::new(),
    };
    Ok((name, content))
}

/// 从 `; key=value` 形式的标头值中取出参数，去掉两侧引号。
fn parameter(header: &str, key: &str) -> Option<String> {
    header.split(';').find_map(|segment| {
        let (k, v) = segment.trim().split_once('=')?;
        if !k.trim().eq_ignore_ascii_case(key) {
            return None;
        }
        let v = v.trim();
        let v = v
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(v);
        Some(v.to_string())
    })
}

/// 百分号解码，`+` 视为空格。非法的转义序列按原样保留。
pub fn url_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        decoded.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => decoded.push(b'%'),
                }
            }
            b => decoded.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
