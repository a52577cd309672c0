// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 该模块负责将从 TCP 流中读取的原始文本解析为结构化的 `Request`。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、目标、协议）。
//! 2. 标头（Headers）的逐行解析与校验。
//! 3. 空行之后的正文（Body）提取。
//!
//! 解析要么完全成功，要么返回 [`ParseError`]，不会产生部分填充的对象。

use std::collections::HashMap;

use log::debug;

use crate::{
    exception::{FormError, ParseError},
    form,
    header::Headers,
};

/// 表示一个完整解析的 HTTP 请求。构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP 请求方法，保持收到时的大小写
    method: String,
    /// 原始请求目标（路径加可选的查询字符串）
    target: String,
    /// 协议字段，例如 `HTTP/1.1`
    protocol: String,
    headers: Headers,
    /// 正文；空白正文视为不存在
    body: Option<String>,
}

impl Request {
    /// 从原始字节缓冲区构建 `Request`。
    ///
    /// 字节按 UTF-8 解码，非法序列会被替换为 U+FFFD 而不是报错。
    ///
    /// # 参数
    /// * `buffer` - 从网络 Socket 读取的原始数据。
    /// * `id` - 连接 ID，用于在多任务环境下追踪日志。
    pub fn try_from(buffer: &[u8], id: u128) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(buffer);
        let result = Self::parse(&text);
        match &result {
            Ok(request) => debug!(
                "[ID{}]请求行: {} {} {}，标头数: {}",
                id,
                request.method,
                request.target,
                request.protocol,
                request.headers.len()
            ),
            Err(e) => debug!("[ID{}]请求解析失败: {}", id, e),
        }
        result
    }

    /// 将请求文本解析为 `Request`。
    ///
    /// # 逻辑步骤
    /// 1. 拒绝空输入或仅含空白的输入。
    /// 2. 以 `\r\n`、`\n`、`\r` 任意一种作为行分隔符切分。
    /// 3. 第一行作为请求行，必须恰好包含三个字段。
    /// 4. 之后的行作为标头，直到第一个空行或输入结束。
    /// 5. 空行之后的所有行以 `\n` 连接作为正文。
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let lines = split_lines(text);
        let (method, target, protocol) = parse_request_line(lines[0])?;

        let mut headers = Headers::new();
        let mut body_start = None;
        for (index, line) in lines.iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                body_start = Some(index + 1);
                break;
            }
            let (name, value) = parse_header_line(line)?;
            headers.insert(name, value);
        }

        let body = body_start.and_then(|start| parse_body(&lines[start..]));

        Ok(Self {
            method: method.to_string(),
            target: target.to_string(),
            protocol: protocol.to_string(),
            headers,
            body,
        })
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    lines.push(rest);
    lines
}

fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let parts: Vec<&str> = line.trim().split(' ').filter(|p| !p.is_empty()).collect();
    let [method, target, protocol] = parts[..] else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method.trim().is_empty() {
        return Err(ParseError::MissingMethod);
    }
    if target.trim().is_empty() || !target.contains('/') {
        return Err(ParseError::InvalidTarget);
    }
    let has_http_prefix = protocol
        .get(..4)
        .map_or(false, |p| p.eq_ignore_ascii_case("HTTP"));
    if protocol.trim().is_empty() || !has_http_prefix {
        return Err(ParseError::InvalidProtocol);
    }

    Ok((method, target, protocol))
}

fn parse_header_line(line: &str) -> Result<(&str, &str), ParseError> {
    let colon = match line.find(':') {
        Some(0) | None => return Err(ParseError::MalformedHeaderLine),
        Some(i) => i,
    };

    let name = line[..colon].trim();
    if name.is_empty() {
        return Err(ParseError::EmptyHeaderName);
    }
    let value = line[colon + 1..].trim();
    if value.is_empty() {
        return Err(ParseError::EmptyHeaderValue);
    }
    Ok((name, value))
}

fn parse_body(lines: &[&str]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let joined = lines.join("\n");
    let body = joined.trim_end_matches(['\n', '\r']);
    if body.trim().is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取请求方法（保持原始大小写）
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 获取原始请求目标（含查询字符串）
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 获取协议字段
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 不区分大小写地查询标头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// 获取去掉查询字符串后的路径
    pub fn path(&self) -> &str {
        match self.target.find('?') {
            Some(i) => &self.target[..i],
            None => &self.target,
        }
    }

    /// 解码查询字符串为键值对
    pub fn query_parameters(&self) -> Result<HashMap<String, String>, FormError> {
        match self.target.split_once('?') {
            Some((_, query)) => form::parse_urlencoded(query),
            None => Ok(HashMap::new()),
        }
    }

    /// 按 `Content-Type` 解码表单正文
    ///
    /// 支持 `application/x-www-form-urlencoded` 与 `multipart/form-data`，
    /// 其他类型或缺少正文时返回空表。
    pub fn form_data(&self) -> Result<HashMap<String, String>, FormError> {
        let (body, content_type) = match (self.body(), self.header("Content-Type")) {
            (Some(b), Some(t)) => (b, t),
            _ => return Ok(HashMap::new()),
        };
        let lower = content_type.to_ascii_lowercase();
        if lower.starts_with("application/x-www-form-urlencoded") {
            form::parse_urlencoded(body)
        } else if lower.starts_with("multipart/form-data") {
            form::parse_multipart(body, content_type)
        } else {
            Ok(HashMap::new())
        }
    }
}
