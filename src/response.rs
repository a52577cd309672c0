// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 响应构建模块
//!
//! `Response` 是一个纯数据对象；`write` 将其序列化为报文文本：
//!
//! ```text
//! {Protocol} {StatusCode} {StatusText}
//! {Name}: {Value}        <- 每个标头一行，按插入顺序
//!
//! {Body}                 <- 仅当正文非空时输出
//! ```
//!
//! 行分隔符为 `\n`。正文为空时，报文在最后一个标头后立即结束。

use bytes::Bytes;
use log::error;

use crate::{
    exception::WriteError,
    header::Headers,
    param::{HTTP_PROTOCOL, STATUS_CODES},
    util::HtmlBuilder,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    protocol: String,
    status_code: Option<u16>,
    information: String,
    headers: Headers,
    body: Option<String>,
}

impl Response {
    /// 构造一个 `HTTP/1.1 200 OK` 的空响应
    pub fn new() -> Self {
        Self {
            protocol: HTTP_PROTOCOL.to_string(),
            status_code: Some(200),
            information: "OK".to_string(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// 以文件内容构造 `200 OK` 响应。
    ///
    /// `Content-Length` 取原始字节长度；正文按 UTF-8 解码，与声明的类型无关。
    pub fn from_file(content: &[u8], content_type: &str) -> Self {
        let mut response = Self::new();
        response
            .insert_header("Content-Type", content_type)
            .insert_header("Content-Length", &content.len().to_string())
            .insert_header("Connection", "close");
        if !content.is_empty() {
            response.body = Some(String::from_utf8_lossy(content).into_owned());
        }
        response
    }

    /// 以统一的 HTML 错误页构造响应
    pub fn from_status_code(code: u16) -> Self {
        let mut response = Self::new();
        response.set_code(code);
        let html = HtmlBuilder::from_status_code(code, &response.information).build();
        response
            .insert_header("Content-Type", "text/html")
            .insert_header("Content-Length", &html.len().to_string())
            .insert_header("Connection", "close");
        response.body = Some(html);
        response
    }

    pub fn response_400() -> Self {
        Self::from_status_code(400)
    }

    pub fn response_403() -> Self {
        Self::from_status_code(403)
    }

    pub fn response_404() -> Self {
        Self::from_status_code(404)
    }

    pub fn response_405() -> Self {
        Self::from_status_code(405)
    }

    pub fn response_500() -> Self {
        Self::from_status_code(500)
    }

    pub fn set_protocol(&mut self, protocol: &str) -> &mut Self {
        self.protocol = protocol.to_string();
        self
    }

    /// 设置状态码与自定义的原因短语
    pub fn set_status(&mut self, code: u16, information: &str) -> &mut Self {
        self.status_code = Some(code);
        self.information = information.to_string();
        self
    }

    /// 设置状态码，原因短语取自状态码表。
    ///
    /// 表中没有的状态码会留下空的原因短语，随后的 `write` 会因此失败。
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = Some(code);
        self.information = match STATUS_CODES.get(&code) {
            Some(&info) => info.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                String::new()
            }
        };
        self
    }

    pub fn insert_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn set_body(&mut self, body: Option<String>) -> &mut Self {
        self.body = body;
        self
    }

    /// 序列化为报文文本。
    ///
    /// 协议、状态码、原因短语缺一不可；缺失说明服务端代码有误，而不是请求有误。
    pub fn write(&self) -> Result<String, WriteError> {
        if self.protocol.trim().is_empty() {
            return Err(WriteError::MissingProtocol);
        }
        let status_code = self.status_code.ok_or(WriteError::MissingStatusCode)?;
        if self.information.trim().is_empty() {
            return Err(WriteError::MissingStatusText);
        }

        let mut text = format!("{} {} {}", self.protocol, status_code, self.information);
        for (name, value) in &self.headers {
            text.push('\n');
            text.push_str(name);
            text.push_str(": ");
            text.push_str(value);
        }
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            text.push_str("\n\n");
            text.push_str(body);
        }
        Ok(text)
    }

    /// 序列化为待写入套接字的字节
    pub fn as_bytes(&self) -> Result<Bytes, WriteError> {
        self.write().map(Bytes::from)
    }
}

impl Response {
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status_in(200..300)
    }

    pub fn is_client_error(&self) -> bool {
        self.status_in(400..500)
    }

    pub fn is_server_error(&self) -> bool {
        self.status_in(500..600)
    }

    fn status_in(&self, range: std::ops::Range<u16>) -> bool {
        self.status_code.map_or(false, |c| range.contains(&c))
    }
}
