// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了请求处理生命周期中可能出现的各类错误。
//!
//! ## 分层
//! - [`ParseError`]：请求报文解析失败，统一映射为 `400 Bad Request`。
//! - [`WriteError`]：响应对象缺少必需字段，属于服务端代码错误，映射为 `500`。
//! - [`FormError`]：查询字符串或表单正文格式错误。
//! - [`Exception`]：服务器层面的错误，由连接处理器转换为具体的 HTTP 响应。

use std::{error::Error, fmt, io};

/// 请求报文解析错误。
///
/// 解析要么完全成功，要么返回其中一种错误，不会产生部分填充的 `Request`。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 输入为空或仅包含空白字符。
    EmptyInput,
    /// 请求行不是恰好三个以空格分隔的字段。
    MalformedRequestLine,
    /// 请求方法为空。
    MissingMethod,
    /// 请求目标为空或不包含 `/`。
    InvalidTarget,
    /// 协议字段为空或不以 `HTTP` 开头。
    InvalidProtocol,
    /// 标头行缺少 `:`，或 `:` 位于行首。
    MalformedHeaderLine,
    /// 标头名称在去除空白后为空。
    EmptyHeaderName,
    /// 标头值在去除空白后为空。
    EmptyHeaderValue,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "request text is empty"),
            ParseError::MalformedRequestLine => {
                write!(f, "request line must contain method, target and protocol")
            }
            ParseError::MissingMethod => write!(f, "request method is missing"),
            ParseError::InvalidTarget => write!(f, "request target must contain '/'"),
            ParseError::InvalidProtocol => write!(f, "protocol must start with 'HTTP'"),
            ParseError::MalformedHeaderLine => {
                write!(f, "header line must contain ':' with text before it")
            }
            ParseError::EmptyHeaderName => write!(f, "header name is empty"),
            ParseError::EmptyHeaderValue => write!(f, "header value is empty"),
        }
    }
}

impl Error for ParseError {}

/// 响应序列化错误。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WriteError {
    MissingProtocol,
    MissingStatusCode,
    MissingStatusText,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::MissingProtocol => write!(f, "response protocol is empty"),
            WriteError::MissingStatusCode => write!(f, "response status code is not set"),
            WriteError::MissingStatusText => write!(f, "response status text is empty"),
        }
    }
}

impl Error for WriteError {}

/// 查询字符串与表单正文的解码错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// 键值对缺少 `=`。
    MissingValue(String),
    /// 键值对的名称为空。
    EmptyName(String),
    /// `multipart/form-data` 的 Content-Type 中没有 boundary 参数。
    MissingBoundary,
    /// 某个 multipart 分段的 Content-Disposition 中没有 name 参数。
    MissingFieldName,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingValue(pair) => write!(f, "field '{}' is missing a value", pair),
            FormError::EmptyName(pair) => write!(f, "empty field name in '{}'", pair),
            FormError::MissingBoundary => write!(f, "multipart boundary not found in Content-Type"),
            FormError::MissingFieldName => {
                write!(f, "multipart part is missing a name in Content-Disposition")
            }
        }
    }
}

impl Error for FormError {}

/// 服务器处理请求过程中发生的异常类型。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 请求报文无法解析。对应 `400 Bad Request`。
    Parse(ParseError),
    /// 响应对象不完整，无法序列化。这说明服务端代码存在错误。
    Write(WriteError),
    /// 解析后的路径落在静态根目录之外。对应 `403 Forbidden`。
    Forbidden,
    /// 在静态根目录下未找到所请求的文件。对应 `404 Not Found`。
    FileNotFound,
    /// 套接字或文件系统 I/O 失败。
    Io(io::ErrorKind),
    /// 配置文件无法读取。
    ConfigUnreadable,
    /// 配置文件内容无法解析为合法配置。
    ConfigInvalid,
    /// 无法绑定监听地址。
    BindFailed,
}

use Exception::*;

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parse(e) => write!(f, "Malformed request: {}", e),
            Write(e) => write!(f, "Incomplete response: {}", e),
            Forbidden => write!(f, "Path escapes the static root (403)"),
            FileNotFound => write!(f, "File not found (404)"),
            Io(kind) => write!(f, "I/O error: {}", kind),
            ConfigUnreadable => write!(f, "Couldn't read configuration file"),
            ConfigInvalid => write!(f, "Configuration file is invalid"),
            BindFailed => write!(f, "Couldn't bind listening socket"),
        }
    }
}

impl Error for Exception {}

impl From<ParseError> for Exception {
    fn from(e: ParseError) -> Self {
        Parse(e)
    }
}

impl From<WriteError> for Exception {
    fn from(e: WriteError) -> Self {
        Write(e)
    }
}

impl From<io::Error> for Exception {
    fn from(e: io::Error) -> Self {
        Io(e.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_kind() {
        let e: Exception = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(e, Exception::Io(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_parse_error_display() {
        let e: Exception = ParseError::EmptyHeaderValue.into();
        assert_eq!(e.to_string(), "Malformed request: header value is empty");
    }
}
