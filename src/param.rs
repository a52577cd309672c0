// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了服务器遵循的 HTTP 协议相关常量，包括：
//! - 默认端口、静态根目录与首页文档。
//! - 服务器会产生的状态码及其原因短语（Reason Phrase）。
//! - 固定的文件扩展名到 MIME 类型映射表。

use lazy_static::lazy_static;
use std::collections::HashMap;

/// 响应报文使用的协议版本
pub const HTTP_PROTOCOL: &str = "HTTP/1.1";

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 8080;

/// 默认静态资源根目录
pub const DEFAULT_ROOT: &str = "./static";

/// `/` 默认映射到的首页文档（相对于静态根目录）
pub const DEFAULT_INDEX: &str = "/index.html";

/// 无法识别扩展名时使用的兜底类型
pub const OCTET_STREAM: &str = "application/octet-stream";

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 只收录本服务器会主动产生的状态码。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        map.insert(200, "OK");
        map.insert(400, "Bad Request");
        map.insert(403, "Forbidden");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");
        map.insert(500, "Internal Server Error");
        map
    };
}

lazy_static! {
    /// 文件后缀名到 MIME 类型的映射表。
    ///
    /// 这是对外公开的固定契约，未列出的扩展名一律视为 `application/octet-stream`。
    pub static ref MIME_TYPES: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("html", "text/html; charset=utf-8");
        map.insert("css", "text/css; charset=utf-8");
        map.insert("js", "application/javascript; charset=utf-8");
        map.insert("jpg", "image/jpeg");
        map.insert("jpeg", "image/jpeg");
        map.insert("png", "image/png");
        map.insert("gif", "image/gif");
        map.insert("ico", "image/x-icon");
        map.insert("txt", "text/plain; charset=utf-8");
        map.insert("json", "application/json; charset=utf-8");
        map.insert("xml", "application/xml; charset=utf-8");
        map
    };
}
