// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 请求处理
//!
//! 将一段原始请求字节转换为响应，按顺序在第一个命中的分支终止：
//!
//! | 条件                         | 结果 |
//! |------------------------------|------|
//! | 请求无法解析                 | 400  |
//! | 方法不是 `GET`（不区分大小写）| 405  |
//! | 路径逃出静态根目录           | 403  |
//! | 文件不存在或无法获取元数据   | 404  |
//! | 读取文件等其他错误           | 500  |
//! | 其余情况                     | 200  |

use std::path::Path;

use log::{debug, error, info, warn};

use crate::{
    exception::Exception,
    request::Request,
    response::Response,
    route::{RouteTable, StaticRoot},
    util::get_mime,
};

/// 静态站点：根目录加路由表。构造后只读，可在连接之间共享而无需加锁。
#[derive(Debug, Clone)]
pub struct Site {
    root: StaticRoot,
    routes: RouteTable,
}

impl Site {
    pub fn new(root: StaticRoot, routes: RouteTable) -> Self {
        Self { root, routes }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// 处理一段完整的请求报文，总是返回一个响应
    pub async fn process(&self, buffer: &[u8], id: u128) -> Response {
        let request = match Request::try_from(buffer, id) {
            Ok(request) => request,
            Err(e) => {
                warn!("[ID{}]HTTP请求格式错误：{}，返回400", id, e);
                let response = Response::response_400();
                info!("{}", access_line(id, None, &response));
                return response;
            }
        };
        debug!("[ID{}]成功解析HTTP请求", id);

        let response = if !request.method().eq_ignore_ascii_case("GET") {
            warn!("[ID{}]不支持的请求方法：{}，返回405", id, request.method());
            Response::response_405()
        } else {
            match self.serve(request.path(), id).await {
                Ok(response) => response,
                Err(Exception::Forbidden) => {
                    warn!("[ID{}]请求的路径：{} 超出静态根目录，返回403", id, request.path());
                    Response::response_403()
                }
                Err(Exception::FileNotFound) => {
                    warn!("[ID{}]请求的路径：{} 不存在，返回404", id, request.path());
                    Response::response_404()
                }
                Err(e) => {
                    error!("[ID{}]处理请求时发生未知异常: {}", id, e);
                    Response::response_500()
                }
            }
        };

        info!("{}", access_line(id, Some(&request), &response));
        response
    }

    /// 将路径（不含查询字符串）映射为文件并构造 `200 OK` 响应
    pub async fn serve(&self, path: &str, id: u128) -> Result<Response, Exception> {
        let mapped = self.routes.map_path(path);
        let file = self.root.resolve(mapped)?;
        debug!("[ID{}]映射物理路径：{}", id, file.display());
        // 以分隔符结尾的路径只能指向目录
        if mapped.ends_with('/') {
            return Err(Exception::FileNotFound);
        }

        let metadata = tokio::fs::metadata(&file)
            .await
            .map_err(|_| Exception::FileNotFound)?;
        if !metadata.is_file() {
            return Err(Exception::FileNotFound);
        }

        let content = tokio::fs::read(&file).await?;
        let mime = get_mime(&file);
        debug!("[ID{}]文件大小: {} bytes, Content-Type: {}", id, content.len(), mime);
        Ok(Response::from_file(&content, mime))
    }
}

/// 访问日志：协议、目标、方法、状态码、原因短语、User-Agent。无法解析的请求以 `-` 占位。
fn access_line(id: u128, request: Option<&Request>, response: &Response) -> String {
    let code = response.status_code().unwrap_or_default();
    match request {
        Some(request) => format!(
            "[ID{}] {}, {}, {}, {}, {}, {}",
            id,
            request.protocol(),
            request.target(),
            request.method(),
            code,
            response.information(),
            request.header("User-Agent").unwrap_or("-"),
        ),
        None => format!("[ID{}] -, -, -, {}, {}, -", id, code, response.information()),
    }
}
