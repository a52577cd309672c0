// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 集成测试共用的服务器启动与报文收发工具。

#![allow(dead_code)]

use std::{fs, net::SocketAddr, time::Duration};

use static_webserver::{Config, Server, ServerHandle};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

/// 单次请求的最长等待时间，防止测试因服务器挂起而永久阻塞
pub const IO_TIMEOUT: Duration = Duration::from_secs(5);

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><h1>index</h1></body></html>";
pub const MAIN_HTML: &str = "<h1>main</h1>";

/// 在临时目录中准备静态文件，并在随机端口上启动服务器
pub async fn start_server() -> (TempDir, ServerHandle) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    fs::write(dir.path().join("main.html"), MAIN_HTML).unwrap();
    fs::write(dir.path().join("style.css"), "body { margin: 0; }").unwrap();
    fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("notes.txt"), "line one\nline two").unwrap();

    let mut config = Config::new();
    config
        .set_www_root(dir.path().to_str().unwrap())
        .set_port(0)
        .set_local(true)
        .set_route("/home", "/main.html");

    let server = Server::bind(&config).await.unwrap();
    (dir, server.start())
}

/// 发送原始请求字节并读取到连接关闭为止
pub async fn send_request(addr: SocketAddr, request: &[u8]) -> Result<String, String> {
    let mut stream = TcpStream::connect(addr).await.map_err(|e| e.to_string())?;
    stream.write_all(request).await.map_err(|e| e.to_string())?;

    let mut buffer = Vec::new();
    timeout(IO_TIMEOUT, stream.read_to_end(&mut buffer))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// 将响应报文拆分为状态码、标头与正文
pub fn parse_response(response: &str) -> (u16, Vec<(String, String)>, String) {
    let (head, body) = match response.split_once("\n\n") {
        Some((head, body)) => (head, body.to_string()),
        None => (response, String::new()),
    };
    let mut lines = head.split('\n');

    let status_code = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);

    let headers = lines
        .filter_map(|line| line.split_once(": "))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    (status_code, headers, body)
}

pub fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
