// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

mod common;

mod security_tests {
    //! # 安全回归测试套件
    //!
    //! 通过模拟常见的攻击向量验证服务器的防御能力：
    //! - 路径遍历 (Path Traversal)
    //! - 空字节注入 (Null Byte Injection)
    //! - 畸形与超长报文 (Protocol Robustness)

    use super::common::*;
    use std::fs;

    /// 从原始响应字符串中提取 HTTP 状态码
    fn extract_status_code(response: &str) -> u16 {
        response
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .unwrap_or(0)
    }

    /// ## 攻击向量：基础路径遍历
    /// `..` 规范化后落在静态根目录之外时必须返回 403。
    #[tokio::test]
    async fn test_path_traversal_simple() {
        let (_dir, server) = start_server().await;

        let attacks = vec![
            "GET /../etc/passwd HTTP/1.1\r\nHost: localhost\r\n\r\n",
            "GET /../../etc/passwd HTTP/1.1\r\nHost: localhost\r\n\r\n",
            "GET /docs/../../../etc/passwd HTTP/1.1\r\nHost: localhost\r\n\r\n",
            "GET /.. HTTP/1.1\r\n\r\n",
        ];

        for attack in attacks {
            let response = send_request(server.local_addr(), attack.as_bytes())
                .await
                .unwrap();
            assert_eq!(extract_status_code(&response), 403, "{:?}", attack);
        }

        server.stop().await;
    }

    /// ## 攻击向量：遍历到相邻目录
    /// 与根目录同前缀的兄弟目录（`static` 与 `static-secret`）同样不可访问。
    #[tokio::test]
    async fn test_path_traversal_to_sibling_directory() {
        let (dir, server) = start_server().await;
        let root_name = dir.path().file_name().unwrap().to_str().unwrap().to_string();
        let sibling = dir.path().with_file_name(format!("{}-secret", root_name));
        fs::create_dir_all(&sibling).unwrap();
        fs::write(sibling.join("secret.txt"), "secret").unwrap();

        let attack = format!("GET /../{}-secret/secret.txt HTTP/1.1\r\n\r\n", root_name);
        let response = send_request(server.local_addr(), attack.as_bytes())
            .await
            .unwrap();

        assert_eq!(extract_status_code(&response), 403);
        assert!(!response.ends_with("secret"));

        fs::remove_dir_all(&sibling).unwrap();
        server.stop().await;
    }

    /// ## 攻击向量：URL 编码混淆遍历
    /// 路径不做百分号解码，编码后的 `..` 只是普通文件名。
    #[tokio::test]
    async fn test_path_traversal_encoded() {
        let (_dir, server) = start_server().await;

        let attacks = vec![
            "GET /%2e%2e%2fetc%2fpasswd HTTP/1.1\r\nHost: localhost\r\n\r\n",
            "GET /..%2fetc%2fpasswd HTTP/1.1\r\nHost: localhost\r\n\r\n",
        ];

        for attack in attacks {
            let response = send_request(server.local_addr(), attack.as_bytes())
                .await
                .unwrap();
            assert_eq!(extract_status_code(&response), 404, "{:?}", attack);
        }

        server.stop().await;
    }

    /// ## 攻击向量：空字节注入
    #[tokio::test]
    async fn test_null_byte_injection() {
        let (_dir, server) = start_server().await;

        let attack = "GET /index.html\0.jpg HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let response = send_request(server.local_addr(), attack.as_bytes())
            .await
            .unwrap();

        assert_eq!(extract_status_code(&response), 404);

        server.stop().await;
    }

    /// ## 压力测试：超长请求行
    /// 无论请求是否被截断，都不能返回 200，服务器也必须继续服务。
    #[tokio::test]
    async fn test_oversized_request_line() {
        let (_dir, server) = start_server().await;

        let long_path = "a".repeat(100_000);
        let attack = format!("GET /{} HTTP/1.1\r\nHost: localhost\r\n\r\n", long_path);
        match send_request(server.local_addr(), attack.as_bytes()).await {
            Ok(response) => assert_ne!(extract_status_code(&response), 200),
            Err(_) => {
                // 连接被重置也视为防御成功
            }
        }

        let response = send_request(server.local_addr(), b"GET / HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(extract_status_code(&response), 200);

        server.stop().await;
    }

    /// ## 协议健壮性：畸形标头
    #[tokio::test]
    async fn test_malformed_headers() {
        let (_dir, server) = start_server().await;

        let attacks = vec![
            "GET / HTTP/1.1\r\nHost localhost\r\n\r\n",
            "GET / HTTP/1.1\r\n: no-name\r\n\r\n",
            "GET / HTTP/1.1\r\n   : blank-name\r\n\r\n",
            "GET / HTTP/1.1\r\nX-Empty:   \r\n\r\n",
        ];

        for attack in attacks {
            let response = send_request(server.local_addr(), attack.as_bytes())
                .await
                .unwrap();
            assert_eq!(extract_status_code(&response), 400, "{:?}", attack);
        }

        server.stop().await;
    }

    /// ## 协议健壮性：非 UTF-8 字节
    /// 非法字节被替换后照常解析。
    #[tokio::test]
    async fn test_invalid_utf8_bytes() {
        let (_dir, server) = start_server().await;

        let mut attack = b"GET / HTTP/1.1\r\nX-Junk: ".to_vec();
        attack.extend_from_slice(&[0xFF, 0xFE, 0xFD]);
        attack.extend_from_slice(b"\r\n\r\n");
        let response = send_request(server.local_addr(), &attack).await.unwrap();

        assert_eq!(extract_status_code(&response), 200);

        server.stop().await;
    }

    /// ## 协议健壮性：CRLF 注入
    /// 目标中的 `\r` 被当作换行，后续内容成为畸形标头。
    #[tokio::test]
    async fn test_crlf_injection() {
        let (_dir, server) = start_server().await;

        let attack = "GET /index.html\rInjected HTTP/1.1\r\n\r\n";
        let response = send_request(server.local_addr(), attack.as_bytes())
            .await
            .unwrap();

        assert_eq!(extract_status_code(&response), 400);

        server.stop().await;
    }
}
