// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由与路径解析
//!
//! 将请求路径映射到静态根目录下的文件：
//! 1. 路由表中精确匹配的路径替换为对应的文件路径。
//! 2. 未配置的 `/` 替换为默认首页 `/index.html`。
//! 3. 其余路径原样拼接到静态根目录下。
//!
//! 拼接后的路径经过规范化，必须仍位于静态根目录之内（比较不区分大小写），
//! 否则视为目录遍历，返回 [`Exception::Forbidden`]。

use std::{
    collections::{hash_map, HashMap},
    env, fs, io,
    path::{Component, Path, PathBuf},
};

use crate::{exception::Exception, param::DEFAULT_INDEX};

/// 请求路径（不含查询字符串）到文件路径的精确映射。
///
/// 在服务器启动时构造，此后只读，由所有连接共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// 只包含 `/` -> `/index.html` 的默认路由表
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert("/".to_string(), DEFAULT_INDEX.to_string());
        Self { routes }
    }

    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn insert(&mut self, path: &str, file: &str) -> &mut Self {
        self.routes.insert(path.to_string(), file.to_string());
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.routes.get(path).map(String::as_str)
    }

    /// 按路由规则替换请求路径
    pub fn map_path<'a>(&'a self, path: &'a str) -> &'a str {
        match self.get(path) {
            Some(file) => file,
            None if path == "/" => DEFAULT_INDEX,
            None => path,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.routes.iter()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, String>> for RouteTable {
    fn from(routes: HashMap<String, String>) -> Self {
        Self { routes }
    }
}

/// 规范化后的静态根目录
#[derive(Debug, Clone)]
pub struct StaticRoot {
    root: PathBuf,
}

impl StaticRoot {
    /// 将根目录转换为绝对路径。
    ///
    /// 目录存在时解析符号链接；不存在时只做词法规范化，此时所有请求都会得到 404。
    pub fn new(root: &Path) -> io::Result<Self> {
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            env::current_dir()?.join(root)
        };
        let root = fs::canonicalize(&absolute).unwrap_or_else(|_| normalize(&absolute));
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// 将路由后的请求路径解析为静态根目录下的绝对路径。
    ///
    /// 返回的路径不保证存在。
    pub fn resolve(&self, path: &str) -> Result<PathBuf, Exception> {
        let relative = path.trim_start_matches('/');
        let candidate = normalize(&self.root.join(relative));
        if !starts_with_ignore_case(&candidate, &self.root) {
            return Err(Exception::Forbidden);
        }

        // 符号链接可能指向根目录之外
        match fs::canonicalize(&candidate) {
            Ok(real) if !starts_with_ignore_case(&real, &self.root) => Err(Exception::Forbidden),
            Ok(real) => Ok(real),
            Err(_) => Ok(candidate),
        }
    }
}

/// 词法规范化：去掉 `.`，就地消解 `..`，不访问文件系统
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn starts_with_ignore_case(path: &Path, base: &Path) -> bool {
    let mut path_components = path.components();
    base.components().all(|b| match path_components.next() {
        Some(p) => p
            .as_os_str()
            .to_string_lossy()
            .to_lowercase()
            .eq(&b.as_os_str().to_string_lossy().to_lowercase()),
        None => false,
    })
}
