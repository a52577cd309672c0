use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;

use crate::exception::Exception;
use crate::param::{DEFAULT_INDEX, DEFAULT_PORT, DEFAULT_ROOT};
use crate::route::RouteTable;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_www_root")]
    www_root: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    local: bool,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_routes")]
    routes: HashMap<String, String>,
}

fn default_www_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_routes() -> HashMap<String, String> {
    let mut routes = HashMap::new();
    routes.insert("/".to_string(), DEFAULT_INDEX.to_string());
    routes
}

impl Config {
    pub fn new() -> Self {
        Self {
            www_root: default_www_root(),
            port: default_port(),
            local: false,
            worker_threads: 0,
            routes: default_routes(),
        }
    }

    pub fn from_toml(filename: &str) -> Result<Self, Exception> {
        let mut file = File::open(filename).map_err(|e| {
            error!("无法打开配置文件{}：{}", filename, e);
            Exception::ConfigUnreadable
        })?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val).map_err(|e| {
            error!("无法读取配置文件{}：{}", filename, e);
            Exception::ConfigUnreadable
        })?;
        Self::from_toml_str(&str_val)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Exception> {
        let config: Config = toml::from_str(text).map_err(|e| {
            error!("无法成功从配置文件构建配置对象：{}", e);
            Exception::ConfigInvalid
        })?;
        if config.routes.is_empty() {
            warn!("路由表为空，`/`将回退到默认首页{}", DEFAULT_INDEX);
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn www_root(&self) -> &str {
        &self.www_root
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local(&self) -> bool {
        self.local
    }

    /// 0 表示每个 CPU 核心一个工作线程
    pub fn worker_threads(&self) -> usize {
        match self.worker_threads {
            0 => num_cpus::get(),
            n => n,
        }
    }

    pub fn routes(&self) -> RouteTable {
        RouteTable::from(self.routes.clone())
    }

    pub fn set_www_root(&mut self, www_root: &str) -> &mut Self {
        self.www_root = www_root.to_string();
        self
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn set_local(&mut self, local: bool) -> &mut Self {
        self.local = local;
        self
    }

    pub fn set_route(&mut self, path: &str, file: &str) -> &mut Self {
        self.routes.insert(path.to_string(), file.to_string());
        self
    }
}
