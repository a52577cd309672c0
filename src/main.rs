// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 静态文件 Web 服务器
//!
//! 程序入口：初始化日志、载入配置、按配置构建 Tokio 运行时并启动服务器。
//! 服务器在收到 Ctrl-C 或控制台 `stop` 指令后停止接收新连接。

use std::{env, process, time::Duration};

use log::{error, info, warn, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    runtime::{Builder, Runtime},
    signal,
};

use static_webserver::{Config, Server};

const LOG_CONFIG: &str = "config/log4rs.yaml";
const DEFAULT_CONFIG: &str = "config/development.toml";
/// 停机时等待阻塞任务（如读取标准输入）的最长时间
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() {
    // 1. 初始化日志系统：优先使用 YAML 配置，失败时退回到控制台输出
    init_logging();

    // 2. 环境配置加载：第一个命令行参数可指定配置文件路径
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = match Config::from_toml(&config_path) {
        Ok(config) => {
            info!("配置文件{}已载入", config_path);
            config
        }
        Err(e) => {
            warn!("{}：{}，使用默认配置", config_path, e);
            Config::new()
        }
    };

    // 3. 异步运行时定制：根据配置文件分配工作线程数
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建异步运行时：{}", e);
            process::exit(1);
        }
    };
    info!("工作线程数: {}", config.worker_threads());

    runtime.block_on(run(config));
    shutdown_runtime(runtime);
}

/// 关闭运行时。控制台对标准输入的读取无法取消，不能无限期等待它结束。
fn shutdown_runtime(runtime: Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

async fn run(config: Config) {
    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            error!("服务器启动失败：{}", e);
            process::exit(1);
        }
    };
    let handle = server.start();
    println!("服务器已启动：{}，输入 help 查看可用指令", handle.local_addr());

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                error!("无法监听Ctrl-C信号：{}", e);
            }
            info!("收到Ctrl-C，正在停机...");
        }
        _ = console() => {
            info!("收到stop指令，正在停机...");
        }
    }

    handle.stop().await;
}

/// # 管理控制台
///
/// 读取标准输入的指令，收到 `stop` 时返回。标准输入关闭后永远挂起，
/// 此时只能通过 Ctrl-C 停机。
async fn console() {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut input = String::new();
    loop {
        input.clear();
        match reader.read_line(&mut input).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        match input.trim() {
            "stop" => return,
            "help" => {
                println!("== Webserver Help ==");
                println!("stop   - 停止接收新连接并退出");
                println!("help   - 显示此帮助信息");
                println!("====================");
            }
            "" => {}
            cmd => println!("无效的命令：{}", cmd),
        }
    }
    std::future::pending::<()>().await
}

fn init_logging() {
    let err = match log4rs::init_file(LOG_CONFIG, Default::default()) {
        Ok(()) => return,
        Err(e) => e,
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} - {m}{n}",
        )))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match config {
        Ok(config) => {
            if log4rs::init_config(config).is_ok() {
                warn!("无法从{}载入日志配置（{}），改用控制台输出", LOG_CONFIG, err);
            }
        }
        Err(e) => eprintln!("无法初始化日志系统：{}", e),
    }
}
