// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 服务器与连接处理
//!
//! - [`Server::bind`] 绑定监听端口并准备静态站点。
//! - [`Server::start`] 启动接收循环（Accept Loop），返回 [`ServerHandle`]。
//! - 每个接受的连接在独立的 Tokio 任务中处理，接收循环立即回到等待状态。
//! - 每个连接只处理一次请求/响应交换，随后关闭（`Connection: close`）。
//!
//! 并发连接数没有上限，读取也没有超时：一个建立连接后不发送任何数据的客户端会一直占用一个任务。
//! `accept` 失败（如文件描述符耗尽）时等待一小段时间再重试。
//! 读取只在数据“当前可用”时继续，不依据 `Content-Length` 分帧，分多次到达的大正文可能被截断。

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
    time::sleep,
};

use crate::{
    config::Config,
    exception::Exception,
    response::Response,
    route::StaticRoot,
    site::Site,
};

/// 每次从套接字读取的块大小
const READ_CHUNK: usize = 1024;
/// 接受连接失败（如文件描述符耗尽）后的等待时间
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// 已绑定但尚未开始接收连接的服务器
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    site: Arc<Site>,
}

impl Server {
    /// 绑定监听端口（`local` 时为 127.0.0.1，否则为 0.0.0.0）并准备静态站点
    pub async fn bind(config: &Config) -> Result<Self, Exception> {
        let address = match config.local() {
            true => Ipv4Addr::LOCALHOST,
            false => Ipv4Addr::UNSPECIFIED,
        };
        let socket = SocketAddrV4::new(address, config.port());
        let listener = TcpListener::bind(socket).await.map_err(|e| {
            error!("无法绑定端口：{}，错误：{}", config.port(), e);
            Exception::BindFailed
        })?;
        let local_addr = listener.local_addr()?;
        info!("服务端将在{}上监听Socket连接", local_addr);

        let root = StaticRoot::new(Path::new(config.www_root()))?;
        let site = Site::new(root, config.routes());
        info!("静态根目录: {}", site.root().display());
        info!("已配置{}条路由", site.routes().len());
        for (path, file) in site.routes().iter() {
            info!("  {} -> {}", path, file);
        }

        Ok(Self {
            listener,
            local_addr,
            site: Arc::new(site),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 在后台任务中启动接收循环。
    ///
    /// 丢弃返回的句柄同样会使接收循环退出。
    pub fn start(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(accept_loop(self.listener, self.site, shutdown_rx));
        ServerHandle {
            local_addr: self.local_addr,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// 运行中的服务器。`stop` 关闭监听套接字；进行中的连接不会被取消。
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 发出停机信号并等待接收循环退出
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            error!("接收循环异常退出: {}", e);
        }
        info!("服务器已停止");
    }
}

async fn accept_loop(
    listener: TcpListener,
    site: Arc<Site>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut id: u128 = 0;
    loop {
        let failed = tokio::select! {
            _ = &mut shutdown => {
                info!("主循环接收到停机指令，正在退出...");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    debug!("[ID{}]新的连接：{}", id, addr);
                    let site = Arc::clone(&site);
                    tokio::spawn(handle_connection(stream, id, site));
                    id += 1;
                    false
                }
                Err(e) => {
                    warn!("接受连接失败: {}，{}ms后重试", e, ACCEPT_BACKOFF.as_millis());
                    true
                }
            }
        };
        if failed && backoff(&mut shutdown).await {
            info!("主循环接收到停机指令，正在退出...");
            break;
        }
    }
    drop(listener);
}

/// 等待 [`ACCEPT_BACKOFF`]，期间收到停机信号则立即返回 `true`
async fn backoff(shutdown: &mut oneshot::Receiver<()>) -> bool {
    tokio::select! {
        _ = shutdown => true,
        _ = sleep(ACCEPT_BACKOFF) => false,
    }
}

/// # 连接处理器
///
/// 负责单个 TCP 连接的完整生命周期：读取请求、处理、写回响应、关闭连接。
pub async fn handle_connection(mut stream: TcpStream, id: u128, site: Arc<Site>) {
    let start_time = Instant::now();

    let result = exchange(&mut stream, id, &site).await;
    finish(&mut stream, id, result).await;

    debug!(
        "[ID{}]连接已关闭，用时{}ms。",
        id,
        start_time.elapsed().as_millis()
    );
}

async fn exchange(stream: &mut TcpStream, id: u128, site: &Site) -> Result<(), Exception> {
    let buffer = read_request(stream).await?;
    if buffer.is_empty() {
        debug!("[ID{}]客户端未发送任何数据，放弃连接", id);
        return Ok(());
    }
    debug!("[ID{}]HTTP请求接收完毕，共{}字节", id, buffer.len());

    let response = site.process(&buffer, id).await;
    write_response(stream, &response, id).await
}

async fn write_response<W>(stream: &mut W, response: &Response, id: u128) -> Result<(), Exception>
where
    W: AsyncWrite + Unpin,
{
    let bytes = response.as_bytes()?;
    debug!("[ID{}]发送全量响应，长度: {}", id, bytes.len());
    stream.write_all(&bytes).await?;
    stream.flush().await?;
    Ok(())
}

/// 交换失败时尽力回写一个 500 响应，该写入的错误被忽略；无论成功与否连接最终都会关闭。
async fn finish<W>(stream: &mut W, id: u128, result: Result<(), Exception>)
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = result {
        error!("[ID{}]处理连接时出错: {}", id, e);
        if let Ok(bytes) = Response::response_500().as_bytes() {
            let _ = stream.write_all(&bytes).await;
            let _ = stream.flush().await;
        }
    }
    let _ = stream.shutdown().await;
}

/// 等待第一块数据，然后非阻塞地读出所有已到达的数据
async fn read_request(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut request = Vec::new();
    let mut buffer = [0u8; READ_CHUNK];

    let n = stream.read(&mut buffer).await?;
    if n == 0 {
        return Ok(request);
    }
    request.extend_from_slice(&buffer[..n]);

    loop {
        match stream.try_read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => request.extend_from_slice(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e),
        }
    }
    Ok(request)
}
