//! 测试用的讯飞服务端替身
//!
//! 在 127.0.0.1 上接受一次连接，记录握手 URI 与收到的帧，
//! 收到最后一帧后按脚本回放响应。

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// 脚本中的一步
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    /// 主动关闭连接
    Close,
}

/// 服务端看到的内容
#[derive(Debug, Default)]
pub struct Captured {
    pub uri: String,
    pub received: Vec<Value>,
}

pub struct MockVendor {
    /// `127.0.0.1:port`
    pub host: String,
    handle: JoinHandle<Captured>,
}

impl MockVendor {
    /// 启动服务端；`is_last` 判断收到的帧是否为客户端最后一帧
    pub async fn start<F>(replies: Vec<Reply>, is_last: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut uri = String::new();
            let capture_uri =
                |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                    uri = request.uri().to_string();
                    Ok(response)
                };
            let mut socket = accept_hdr_async(stream, capture_uri).await.unwrap();

            let mut received = Vec::new();
            while let Some(Ok(message)) = socket.next().await {
                if let Message::Text(text) = message {
                    let value: Value = serde_json::from_str(&text).unwrap();
                    let last = is_last(&value);
                    received.push(value);
                    if last {
                        break;
                    }
                }
            }

            for reply in replies {
                let sent = match reply {
                    Reply::Text(text) => socket.send(Message::Text(text)).await,
                    Reply::Close => socket.close(None).await,
                };
                if sent.is_err() {
                    break;
                }
            }

            while let Some(Ok(_)) = socket.next().await {}

            Captured { uri, received }
        });

        Self { host, handle }
    }

    pub async fn captured(self) -> Captured {
        self.handle.await.unwrap()
    }
}
