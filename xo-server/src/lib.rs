//! XO 对战服务端
//!
//! 包含:
//! - 对局状态与胜负判定
//! - 对局注册表
//! - 连接管理与消息处理
//! - 单任务事件循环
//! - HTTP / WebSocket 接口

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod game;
pub mod http;
pub mod registry;
pub mod server;
pub mod ws;

pub use config::{ConfigError, ServerConfig};
pub use connection::{
    outbound_channel, ConnectionIdGenerator, ConnectionManager, ConnectionSession,
    OutboundReceiver, OutboundSender,
};
pub use dispatcher::{ServerEvent, ServerHandle};
pub use game::GameState;
pub use http::{router, HealthStatus};
pub use registry::{JoinOutcome, LeaveOutcome, SessionRegistry};
pub use server::{MessageHandler, ServerState};
