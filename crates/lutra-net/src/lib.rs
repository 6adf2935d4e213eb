//! # Lutra Net
//!
//! 桥接器的网络面：
//!
//! - `ingress`: 比赛控制进程的运动指令批次接收（UDP + bincode）
//! - `camera`: 相机球观测接收（UDP + JSON）
//! - `egress`: 100 ms 周期的状态广播（UDP + JSON，纯读）
//! - `tuning`: 持久化的视觉阈值文档（管理面"更新阈值"的落点）
//!
//! 套接字绑定失败属于致命启动错误，由调用方传播；
//! 运行期的畸形数据报一律记日志丢弃，不影响核心控制状态。

pub mod camera;
pub mod egress;
pub mod ingress;
pub mod tuning;

pub use camera::camera_loop;
pub use egress::{STATUS_INTERVAL, StatusReport, status_loop};
pub use ingress::{CommandBatch, command_loop};
pub use tuning::VisionTuning;

use thiserror::Error;

/// 网络面错误类型
#[derive(Error, Debug)]
pub enum NetError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
