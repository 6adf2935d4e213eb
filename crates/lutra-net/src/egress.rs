//! 周期状态广播
//!
//! 100 ms 周期把控制状态快照以 JSON 发向组播目标。
//! 纯读活动：只消费共享状态，不回写任何字段。

use crate::VisionTuning;
use lutra_driver::{BallSight, BridgeContext, RobotHealth};
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace, warn};

/// 状态广播周期
pub const STATUS_INTERVAL: Duration = Duration::from_millis(100);

/// 对外状态快照
///
/// 接收侧按字段名消费，字段增删需与地面站协调。
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusReport {
    pub robot_id: u32,
    /// 电池电压（伏特）
    pub volt: f32,
    /// 电容充电量
    pub cap_power: u8,
    pub photo_sensor: bool,
    pub dribbler_contact: bool,
    pub new_dribbler: bool,
    pub ball: BallSight,
    pub health: RobotHealth,
    /// 当前生效的视觉阈值文档
    pub tuning: VisionTuning,
}

impl StatusReport {
    /// 从共享状态取一次快照
    pub fn snapshot(ctx: &BridgeContext, tuning: &VisionTuning) -> Self {
        let status = ctx.device_status.load();
        Self {
            robot_id: ctx.robot_id,
            volt: status.volt_f32(),
            cap_power: status.cap_power,
            photo_sensor: status.sensor.photo_sensor(),
            dribbler_contact: status.sensor.dribbler_contact(),
            new_dribbler: status.sensor.new_dribbler(),
            ball: **ctx.ball.load(),
            health: (**ctx.health.load()).clone(),
            tuning: tuning.clone(),
        }
    }
}

/// 状态广播活动
///
/// 序列化或发送失败只记日志，下个周期重试；广播失败不影响控制。
pub fn status_loop(socket: UdpSocket, target: std::net::SocketAddr, ctx: Arc<BridgeContext>, tuning: VisionTuning) {
    while ctx.is_running() {
        let report = StatusReport::snapshot(&ctx, &tuning);
        match serde_json::to_vec(&report) {
            Ok(bytes) => {
                if let Err(e) = socket.send_to(&bytes, target) {
                    warn!(error = %e, "status broadcast failed");
                } else {
                    trace!(len = bytes.len(), "status broadcast");
                }
            },
            Err(e) => warn!(error = %e, "status report serialization failed"),
        }
        spin_sleep::sleep(STATUS_INTERVAL);
    }
    info!("status egress exited");
}
