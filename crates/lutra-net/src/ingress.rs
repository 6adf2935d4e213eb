//! 运动指令接收
//!
//! 无连接传输上的长度定界批次消息：每个数据报恰好一个
//! [`CommandBatch`]（bincode 标准配置），内含零或多条按机器人
//! 编址的指令。只对发给本机 id 或紧急停止哨兵的指令生效；
//! 紧急停止优先于同批次中发给本机的任何指令。

use lutra_driver::{BridgeContext, EMERGENCY_STOP_ID, MotionCommand, apply_command};
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 接收超时：保证每次迭代有界，停机标志在一次迭代内被观察到
const RECV_TIMEOUT: Duration = Duration::from_millis(200);

/// 指令批次（比赛控制进程定义的外部消息）
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CommandBatch {
    pub commands: Vec<MotionCommand>,
}

/// 指令接收活动
///
/// 套接字由调用方绑定成功后移交（绑定失败在启动期致命）。
/// 任何数据报到达都会喂看门狗；解码失败记日志丢弃。
pub fn command_loop(socket: UdpSocket, ctx: Arc<BridgeContext>) {
    if let Err(e) = socket.set_read_timeout(Some(RECV_TIMEOUT)) {
        warn!(error = %e, "failed to set ingress read timeout");
    }

    let mut buf = [0u8; 2048];
    while ctx.is_running() {
        let n = match socket.recv_from(&mut buf) {
            Ok((n, _)) => n,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue;
            },
            Err(e) => {
                warn!(error = %e, "command socket receive failed");
                continue;
            },
        };

        ctx.watchdog.touch();

        let batch: CommandBatch =
            match bincode::serde::decode_from_slice(&buf[..n], bincode::config::standard()) {
                Ok((batch, _)) => batch,
                Err(e) => {
                    warn!(error = %e, len = n, "malformed command batch dropped");
                    continue;
                },
            };

        handle_batch(&ctx, &batch);
    }
    info!("command ingress exited");
}

/// 处理一个批次：紧急停止哨兵赢下整个批次
pub fn handle_batch(ctx: &BridgeContext, batch: &CommandBatch) {
    let now = Instant::now();

    if let Some(stop) = batch.commands.iter().find(|c| c.id == EMERGENCY_STOP_ID) {
        apply_command(ctx, stop, now);
        return;
    }

    for cmd in batch.commands.iter().filter(|c| c.id == ctx.robot_id) {
        debug!(
            vel_tangent = cmd.vel_tangent,
            vel_normal = cmd.vel_normal,
            vel_angular = cmd.vel_angular,
            "motion command accepted"
        );
        apply_command(ctx, cmd, now);
    }
}
