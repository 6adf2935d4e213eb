//! 相机球观测接收
//!
//! 图像管线在边界处注入 JSON 观测；核心只整体替换
//! [`BallSight`]，滤波发生在串口周期一侧。

use lutra_driver::{BallSight, BridgeContext};
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace, warn};

const RECV_TIMEOUT: Duration = Duration::from_millis(200);

/// 相机观测接收活动
pub fn camera_loop(socket: UdpSocket, ctx: Arc<BridgeContext>) {
    if let Err(e) = socket.set_read_timeout(Some(RECV_TIMEOUT)) {
        warn!(error = %e, "failed to set camera read timeout");
    }

    let mut buf = [0u8; 4096];
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
                warn!(error = %e, "camera socket receive failed");
                continue;
            },
        };

        match serde_json::from_slice::<BallSight>(&buf[..n]) {
            Ok(sight) => {
                trace!(visible = sight.visible, x = sight.x, y = sight.y, "ball sight");
                ctx.ball.store(Arc::new(sight));
            },
            Err(e) => warn!(error = %e, "malformed ball sight dropped"),
        }
    }
    info!("camera ingress exited");
}
