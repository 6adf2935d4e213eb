//! 串口周期
//!
//! 每个周期：丢弃陈旧输入 → 前导码重同步 → 收一帧底板状态 →
//! 电池分级 → 读共享指令帧并叠加锁存/滤波/看门狗 → 整帧发送 →
//! 固定写后延迟。前导码失配在扫描器内静默复位；前导码之后的
//! 解码/短读是可恢复错误：记日志，下一周期重试，绝不伪造读数。

use crate::cues::{Cue, CueSink};
use crate::filter::BallFilter;
use crate::monitor::classify_battery;
use crate::state::BridgeContext;
use lutra_link::{LinkError, SerialTransport};
use lutra_protocol::{DeviceStatus, PreambleScanner, STATUS_PAYLOAD_LEN};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// 串口周期配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleConfig {
    /// 单字节读取超时（保证每次迭代有界，能及时观察停机标志）
    pub read_timeout: Duration,
    /// 固定写后延迟
    pub post_write_delay: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(500),
            post_write_delay: Duration::from_millis(16),
        }
    }
}

/// 串口周期持久状态（跨周期存活的滤波器与信号边沿记录）
#[derive(Debug, Default)]
pub struct CycleState {
    scanner: PreambleScanner,
    ball_filter: BallFilter,
    /// 上一周期的信号接收位；首个周期只记录、不鸣叫
    prev_signal: Option<bool>,
}

/// 串口 IO 活动
///
/// 链路（及其底层端口）被移动进本函数，循环退出即释放。
pub fn serial_loop<L: SerialTransport>(
    mut link: L,
    ctx: Arc<BridgeContext>,
    cues: Arc<dyn CueSink>,
    config: CycleConfig,
) {
    if let Err(e) = link.set_read_timeout(config.read_timeout) {
        warn!(error = %e, "failed to set read timeout; using port default");
    }

    let mut state = CycleState::default();
    while ctx.is_running() {
        match run_cycle(&mut link, &ctx, &mut state, cues.as_ref(), &config) {
            Ok(()) => {},
            Err(LinkError::Timeout) => {
                // 底板沉默：有界等待后重试，顺带重新检查停机标志
                trace!("serial read timed out; retrying");
            },
            Err(e) => {
                warn!(error = %e, "serial cycle failed; retrying next cycle");
                spin_sleep::sleep(config.post_write_delay);
            },
        }
    }
    info!("serial loop exited");
}

/// 执行一个完整的收发周期
pub fn run_cycle<L: SerialTransport>(
    link: &mut L,
    ctx: &BridgeContext,
    state: &mut CycleState,
    cues: &dyn CueSink,
    config: &CycleConfig,
) -> Result<(), LinkError> {
    // 丢弃上一周期遗留的缓冲字节，避免消费陈旧数据
    link.clear_input()?;
    state.scanner.reset();

    // 前导码重同步
    loop {
        if !ctx.is_running() {
            return Ok(());
        }
        if state.scanner.push(link.read_byte()?) {
            break;
        }
    }

    // 精确读取载荷并解码
    let mut payload = [0u8; STATUS_PAYLOAD_LEN];
    for slot in payload.iter_mut() {
        *slot = link.read_byte()?;
    }
    match DeviceStatus::decode(&payload) {
        Ok(status) => {
            trace!(
                volt = status.volt,
                sensor = format_args!("{:08b}", u8::from(status.sensor)),
                cap_power = status.cap_power,
                "status frame received"
            );
            ctx.device_status.store(Arc::new(status));
            classify_battery(ctx, status.volt);
        },
        Err(e) => {
            // 可恢复：保留上一帧有效状态，下一周期重试
            warn!(error = %e, "status decode failed; retrying next cycle");
        },
    }

    // 组装外发帧：共享内容 + 锁存/滤波/看门狗覆盖
    let mut frame = *ctx.command.lock();
    frame.kick_power = ctx.kick.lock().power();
    frame.chip_power = ctx.chip.lock().power();

    let sight = ctx.ball.load();
    let (cam_x, cam_y) = state.ball_filter.apply(&sight);
    frame.cam_ball_x = cam_x;
    frame.cam_ball_y = cam_y;

    let phase = ctx.watchdog.phase();
    let robot_control = ctx.robot_control.load(Ordering::Relaxed);
    crate::watchdog::apply_watchdog_overlay(&mut frame, phase, robot_control);

    // Live↔Stale 边沿各鸣叫恰好一次；播放 fire-and-forget
    let signal = frame.flags.signal_received();
    match state.prev_signal {
        Some(true) if !signal => {
            warn!("no command received; motion zeroed");
            cues.play(Cue::SignalLost);
        },
        Some(false) if signal => {
            debug!("command link restored");
            cues.play(Cue::SignalRestored);
        },
        _ => {},
    }
    state.prev_signal = Some(signal);

    link.write_all(&frame.encode())?;
    spin_sleep::sleep(config.post_write_delay);
    Ok(())
}
