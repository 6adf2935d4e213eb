//! 指令失联看门狗
//!
//! 以应用启动为锚的单调时间存入 AtomicU64，无锁读写，
//! 不受系统时钟调整（NTP、手动改时）影响。

use lutra_protocol::CommandFrame;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 超过该时长未收到网络指令即 Stale：清零运动/执行器字段
pub const NO_RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// 超过该时长即 Dead：追加停止电容充电
pub const CHARGE_STOP_TIMEOUT: Duration = Duration::from_secs(15);

/// 单调时间锚点，首次访问设置，之后不变
static APP_START: OnceLock<Instant> = OnceLock::new();

fn monotonic_micros() -> u64 {
    let start = APP_START.get_or_init(Instant::now);
    start.elapsed().as_micros() as u64
}

/// 指令链路分级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPhase {
    /// < 1 s：正常
    Live,
    /// 1 s – 15 s：清零运动字段、清信号接收位
    Stale,
    /// ≥ 15 s：追加清充电位
    Dead,
}

impl LinkPhase {
    /// 由失联时长导出分级（纯函数，便于测试）
    pub fn from_elapsed(elapsed: Duration) -> Self {
        if elapsed >= CHARGE_STOP_TIMEOUT {
            LinkPhase::Dead
        } else if elapsed > NO_RECV_TIMEOUT {
            LinkPhase::Stale
        } else {
            LinkPhase::Live
        }
    }
}

/// 最近一次网络接收时刻的持有者
pub struct Watchdog {
    last_recv_us: AtomicU64,
}

impl Watchdog {
    /// 以当前时刻初始化（开机后 1 s 内视为 Live）
    pub fn new() -> Self {
        Self {
            last_recv_us: AtomicU64::new(monotonic_micros()),
        }
    }

    /// 网络收到数据报时调用
    pub fn touch(&self) {
        self.last_recv_us.store(monotonic_micros(), Ordering::Relaxed);
    }

    /// 距最近一次接收经过的时长
    pub fn elapsed(&self) -> Duration {
        let last = self.last_recv_us.load(Ordering::Relaxed);
        Duration::from_micros(monotonic_micros().saturating_sub(last))
    }

    /// 当前链路分级
    pub fn phase(&self) -> LinkPhase {
        LinkPhase::from_elapsed(self.elapsed())
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

/// 发送前对指令帧应用看门狗覆盖
///
/// Stale/Dead 时清零速度、带球、踢挑功率并清信号接收位；
/// Dead 追加清充电位。机上控制模式抑制 Stale 清零（充电停止
/// 不受抑制），并置位标志字节的机上控制位。
pub fn apply_watchdog_overlay(frame: &mut CommandFrame, phase: LinkPhase, robot_control: bool) {
    if phase != LinkPhase::Live && !robot_control {
        frame.vel_x = 0;
        frame.vel_y = 0;
        frame.vel_ang = 0;
        frame.dribble_power = 0;
        frame.kick_power = 0;
        frame.chip_power = 0;
        frame.flags.set_signal_received(false);
    } else {
        frame.flags.set_signal_received(true);
    }

    if phase == LinkPhase::Dead {
        frame.flags.set_do_charge(false);
    }

    frame.flags.set_robot_control(robot_control);
}
