//! 踢球类执行器的定时蓄力锁存
//!
//! 单条触发指令保证有界的动作脉冲：置位后 500 ms 由独立 ticker
//! 强制解除，与后续网络指令到达与否无关。

use crate::state::BridgeContext;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 蓄力保持时长：Idle→Armed 之后经过该时长强制回到 Idle
pub const KICK_HOLD: Duration = Duration::from_millis(500);

/// 蓄力 ticker 节拍
pub const ARMING_TICK: Duration = Duration::from_millis(16);

/// 单个执行器的蓄力锁存（kick 与 chip 各一个）
///
/// 状态 {Idle, Armed}。Idle→Armed 记录触发时刻与缩放后的功率；
/// Armed→Idle 由 [`tick`](Self::tick) 在保持时长届满时强制发生，
/// 同时清零存储功率。
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmingLatch {
    armed_at: Option<Instant>,
    power: u8,
}

impl ArmingLatch {
    /// 正功率请求触发蓄力
    ///
    /// 已处于 Armed 时仅更新功率，保持时长仍从最初的
    /// Idle→Armed 转换起算。
    pub fn arm(&mut self, power: u8, now: Instant) {
        if self.armed_at.is_none() {
            self.armed_at = Some(now);
        }
        self.power = power;
    }

    /// ticker 每拍调用一次；发生解除时返回 `true`
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(armed_at) if now.duration_since(armed_at) >= KICK_HOLD => {
                self.armed_at = None;
                self.power = 0;
                true
            },
            _ => false,
        }
    }

    /// 强制回到 Idle（紧急停止时使用）
    pub fn disarm(&mut self) {
        self.armed_at = None;
        self.power = 0;
    }

    /// Armed 期间为存储功率，否则为 0
    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }
}

/// 固定节拍的蓄力 ticker
///
/// 每拍独立评估两个锁存；每次迭代观察停机标志。
pub fn arming_loop(ctx: Arc<BridgeContext>) {
    while ctx.is_running() {
        let now = Instant::now();
        if ctx.kick.lock().tick(now) {
            debug!("kick latch disarmed after hold");
        }
        if ctx.chip.lock().tick(now) {
            debug!("chip latch disarmed after hold");
        }
        spin_sleep::sleep(ARMING_TICK);
    }
    info!("arming ticker exited");
}
