//! 提示音钩子
//!
//! 播放属于外设协作方；核心只通过本 trait 触发。实现必须
//! fire-and-forget：推荐 `try_send` 进通道，绝不阻塞串口周期。

use crossbeam_channel::Sender;
use tracing::info;

/// 提示音种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Live→Stale 边沿，恰好一次
    SignalLost,
    /// Stale→Live 边沿，恰好一次
    SignalRestored,
    /// 低电压周期告警（可被管理面抑制）
    BatteryLow,
    /// 危险电压周期告警（不可抑制）
    BatteryCritical,
}

/// 提示音出口
///
/// # 性能要求
///
/// - 非阻塞：实现必须立即返回
/// - 禁止在实现里做 I/O、加锁或分配后等待
pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// 丢弃一切提示音（测试用）
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn play(&self, _cue: Cue) {}
}

/// 记录到日志的实现（无蜂鸣器硬件时的默认出口）
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn play(&self, cue: Cue) {
        info!(?cue, "cue");
    }
}

/// 经由通道转发给外设线程的实现
///
/// 通道满或对端退出时静默丢弃，播放永不阻塞帧发送。
pub struct ChannelCueSink {
    tx: Sender<Cue>,
}

impl ChannelCueSink {
    pub fn new(tx: Sender<Cue>) -> Self {
        Self { tx }
    }
}

impl CueSink for ChannelCueSink {
    fn play(&self, cue: Cue) {
        let _ = self.tx.try_send(cue);
    }
}
