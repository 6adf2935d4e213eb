//! # Lutra Driver
//!
//! 桥接器驱动层：共享控制状态与各常驻活动。
//!
//! - 串口周期：收一帧底板状态，叠加看门狗/滤波/蓄力锁存后发一帧指令
//! - 蓄力 ticker：固定 16 ms 节拍，500 ms 后自动解除踢球锁存
//! - 看门狗：指令失联分级降级（Live / Stale / Dead）
//! - 安全监视：电池电压分级，锁存直到外部确认
//!
//! 所有共享字段都有唯一的同步纪律（ArcSwap / Mutex / Atomic），
//! 任何活动都不做无同步并发访问。

mod bridge;
pub mod command;
pub mod cues;
pub mod cycle;
mod error;
pub mod filter;
pub mod latch;
pub mod monitor;
pub mod state;
pub mod watchdog;

pub use bridge::{Bridge, BridgeBuilder};
pub use command::{EMERGENCY_STOP_ID, MotionCommand, apply_command};
pub use cues::{ChannelCueSink, Cue, CueSink, LogCueSink, NullCueSink};
pub use cycle::{CycleConfig, run_cycle, serial_loop};
pub use error::DriverError;
pub use filter::{BallFilter, ZERO_TOLERANCE, ZeroDropoutFilter};
pub use latch::{ARMING_TICK, ArmingLatch, KICK_HOLD, arming_loop};
pub use monitor::{
    BATTERY_CRITICAL_THRESHOLD, BATTERY_LOW_THRESHOLD, alert_loop, battery_level, classify_battery,
    pending_alarm,
};
pub use state::{BallSight, BatteryLevel, BridgeContext, RobotHealth};
pub use watchdog::{
    CHARGE_STOP_TIMEOUT, LinkPhase, NO_RECV_TIMEOUT, Watchdog, apply_watchdog_overlay,
};
