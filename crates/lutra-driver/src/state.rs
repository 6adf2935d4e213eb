//! 共享控制状态定义
//!
//! 进程内唯一一份 [`BridgeContext`]，以 `Arc` 分享给每个活动。
//! 每组字段有且只有一种同步机制：
//!
//! - 热数据（每周期整体替换、读多写少）：`ArcSwap`
//! - 写路径互斥（指令帧内容、蓄力锁存）：`parking_lot::Mutex`
//! - 单字段标志：原子类型

use crate::latch::ArmingLatch;
use crate::watchdog::Watchdog;
use arc_swap::ArcSwap;
use lutra_protocol::{CommandFrame, DeviceStatus};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 相机球观测（外部图像管线的注入边界）
///
/// 整体替换，不做增量更新；坐标滤波在串口周期一侧进行。
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct BallSight {
    /// 是否检出球
    pub visible: bool,
    /// 图像 X 坐标（0-639 px）
    pub x: f32,
    /// 球距（mm）
    pub y: f32,
}

/// 电池电压分级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BatteryLevel {
    #[default]
    Normal,
    Low,
    Critical,
}

/// 机器人健康状态（只读诊断出口）
///
/// 一旦降级即锁存，不自动清除；不直接参与动作门控
/// （动作安全完全由看门狗负责）。
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RobotHealth {
    pub level: BatteryLevel,
    /// 错误码（电池异常为 2）
    pub code: u32,
    pub message: String,
}

/// 进程级共享控制状态
///
/// 各活动的读写边界：
/// - 串口周期：写 `device_status`/`health`，读其余全部
/// - 网络接收：写 `command`/`kick`/`chip`/`watchdog`
/// - 蓄力 ticker：写 `kick`/`chip`
/// - 相机接收：写 `ball`
/// - 状态广播与管理面：只读（加 `alarm_suppressed` 一个布尔）
pub struct BridgeContext {
    /// 本机器人 id（网络指令按它过滤）
    pub robot_id: u32,

    /// 最近一次成功解码的底板状态（每接收周期整体替换）
    pub device_status: ArcSwap<DeviceStatus>,

    /// 外发指令帧内容（翻译器写入，串口周期读取并叠加）
    ///
    /// 网络与串口两侧之间只保证 last-write-wins；
    /// 没有新指令时串口周期会重发未变化的帧。
    pub command: Mutex<CommandFrame>,

    /// 直踢蓄力锁存
    pub kick: Mutex<ArmingLatch>,

    /// 挑踢蓄力锁存
    pub chip: Mutex<ArmingLatch>,

    /// 指令失联看门狗
    pub watchdog: Watchdog,

    /// 最近一次相机球观测
    pub ball: ArcSwap<BallSight>,

    /// 健康状态（锁存直到外部确认）
    pub health: ArcSwap<RobotHealth>,

    /// 低电压警报抑制（管理面效果，只被告警消费）
    pub alarm_suppressed: AtomicBool,

    /// 机上控制模式（抑制 Stale 清零，置位标志字节 Bit 6）
    pub robot_control: AtomicBool,

    /// 停机标志，每个活动每次迭代观察一次
    running: AtomicBool,
}

impl BridgeContext {
    pub fn new(robot_id: u32) -> Arc<Self> {
        Arc::new(Self {
            robot_id,
            device_status: ArcSwap::from_pointee(DeviceStatus::default()),
            // 首次网络指令到达前，串口周期发送开机帧
            command: Mutex::new(CommandFrame::startup()),
            kick: Mutex::new(ArmingLatch::default()),
            chip: Mutex::new(ArmingLatch::default()),
            watchdog: Watchdog::new(),
            ball: ArcSwap::from_pointee(BallSight::default()),
            health: ArcSwap::from_pointee(RobotHealth::default()),
            alarm_suppressed: AtomicBool::new(false),
            robot_control: AtomicBool::new(false),
            running: AtomicBool::new(true),
        })
    }

    /// 管理面效果：抑制/恢复低电压告警（危险电压告警不受影响）
    pub fn set_alarm_suppressed(&self, suppressed: bool) {
        self.alarm_suppressed.store(suppressed, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// 请求所有活动停机（每个活动在一次迭代内观察到）
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
