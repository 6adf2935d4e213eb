//! 指令帧构建（桥接器 → 底板）
//!
//! 固定 19 字节小端布局，无填充。标志字节仅在本序列化边界打包，
//! 内部一律以具名布尔位域表示。

use crate::constants::{COMMAND_FRAME_LEN, COMMAND_PREAMBLE};
use bilge::prelude::*;

/// 指令帧标志位域（Byte 18）
///
/// 协议定义（单字节内 Bit 0 为 LSB）：
/// - Bit 0: 紧急停止
/// - Bit 1: 直踢（跳过正常蓄力延迟）
/// - Bit 2: 直挑
/// - Bit 3: 保留
/// - Bit 4: 电容充电
/// - Bit 5: 信号接收中
/// - Bit 6: 机上控制模式
/// - Bit 7: 保留（奇偶位，未使用）
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfoFlags {
    pub emergency_stop: bool, // Bit 0: 紧急停止
    pub direct_kick: bool,    // Bit 1: 直踢
    pub direct_chip: bool,    // Bit 2: 直挑
    pub reserved0: bool,      // Bit 3: 保留
    pub do_charge: bool,      // Bit 4: 电容充电
    pub signal_received: bool, // Bit 5: 信号接收中
    pub robot_control: bool,  // Bit 6: 机上控制模式
    pub reserved1: bool,      // Bit 7: 保留
}

/// 外发指令帧的内存模型
///
/// 每个串口周期由看门狗与坐标滤波覆盖后整帧发送。
/// 相对位置三个字段为保留字段，当前始终为 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFrame {
    /// 切向速度（设备单位 = SI × 1000）
    pub vel_x: i16,
    /// 法向速度（设备单位 = SI × 1000）
    pub vel_y: i16,
    /// 角速度（设备单位 = SI × 1000）
    pub vel_ang: i16,
    /// 带球电机功率 [0, 100]
    pub dribble_power: u8,
    /// 直踢功率
    pub kick_power: u8,
    /// 挑踢功率（设备单位 = 请求 × 10）
    pub chip_power: u8,
    /// 相对位置 X（保留，始终 0）
    pub relative_x: i16,
    /// 相对位置 Y（保留，始终 0）
    pub relative_y: i16,
    /// 相对角度（保留，始终 0）
    pub relative_theta: i16,
    /// 相机球 X 坐标（0-255，原始 0-639px 缩放）
    pub cam_ball_x: u8,
    /// 相机球 Y 坐标（球距，mm/10）
    pub cam_ball_y: u8,
    /// 标志位域
    pub flags: InfoFlags,
}

impl CommandFrame {
    /// 首个网络指令到达前串口周期发送的帧
    ///
    /// 全零速度，仅置位电容充电。
    pub fn startup() -> Self {
        let mut flags = InfoFlags::default();
        flags.set_do_charge(true);
        Self {
            flags,
            ..Self::default()
        }
    }

    /// 全场紧急停止帧
    ///
    /// 零速度、置位紧急停止，执行器字段保持中立编码。
    pub fn emergency_stop() -> Self {
        let mut flags = InfoFlags::default();
        flags.set_emergency_stop(true);
        Self {
            flags,
            ..Self::default()
        }
    }

    /// 序列化为 19 字节线材布局（小端，无填充）
    pub fn encode(&self) -> [u8; COMMAND_FRAME_LEN] {
        let mut bytes = [0u8; COMMAND_FRAME_LEN];
        bytes[0] = COMMAND_PREAMBLE;
        bytes[1..3].copy_from_slice(&self.vel_x.to_le_bytes());
        bytes[3..5].copy_from_slice(&self.vel_y.to_le_bytes());
        bytes[5..7].copy_from_slice(&self.vel_ang.to_le_bytes());
        bytes[7] = self.dribble_power;
        bytes[8] = self.kick_power;
        bytes[9] = self.chip_power;
        bytes[10..12].copy_from_slice(&self.relative_x.to_le_bytes());
        bytes[12..14].copy_from_slice(&self.relative_y.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.relative_theta.to_le_bytes());
        bytes[16] = self.cam_ball_x;
        bytes[17] = self.cam_ball_y;
        bytes[18] = u8::from(self.flags);
        bytes
    }
}
