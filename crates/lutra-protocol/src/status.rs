//! 底板状态帧解析（底板 → 桥接器）
//!
//! 前导码之后为 3 字节载荷，按大端解析：`volt, sensor, cap_power`。

use crate::ProtocolError;
use crate::constants::STATUS_PAYLOAD_LEN;
use bilge::prelude::*;

/// 传感器状态位域（载荷 Byte 1）
///
/// 协议定义（单字节内 Bit 0 为 LSB）：
/// - Bit 0: 光电传感器检出
/// - Bit 1: 带球传感器检出
/// - Bit 2: 新型带球机构
/// - Bit 3-7: 保留
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorBits {
    pub photo_sensor: bool,    // Bit 0: 光电传感器检出
    pub dribbler_contact: bool, // Bit 1: 带球传感器检出
    pub new_dribbler: bool,    // Bit 2: 新型带球机构
    pub reserved: u5,          // Bit 3-7: 保留
}

/// 底板状态（每个接收周期整体替换，始终为最近一次成功解码的载荷）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceStatus {
    /// 电池电压（0.1V 单位，150 = 15.0V）
    pub volt: u8,
    /// 传感器状态位域
    #[cfg_attr(feature = "serde", serde(skip))]
    pub sensor: SensorBits,
    /// 电容充电量
    pub cap_power: u8,
}

impl DeviceStatus {
    /// 从前导码之后的状态载荷解析
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() < STATUS_PAYLOAD_LEN {
            return Err(ProtocolError::TruncatedPayload {
                expected: STATUS_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        Ok(Self {
            volt: payload[0],
            sensor: SensorBits::from(payload[1]),
            cap_power: payload[2],
        })
    }

    /// 电池电压（伏特）
    pub fn volt_f32(&self) -> f32 {
        self.volt as f32 * 0.1
    }
}
