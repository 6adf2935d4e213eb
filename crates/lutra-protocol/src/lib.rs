//! # Lutra Protocol
//!
//! 机器人底板串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量定义（前导码、载荷长度、缩放系数）
//! - `status`: 底板状态帧解析（底板 → 桥接器）
//! - `command`: 指令帧构建（桥接器 → 底板）
//! - `scanner`: 前导码流式重同步
//!
//! ## 字节序
//!
//! 状态载荷按大端解析；指令帧按小端序列化，无填充。
//! 单字节内的位域为 LSB first，与 bilge 默认位序一致。

pub mod command;
pub mod constants;
pub mod scanner;
pub mod status;

// 重新导出常用类型
pub use command::*;
pub use constants::*;
pub use scanner::*;
pub use status::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Truncated status payload: expected {expected}, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },
}

/// SI 单位速度转设备单位
///
/// 切向/法向速度（m/s）与角速度（rad/s）统一 ×1000 转为有符号 16 位
/// 设备单位。超出 i16 表示范围时饱和截断，不回绕。
pub fn si_to_device_units(value: f32) -> i16 {
    let scaled = value * 1000.0;
    if scaled >= i16::MAX as f32 {
        i16::MAX
    } else if scaled <= i16::MIN as f32 {
        i16::MIN
    } else {
        scaled as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_to_device_units() {
        assert_eq!(si_to_device_units(1.0), 1000);
        assert_eq!(si_to_device_units(-0.5), -500);
        assert_eq!(si_to_device_units(0.0), 0);
    }

    #[test]
    fn test_si_to_device_units_saturates() {
        assert_eq!(si_to_device_units(40.0), i16::MAX);
        assert_eq!(si_to_device_units(-40.0), i16::MIN);
    }
}
