//! 传感坐标滤波
//!
//! 吸收相机坐标单帧掉零，但不掩盖持续超过约 5 个周期的
//! 真实"未检出"状态。

use crate::state::BallSight;

/// 连续零值的容忍次数，超过后零值原样通过
pub const ZERO_TOLERANCE: u32 = 5;

/// 单轴零值滤波器
///
/// 读数为 0 时累加零值计数：计数 ≤ 容忍次数输出最近的好值，
/// 超过则输出 0（计数保持）。任何非零读数复位计数并记录好值。
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroDropoutFilter {
    last_good: u8,
    zero_streak: u32,
}

impl ZeroDropoutFilter {
    pub fn apply(&mut self, reading: u8) -> u8 {
        if reading == 0 {
            self.zero_streak = self.zero_streak.saturating_add(1);
            if self.zero_streak <= ZERO_TOLERANCE {
                self.last_good
            } else {
                0
            }
        } else {
            self.zero_streak = 0;
            self.last_good = reading;
            reading
        }
    }
}

/// 双轴相机球坐标滤波
///
/// X 轴先由像素（0-639）缩放到 0-255，Y 轴由毫米 ÷10，
/// 再各自独立过零值滤波。
#[derive(Debug, Clone, Copy, Default)]
pub struct BallFilter {
    x: ZeroDropoutFilter,
    y: ZeroDropoutFilter,
}

impl BallFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 输出滤波后的 (cam_ball_x, cam_ball_y)
    pub fn apply(&mut self, sight: &BallSight) -> (u8, u8) {
        let x_scaled = scale_to_u8(sight.x * 255.0 / 639.0);
        let y_scaled = scale_to_u8(sight.y / 10.0);
        (self.x.apply(x_scaled), self.y.apply(y_scaled))
    }
}

fn scale_to_u8(value: f32) -> u8 {
    if value >= u8::MAX as f32 {
        u8::MAX
    } else if value <= 0.0 {
        0
    } else {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 输入 [42,0,0,0,0,0,42] ⇒ 输出全 42（5 个零被替换）
    #[test]
    fn test_transient_zeros_substituted() {
        let mut filter = ZeroDropoutFilter::default();
        let input = [42u8, 0, 0, 0, 0, 0, 42];
        let output: Vec<u8> = input.iter().map(|&v| filter.apply(v)).collect();
        assert_eq!(output, vec![42, 42, 42, 42, 42, 42, 42]);
    }

    /// 第 6 个连续零才作为真实 0 通过
    #[test]
    fn test_sustained_zero_passes_through() {
        let mut filter = ZeroDropoutFilter::default();
        assert_eq!(filter.apply(42), 42);
        for _ in 0..5 {
            assert_eq!(filter.apply(0), 42);
        }
        assert_eq!(filter.apply(0), 0);
        // 计数保持，之后的零继续通过
        assert_eq!(filter.apply(0), 0);
    }

    #[test]
    fn test_nonzero_resets_streak() {
        let mut filter = ZeroDropoutFilter::default();
        filter.apply(10);
        for _ in 0..4 {
            filter.apply(0);
        }
        assert_eq!(filter.apply(7), 7);
        // 复位后重新容忍 5 个零
        for _ in 0..5 {
            assert_eq!(filter.apply(0), 7);
        }
        assert_eq!(filter.apply(0), 0);
    }

    #[test]
    fn test_axes_filter_independently() {
        let mut filter = BallFilter::new();
        let seen = BallSight { visible: true, x: 639.0, y: 500.0 };
        assert_eq!(filter.apply(&seen), (255, 50));

        // X 掉零被替换，Y 保持各自的历史
        let dropout = BallSight { visible: true, x: 0.0, y: 500.0 };
        assert_eq!(filter.apply(&dropout), (255, 50));
    }
}
