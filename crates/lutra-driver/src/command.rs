//! 网络运动指令 → 指令帧内容的翻译
//!
//! 每条被接受的入站指令调用一次 [`apply_command`]，结果写入
//! 共享状态的指令帧；看门狗与坐标滤波的覆盖发生在发送时刻。

use crate::latch::ArmingLatch;
use crate::state::BridgeContext;
use lutra_protocol::{
    CommandFrame, DIRECT_KICK_THRESHOLD, DRIBBLE_POWER_MAX, KICK_POWER_SCALE, si_to_device_units,
};
use std::time::Instant;
use tracing::{debug, info};

/// 全场紧急停止的保留 id
///
/// 发往该 id 的指令绕过整条翻译链，强制输出紧急停止帧，
/// 并优先于同批次中发给本机 id 的任何指令。
/// （历史上还存在 id = self+100 的姿态复位哨兵，已移除。）
pub const EMERGENCY_STOP_ID: u32 = 255;

/// 入站运动指令（机器人相对速度表示，预先算好）
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct MotionCommand {
    /// 目标机器人 id
    pub id: u32,
    /// 切向速度（m/s）
    pub vel_tangent: f32,
    /// 法向速度（m/s）
    pub vel_normal: f32,
    /// 角速度（rad/s）
    pub vel_angular: f32,
    /// 直踢速度请求（≥100 表示 direct 模式，使用前减去 100）
    pub kick_speed: f32,
    /// 挑踢速度请求（同上）
    pub chip_speed: f32,
    /// 带球电机开关
    pub spinner: bool,
    /// 带球电机功率请求 [0, 100]
    pub dribble_power: f32,
}

/// 把一条运动指令翻译进共享指令帧
///
/// 紧急停止哨兵之外的路径：
/// 1. 速度请求 ≥100 视为 direct 模式并减去偏移
/// 2. SI 速度 ×1000 饱和转为 i16 设备单位
/// 3. 带球功率在 spinner 打开时截断到 [0,100]，否则为 0
/// 4. 正速度请求触发对应蓄力锁存；发送功率来自锁存
/// 5. 清紧急停止位、按 1 置 direct 位、置充电位
pub fn apply_command(ctx: &BridgeContext, cmd: &MotionCommand, now: Instant) {
    if cmd.id == EMERGENCY_STOP_ID {
        apply_emergency_stop(ctx);
        return;
    }

    let (kick_speed, direct_kick) = split_direct(cmd.kick_speed);
    let (chip_speed, direct_chip) = split_direct(cmd.chip_speed);

    let mut frame = CommandFrame::default();
    frame.vel_x = si_to_device_units(cmd.vel_tangent);
    frame.vel_y = si_to_device_units(cmd.vel_normal);
    frame.vel_ang = si_to_device_units(cmd.vel_angular);

    if cmd.spinner {
        frame.dribble_power = cmd.dribble_power.clamp(0.0, DRIBBLE_POWER_MAX) as u8;
    }

    frame.kick_power = arm_if_requested(&ctx.kick, kick_speed, now);
    frame.chip_power = arm_if_requested(&ctx.chip, chip_speed, now);

    frame.flags.set_emergency_stop(false);
    frame.flags.set_direct_kick(direct_kick);
    frame.flags.set_direct_chip(direct_chip);
    frame.flags.set_do_charge(true);

    if kick_speed > 0.0 || chip_speed > 0.0 {
        debug!(
            id = cmd.id,
            kick = cmd.kick_speed,
            chip = cmd.chip_speed,
            direct_kick,
            direct_chip,
            "actuation requested"
        );
    }

    *ctx.command.lock() = frame;
}

/// 哨兵路径：固定紧急停止帧、解除两个锁存
fn apply_emergency_stop(ctx: &BridgeContext) {
    info!("emergency stop commanded for all robots");
    ctx.kick.lock().disarm();
    ctx.chip.lock().disarm();
    *ctx.command.lock() = CommandFrame::emergency_stop();
}

/// direct 模式解码：请求 ≥100 时减去偏移并返回标记
fn split_direct(speed: f32) -> (f32, bool) {
    if speed >= DIRECT_KICK_THRESHOLD {
        (speed - DIRECT_KICK_THRESHOLD, true)
    } else {
        (speed, false)
    }
}

/// 正速度请求触发锁存，返回当拍应发送的功率
fn arm_if_requested(latch: &parking_lot::Mutex<ArmingLatch>, speed: f32, now: Instant) -> u8 {
    let mut latch = latch.lock();
    if speed > 0.0 {
        let power = (speed * KICK_POWER_SCALE).clamp(0.0, u8::MAX as f32) as u8;
        latch.arm(power, now);
    }
    latch.power()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd_for(id: u32) -> MotionCommand {
        MotionCommand {
            id,
            vel_tangent: 1.0,
            vel_normal: 0.0,
            vel_angular: 0.0,
            ..MotionCommand::default()
        }
    }

    /// 端到端：veltangent=1.0 ⇒ vel_x=1000，其余为 0，充电置位
    #[test]
    fn test_basic_translation() {
        let ctx = BridgeContext::new(1);
        apply_command(&ctx, &cmd_for(1), Instant::now());

        let frame = *ctx.command.lock();
        assert_eq!(frame.vel_x, 1000);
        assert_eq!(frame.vel_y, 0);
        assert_eq!(frame.vel_ang, 0);
        assert_eq!(frame.kick_power, 0);
        assert_eq!(frame.chip_power, 0);
        assert!(frame.flags.do_charge());
        assert!(!frame.flags.emergency_stop());
    }

    /// 直踢解码：kick_speed=130 ⇒ direct 置位，锁存功率 = clamp(30×10) = 255
    #[test]
    fn test_direct_kick_decoding() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.kick_speed = 130.0;
        apply_command(&ctx, &cmd, Instant::now());

        let frame = *ctx.command.lock();
        assert!(frame.flags.direct_kick());
        assert!(!frame.flags.direct_chip());
        assert_eq!(frame.kick_power, 255);
        assert!(ctx.kick.lock().is_armed());
    }

    #[test]
    fn test_chip_arming_scales_power() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.chip_speed = 5.0;
        apply_command(&ctx, &cmd, Instant::now());

        let frame = *ctx.command.lock();
        assert_eq!(frame.chip_power, 50);
        assert!(!frame.flags.direct_chip());
        assert!(ctx.chip.lock().is_armed());
        assert!(!ctx.kick.lock().is_armed());
    }

    #[test]
    fn test_dribble_power_clamped_by_spinner() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.spinner = true;
        cmd.dribble_power = 140.0;
        apply_command(&ctx, &cmd, Instant::now());
        assert_eq!(ctx.command.lock().dribble_power, 100);

        cmd.spinner = false;
        apply_command(&ctx, &cmd, Instant::now());
        assert_eq!(ctx.command.lock().dribble_power, 0);
    }

    /// 幂等性：同一指令连续翻译两次产生相同帧内容
    #[test]
    fn test_translation_is_idempotent() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.kick_speed = 3.0;
        cmd.spinner = true;
        cmd.dribble_power = 60.0;

        let now = Instant::now();
        apply_command(&ctx, &cmd, now);
        let first = *ctx.command.lock();
        apply_command(&ctx, &cmd, now);
        let second = *ctx.command.lock();
        assert_eq!(first, second);
    }

    #[test]
    fn test_emergency_stop_sentinel() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.kick_speed = 5.0;
        apply_command(&ctx, &cmd, Instant::now());
        assert!(ctx.kick.lock().is_armed());

        apply_command(&ctx, &cmd_for(EMERGENCY_STOP_ID), Instant::now());
        let frame = *ctx.command.lock();
        assert!(frame.flags.emergency_stop());
        assert_eq!(frame.vel_x, 0);
        assert_eq!(frame.kick_power, 0);
        assert!(!ctx.kick.lock().is_armed());
        assert!(!ctx.chip.lock().is_armed());
    }

    #[test]
    fn test_velocity_clamps_on_overflow() {
        let ctx = BridgeContext::new(1);
        let mut cmd = cmd_for(1);
        cmd.vel_tangent = 100.0;
        cmd.vel_normal = -100.0;
        apply_command(&ctx, &cmd, Instant::now());
        let frame = *ctx.command.lock();
        assert_eq!(frame.vel_x, i16::MAX);
        assert_eq!(frame.vel_y, i16::MIN);
    }
}
