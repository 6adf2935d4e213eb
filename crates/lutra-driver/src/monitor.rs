//! 电池安全监视
//!
//! 每个串口周期在状态帧解码后分级一次；一旦降级即锁存，
//! 不自动清除。只暴露给诊断出口，不参与动作门控。

use crate::cues::{Cue, CueSink};
use crate::state::{BatteryLevel, BridgeContext, RobotHealth};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

/// 低电压警告阈值（0.1V 单位：140 = 14.0V）
pub const BATTERY_LOW_THRESHOLD: u8 = 140;

/// 危险电压阈值（0.1V 单位：135 = 13.5V）
pub const BATTERY_CRITICAL_THRESHOLD: u8 = 135;

/// 电池异常统一错误码
pub const BATTERY_ERROR_CODE: u32 = 2;

/// 告警检查节拍
const ALERT_TICK: Duration = Duration::from_millis(200);

/// 由电压读数导出分级（纯函数）
///
/// 边界含阈值本身：140 → Low，135 → Critical，141 → Normal。
pub fn battery_level(volt: u8) -> BatteryLevel {
    if volt <= BATTERY_CRITICAL_THRESHOLD {
        BatteryLevel::Critical
    } else if volt <= BATTERY_LOW_THRESHOLD {
        BatteryLevel::Low
    } else {
        BatteryLevel::Normal
    }
}

/// 更新健康状态分级
///
/// Normal 读数不触碰已锁存的降级状态；降级只会单调加深
/// （Low 不会覆盖已锁存的 Critical）。
pub fn classify_battery(ctx: &BridgeContext, volt: u8) {
    let level = battery_level(volt);
    let prior = ctx.health.load();

    let next = match (prior.level, level) {
        (_, BatteryLevel::Critical) if prior.level != BatteryLevel::Critical => Some(RobotHealth {
            level: BatteryLevel::Critical,
            code: BATTERY_ERROR_CODE,
            message: "battery critical (possible circuit fault)".to_string(),
        }),
        (BatteryLevel::Normal, BatteryLevel::Low) => Some(RobotHealth {
            level: BatteryLevel::Low,
            code: BATTERY_ERROR_CODE,
            message: "battery low".to_string(),
        }),
        _ => None,
    };

    if let Some(health) = next {
        warn!(volt, level = ?health.level, "battery classification raised");
        ctx.health.store(Arc::new(health));
    }
}

/// 当拍应发出的告警提示音（纯读）
///
/// 告警跟随实时电压读数：电压恢复即停止鸣叫；`health` 的锁存
/// 只服务诊断出口，同时充当门控，开机默认读数（volt = 0）在
/// 首次真实降级之前不会触发告警。低电压告警可被管理面抑制，
/// 危险电压告警不受抑制。
pub fn pending_alarm(ctx: &BridgeContext) -> Option<Cue> {
    if ctx.health.load().level == BatteryLevel::Normal {
        return None;
    }
    match battery_level(ctx.device_status.load().volt) {
        BatteryLevel::Critical => Some(Cue::BatteryCritical),
        BatteryLevel::Low if !ctx.alarm_suppressed.load(Ordering::Relaxed) => {
            Some(Cue::BatteryLow)
        },
        _ => None,
    }
}

/// 电池告警活动
pub fn alert_loop(ctx: Arc<BridgeContext>, cues: Arc<dyn CueSink>) {
    let mut since_last_alarm = Duration::ZERO;
    while ctx.is_running() {
        spin_sleep::sleep(ALERT_TICK);
        since_last_alarm += ALERT_TICK;
        if since_last_alarm < Duration::from_secs(1) {
            continue;
        }
        since_last_alarm = Duration::ZERO;

        if let Some(cue) = pending_alarm(&ctx) {
            cues.play(cue);
        }
    }
    info!("alert loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::NullCueSink;
    use lutra_protocol::DeviceStatus;

    fn store_volt(ctx: &BridgeContext, volt: u8) {
        ctx.device_status.store(Arc::new(DeviceStatus { volt, ..DeviceStatus::default() }));
        classify_battery(ctx, volt);
    }

    /// 电压边界：141→Normal，140→Low，135→Critical
    #[test]
    fn test_battery_boundaries() {
        assert_eq!(battery_level(141), BatteryLevel::Normal);
        assert_eq!(battery_level(140), BatteryLevel::Low);
        assert_eq!(battery_level(136), BatteryLevel::Low);
        assert_eq!(battery_level(135), BatteryLevel::Critical);
    }

    #[test]
    fn test_classification_latches() {
        let ctx = BridgeContext::new(0);
        classify_battery(&ctx, 140);
        assert_eq!(ctx.health.load().level, BatteryLevel::Low);
        assert_eq!(ctx.health.load().code, BATTERY_ERROR_CODE);

        // 电压恢复后仍然锁存
        classify_battery(&ctx, 160);
        assert_eq!(ctx.health.load().level, BatteryLevel::Low);
    }

    #[test]
    fn test_degradation_is_monotonic() {
        let ctx = BridgeContext::new(0);
        classify_battery(&ctx, 130);
        assert_eq!(ctx.health.load().level, BatteryLevel::Critical);

        // Low 读数不回退已锁存的 Critical
        classify_battery(&ctx, 140);
        assert_eq!(ctx.health.load().level, BatteryLevel::Critical);
    }

    /// 告警跟随实时电压：恢复即停止鸣叫，health 仍锁存
    #[test]
    fn test_alarm_follows_live_voltage() {
        let ctx = BridgeContext::new(0);
        // 开机默认读数（volt = 0）在首次真实降级前不告警
        assert_eq!(pending_alarm(&ctx), None);

        store_volt(&ctx, 140);
        assert_eq!(pending_alarm(&ctx), Some(Cue::BatteryLow));

        store_volt(&ctx, 160);
        assert_eq!(pending_alarm(&ctx), None);
        assert_eq!(ctx.health.load().level, BatteryLevel::Low);
    }

    /// 低电压告警可被抑制，危险电压告警不受抑制
    #[test]
    fn test_suppression_spares_critical_alarm() {
        let ctx = BridgeContext::new(0);
        store_volt(&ctx, 140);
        ctx.set_alarm_suppressed(true);
        assert_eq!(pending_alarm(&ctx), None);

        store_volt(&ctx, 135);
        assert_eq!(pending_alarm(&ctx), Some(Cue::BatteryCritical));

        ctx.set_alarm_suppressed(false);
        store_volt(&ctx, 140);
        assert_eq!(pending_alarm(&ctx), Some(Cue::BatteryLow));
    }

    #[test]
    fn test_alert_loop_observes_shutdown() {
        let ctx = BridgeContext::new(0);
        ctx.shutdown();
        // 停机后立即返回
        alert_loop(ctx, Arc::new(NullCueSink));
    }
}
