//! 对外的桥接器句柄
//!
//! 封装后台线程的启动、停机与 join。启动期资源获取（串口）
//! 失败即返回错误；运行期故障按周期降级，不终止进程。

use crate::cues::{CueSink, LogCueSink};
use crate::cycle::{CycleConfig, serial_loop};
use crate::latch::arming_loop;
use crate::monitor::alert_loop;
use crate::state::BridgeContext;
use lutra_link::SerialTransport;
use std::sync::Arc;
use std::thread::{JoinHandle, spawn};
use tracing::{info, warn};

/// 常驻活动的持有者
///
/// Drop 时自动停机并 join 全部线程；显式调用
/// [`shutdown`](Self::shutdown) 可提前完成同样的动作。
pub struct Bridge {
    ctx: Arc<BridgeContext>,
    threads: Vec<JoinHandle<()>>,
}

impl Bridge {
    /// 共享控制状态句柄（网络活动与诊断出口使用）
    pub fn context(&self) -> Arc<BridgeContext> {
        Arc::clone(&self.ctx)
    }

    /// 请求停机并 join 全部后台线程
    ///
    /// 每个活动在一次迭代内观察到停机标志并释放其 IO 资源。
    pub fn shutdown(&mut self) {
        self.ctx.shutdown();
        for handle in self.threads.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                warn!(thread = %name, "bridge thread panicked before join");
            }
        }
        info!("bridge stopped");
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 桥接器装配
pub struct BridgeBuilder {
    robot_id: u32,
    cues: Arc<dyn CueSink>,
    config: CycleConfig,
}

impl BridgeBuilder {
    pub fn new(robot_id: u32) -> Self {
        Self {
            robot_id,
            cues: Arc::new(LogCueSink),
            config: CycleConfig::default(),
        }
    }

    /// 替换提示音出口（默认记录到日志）
    pub fn cue_sink(mut self, cues: Arc<dyn CueSink>) -> Self {
        self.cues = cues;
        self
    }

    /// 覆盖串口周期参数
    pub fn cycle_config(mut self, config: CycleConfig) -> Self {
        self.config = config;
        self
    }

    /// 启动串口周期、蓄力 ticker 与电池告警三个常驻活动
    ///
    /// 链路已在调用方打开成功（失败属于致命启动错误，在那里
    /// 直接向上传播），这里只负责移交与线程装配。
    pub fn spawn<L>(self, link: L) -> Bridge
    where
        L: SerialTransport + Send + 'static,
    {
        let ctx = BridgeContext::new(self.robot_id);
        info!(robot_id = self.robot_id, "starting bridge activities");

        let mut threads = Vec::new();
        {
            let ctx = Arc::clone(&ctx);
            let cues = Arc::clone(&self.cues);
            let config = self.config.clone();
            threads.push(spawn(move || serial_loop(link, ctx, cues, config)));
        }
        {
            let ctx = Arc::clone(&ctx);
            threads.push(spawn(move || arming_loop(ctx)));
        }
        {
            let ctx = Arc::clone(&ctx);
            let cues = Arc::clone(&self.cues);
            threads.push(spawn(move || alert_loop(ctx, cues)));
        }

        Bridge { ctx, threads }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::NullCueSink;
    use lutra_link::MockLink;
    use std::time::Duration;

    #[test]
    fn test_bridge_spawns_and_shuts_down() {
        let link = MockLink::default();
        let mut bridge = BridgeBuilder::new(7)
            .cue_sink(Arc::new(NullCueSink))
            .cycle_config(CycleConfig {
                read_timeout: Duration::from_millis(5),
                post_write_delay: Duration::ZERO,
            })
            .spawn(link);

        let ctx = bridge.context();
        assert_eq!(ctx.robot_id, 7);
        assert!(ctx.is_running());

        bridge.shutdown();
        assert!(!ctx.is_running());
    }

    #[test]
    fn test_drop_stops_activities() {
        let ctx = {
            let bridge = BridgeBuilder::new(0)
                .cue_sink(Arc::new(NullCueSink))
                .spawn(MockLink::default());
            bridge.context()
        };
        assert!(!ctx.is_running());
    }
}
