//! 机载控制桥主入口
//!
//! 装配顺序：日志 → 串口 → UDP 套接字 → 核心活动 → 网络活动。
//! 启动期资源获取失败直接退出；运行期故障由各活动按周期降级。

use anyhow::{Context, Result};
use clap::Parser;
use lutra_driver::BridgeBuilder;
use lutra_link::SerialLink;
use lutra_net::{VisionTuning, camera_loop, command_loop, status_loop};
use std::net::{SocketAddr, UdpSocket};
use std::path::PathBuf;
use tracing::info;

/// Lutra 机载控制桥
///
/// 在比赛控制网络与底板串口之间转译指令与状态
#[derive(Parser, Debug)]
#[command(name = "lutra-bridge")]
#[command(about = "Onboard control bridge: UDP commands in, serial frames out", long_about = None)]
#[command(version)]
struct Args {
    /// 本机器人 id（网络指令按它过滤）
    #[arg(long, default_value = "0")]
    robot_id: u32,

    /// 底板串口设备
    #[arg(long, default_value = "/dev/serial0")]
    serial: String,

    /// 串口波特率
    #[arg(long, default_value = "230400")]
    baud: u32,

    /// 运动指令接收端口（UDP）
    #[arg(long, default_value = "20011")]
    command_port: u16,

    /// 相机观测接收端口（UDP）
    #[arg(long, default_value = "31133")]
    camera_port: u16,

    /// 状态广播目标地址
    #[arg(long, default_value = "224.5.69.4:16941")]
    status_target: SocketAddr,

    /// 视觉阈值文档路径
    #[arg(long, default_value = "threshold.json")]
    tuning_file: PathBuf,
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lutra_bridge=info".parse().unwrap())
                .add_directive("lutra_driver=info".parse().unwrap())
                .add_directive("lutra_net=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    info!(
        robot_id = args.robot_id,
        serial = %args.serial,
        baud = args.baud,
        "lutra-bridge starting"
    );

    // 启动期资源获取，任一失败即退出
    let link = SerialLink::open(&args.serial, args.baud)
        .with_context(|| format!("failed to open serial port {}", args.serial))?;
    let command_socket = UdpSocket::bind(("0.0.0.0", args.command_port))
        .with_context(|| format!("failed to bind command port {}", args.command_port))?;
    let camera_socket = UdpSocket::bind(("0.0.0.0", args.camera_port))
        .with_context(|| format!("failed to bind camera port {}", args.camera_port))?;
    let status_socket =
        UdpSocket::bind(("0.0.0.0", 0)).context("failed to bind status egress socket")?;

    let tuning = VisionTuning::load_or_create(&args.tuning_file);

    // 核心活动（串口周期、蓄力 ticker、电池告警）
    let mut bridge = BridgeBuilder::new(args.robot_id).spawn(link);
    let ctx = bridge.context();

    // 网络活动
    let mut net_threads = Vec::new();
    {
        let ctx = bridge.context();
        net_threads.push(std::thread::spawn(move || command_loop(command_socket, ctx)));
    }
    {
        let ctx = bridge.context();
        net_threads.push(std::thread::spawn(move || camera_loop(camera_socket, ctx)));
    }
    {
        let ctx = bridge.context();
        let target = args.status_target;
        net_threads
            .push(std::thread::spawn(move || status_loop(status_socket, target, ctx, tuning)));
    }

    // Ctrl+C 优雅退出：置停机标志，各活动在一次迭代内退出
    {
        let ctx = bridge.context();
        ctrlc::set_handler(move || {
            info!("interrupt received; shutting down");
            ctx.shutdown();
        })
        .context("failed to set signal handler")?;
    }

    info!("lutra-bridge started");
    while ctx.is_running() {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    bridge.shutdown();
    for handle in net_threads {
        let _ = handle.join();
    }
    info!("lutra-bridge exited");
    Ok(())
}
