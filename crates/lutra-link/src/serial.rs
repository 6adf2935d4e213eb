//! serialport 后端
//!
//! 打开/配置失败在本层即报错并向上传播：按错误处理设计，
//! 缺少硬件资源时进程在启动期终止，不做静默重试。

use crate::{LinkDeviceError, LinkDeviceErrorKind, LinkError, RxLink, SerialTransport, TxLink};
use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::info;

/// 默认单字节读取超时
///
/// 串口周期靠它保证每次迭代有界，从而能及时观察到停机标志。
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// 基于 `serialport` 的实现（8N1）
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// 打开并配置串口
    ///
    /// # 错误
    /// 设备不存在、权限不足或参数不被支持时返回结构化
    /// [`LinkDeviceError`]，`is_fatal()` 对这些分类均为真。
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(DEFAULT_READ_TIMEOUT)
            .open()
            .map_err(|e| LinkDeviceError::new(classify(&e), e.to_string()))?;

        info!(path, baud_rate, "serial port opened");
        Ok(Self { port })
    }
}

fn classify(err: &serialport::Error) -> LinkDeviceErrorKind {
    match err.kind {
        serialport::ErrorKind::NoDevice => LinkDeviceErrorKind::NoDevice,
        serialport::ErrorKind::InvalidInput => LinkDeviceErrorKind::UnsupportedConfig,
        serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            LinkDeviceErrorKind::AccessDenied
        },
        serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => LinkDeviceErrorKind::NotFound,
        _ => LinkDeviceErrorKind::Unknown,
    }
}

impl RxLink for SerialLink {
    fn read_byte(&mut self) -> Result<u8, LinkError> {
        let mut buf = [0u8; 1];
        match self.port.read_exact(&mut buf) {
            Ok(()) => Ok(buf[0]),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(LinkError::Timeout),
            Err(e) => Err(LinkError::Io(e)),
        }
    }

    fn clear_input(&mut self) -> Result<(), LinkError> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| LinkDeviceError::new(classify(&e), e.to_string()).into())
    }
}

impl TxLink for SerialLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        Write::write_all(&mut self.port, bytes)?;
        Ok(())
    }
}

impl SerialTransport for SerialLink {
    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), LinkError> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| LinkDeviceError::new(classify(&e), e.to_string()).into())
    }
}
