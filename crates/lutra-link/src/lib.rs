//! # Lutra Link
//!
//! 串口硬件抽象层，提供统一的字节流接口抽象。
//!
//! 驱动层只依赖本模块的 trait，不依赖具体串口实现，
//! 测试时用 `mock` 特性下的 [`MockLink`](mock::MockLink) 替换硬件。

use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "serial")]
pub mod serial;

#[cfg(feature = "serial")]
pub use serial::SerialLink;

#[cfg(any(feature = "mock", test))]
pub mod mock;

#[cfg(any(feature = "mock", test))]
pub use mock::MockLink;

/// 串口适配层统一错误类型
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] LinkDeviceError),
    #[error("Read timeout")]
    Timeout,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDeviceErrorKind {
    Unknown,
    NotFound,
    NoDevice,
    AccessDenied,
    UnsupportedConfig,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct LinkDeviceError {
    pub kind: LinkDeviceErrorKind,
    pub message: String,
}

impl LinkDeviceError {
    pub fn new(kind: LinkDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 启动期资源获取失败属于致命错误，进程不应在没有硬件的情况下运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            LinkDeviceErrorKind::NoDevice
                | LinkDeviceErrorKind::AccessDenied
                | LinkDeviceErrorKind::NotFound
                | LinkDeviceErrorKind::UnsupportedConfig
        )
    }
}

/// 接收端：阻塞式逐字节读取
pub trait RxLink {
    /// 读取一个字节，超过配置的超时返回 [`LinkError::Timeout`]
    fn read_byte(&mut self) -> Result<u8, LinkError>;

    /// 丢弃输入缓冲中残留的陈旧字节
    ///
    /// 每次前导码扫描之前调用，避免消费上一周期遗留的数据。
    fn clear_input(&mut self) -> Result<(), LinkError>;
}

/// 发送端：整帧写出
pub trait TxLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError>;
}

/// 双向串口链路
pub trait SerialTransport: RxLink + TxLink {
    /// 设置单字节读取超时
    fn set_read_timeout(&mut self, _timeout: Duration) -> Result<(), LinkError> {
        Ok(())
    }
}
