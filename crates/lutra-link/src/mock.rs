//! 测试用内存链路
//!
//! 预置的接收脚本 + 捕获的发送帧，驱动层测试不需要真实硬件。

use crate::{LinkError, RxLink, SerialTransport, TxLink};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 脚本化的内存链路
///
/// `read_byte` 依次弹出脚本字节，耗尽后返回 [`LinkError::Timeout`]；
/// 写出的帧累积在共享缓冲里，供测试断言。
#[derive(Default)]
pub struct MockLink {
    rx_script: VecDeque<u8>,
    tx_frames: Arc<Mutex<Vec<Vec<u8>>>>,
    cleared: usize,
}

impl MockLink {
    pub fn new(rx_script: impl Into<VecDeque<u8>>) -> Self {
        Self {
            rx_script: rx_script.into(),
            ..Self::default()
        }
    }

    /// 追加一段接收脚本
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx_script.extend(bytes.iter().copied());
    }

    /// 已发送帧缓冲的句柄
    pub fn sent(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.tx_frames)
    }

    /// `clear_input` 被调用的次数
    pub fn cleared(&self) -> usize {
        self.cleared
    }
}

impl RxLink for MockLink {
    fn read_byte(&mut self) -> Result<u8, LinkError> {
        self.rx_script.pop_front().ok_or(LinkError::Timeout)
    }

    fn clear_input(&mut self) -> Result<(), LinkError> {
        self.cleared += 1;
        Ok(())
    }
}

impl TxLink for MockLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.tx_frames
            .lock()
            .expect("tx buffer lock poisoned")
            .push(bytes.to_vec());
        Ok(())
    }
}

impl SerialTransport for MockLink {}
