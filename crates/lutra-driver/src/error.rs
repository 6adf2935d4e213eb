//! 驱动层错误类型定义

use lutra_link::LinkError;
use lutra_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口链路错误
    #[error("serial link error: {0}")]
    Link(#[from] LinkError),

    /// 协议解析错误
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_link_error() {
        let err: DriverError = LinkError::Timeout.into();
        assert!(matches!(err, DriverError::Link(LinkError::Timeout)));
        assert!(format!("{err}").contains("Read timeout"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: DriverError = ProtocolError::TruncatedPayload { expected: 3, actual: 1 }.into();
        assert!(format!("{err}").contains("Truncated status payload"));
    }
}
