//! 前导码流式重同步
//!
//! 逐字节扫描 `FF 00 FF 00`。任何打断部分匹配的字节都会把扫描
//! 复位到位置零；被打断的字节本身不会被重新解释为新前导码的开头。
//! 匹配失败只在本层复位恢复，从不向上层报告。

use crate::constants::SERIAL_PREAMBLE;

/// 增量前导码匹配器
///
/// 串口周期每读入一个字节调用一次 [`push`](Self::push)；
/// 返回 `true` 表示完整前导码刚刚匹配完成，随后应精确读取
/// [`STATUS_PAYLOAD_LEN`](crate::constants::STATUS_PAYLOAD_LEN) 字节载荷。
#[derive(Debug, Clone, Copy, Default)]
pub struct PreambleScanner {
    matched: usize,
}

impl PreambleScanner {
    pub fn new() -> Self {
        Self { matched: 0 }
    }

    /// 丢弃当前的部分匹配状态
    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// 送入一个字节，完整前导码匹配完成时返回 `true`
    ///
    /// 完成匹配后内部状态自动复位，可继续用于下一帧。
    pub fn push(&mut self, byte: u8) -> bool {
        if byte == SERIAL_PREAMBLE[self.matched] {
            self.matched += 1;
            if self.matched == SERIAL_PREAMBLE.len() {
                self.matched = 0;
                return true;
            }
        } else {
            self.matched = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STATUS_PAYLOAD_LEN;
    use proptest::prelude::*;

    /// 把字节流喂给扫描器，收集每个前导码之后的 3 字节载荷
    fn collect_payloads(stream: &[u8]) -> Vec<[u8; STATUS_PAYLOAD_LEN]> {
        let mut scanner = PreambleScanner::new();
        let mut payloads = Vec::new();
        let mut iter = stream.iter().copied();
        while let Some(byte) = iter.next() {
            if scanner.push(byte) {
                let mut payload = [0u8; STATUS_PAYLOAD_LEN];
                let mut complete = true;
                for slot in payload.iter_mut() {
                    match iter.next() {
                        Some(b) => *slot = b,
                        None => {
                            complete = false;
                            break;
                        },
                    }
                }
                if complete {
                    payloads.push(payload);
                }
            }
        }
        payloads
    }

    #[test]
    fn test_exact_preamble_matches() {
        let mut scanner = PreambleScanner::new();
        assert!(!scanner.push(0xFF));
        assert!(!scanner.push(0x00));
        assert!(!scanner.push(0xFF));
        assert!(scanner.push(0x00));
    }

    #[test]
    fn test_broken_match_resets_to_zero() {
        // FF FF 00 FF 00: 第二个 FF 打断匹配且不被当作新前导码开头
        let mut scanner = PreambleScanner::new();
        assert!(!scanner.push(0xFF));
        assert!(!scanner.push(0xFF));
        assert!(!scanner.push(0x00));
        assert!(!scanner.push(0xFF));
        assert!(!scanner.push(0x00));
        // 此时已重新累积 FF 00，补齐后才匹配
        assert!(!scanner.push(0xFF));
        assert!(scanner.push(0x00));
    }

    #[test]
    fn test_noise_then_frame() {
        let mut stream = vec![0x12, 0x34, 0x56];
        stream.extend_from_slice(&SERIAL_PREAMBLE);
        stream.extend_from_slice(&[150, 0b11, 87]);
        assert_eq!(collect_payloads(&stream), vec![[150, 0b11, 87]]);
    }

    proptest! {
        /// 重同步正确性：每段前导码前插入任意非前导字节噪声，
        /// 扫描器必须恰好恢复每一段载荷，重复任意多次。
        #[test]
        fn prop_resync_recovers_every_payload(
            segments in proptest::collection::vec(
                (
                    proptest::collection::vec(1u8..=0xFE, 0..16),
                    proptest::array::uniform3(any::<u8>()),
                ),
                1..8,
            )
        ) {
            let mut stream = Vec::new();
            let mut expected = Vec::new();
            for (noise, payload) in &segments {
                stream.extend_from_slice(noise);
                stream.extend_from_slice(&SERIAL_PREAMBLE);
                stream.extend_from_slice(payload);
                expected.push(*payload);
            }
            prop_assert_eq!(collect_payloads(&stream), expected);
        }
    }
}
