//! 协议常量定义

// ============================================================================
// Framing
// ============================================================================

/// 串口前导码（双向共用的帧界定模式）
pub const SERIAL_PREAMBLE: [u8; 4] = [0xFF, 0x00, 0xFF, 0x00];

/// 状态载荷长度（协议版本参数，当前修订为 3 字节）
pub const STATUS_PAYLOAD_LEN: usize = 3;

/// 指令帧总长（含 1 字节前导）
pub const COMMAND_FRAME_LEN: usize = 19;

/// 指令帧前导字节
pub const COMMAND_PREAMBLE: u8 = 0xFF;

// ============================================================================
// Command frame byte offsets
// ============================================================================

/// 切向速度低位字节偏移
pub const IDX_VEL_X_LOW: usize = 1;
/// 切向速度高位字节偏移
pub const IDX_VEL_X_HIGH: usize = 2;
/// 法向速度低位字节偏移
pub const IDX_VEL_Y_LOW: usize = 3;
/// 法向速度高位字节偏移
pub const IDX_VEL_Y_HIGH: usize = 4;
/// 角速度低位字节偏移
pub const IDX_VEL_ANG_LOW: usize = 5;
/// 角速度高位字节偏移
pub const IDX_VEL_ANG_HIGH: usize = 6;
/// 带球电机功率偏移
pub const IDX_DRIBBLE: usize = 7;
/// 直踢功率偏移
pub const IDX_KICK: usize = 8;
/// 挑踢功率偏移
pub const IDX_CHIP: usize = 9;
/// 相机球 X 坐标偏移
pub const IDX_CAM_BALL_X: usize = 16;
/// 相机球 Y 坐标偏移
pub const IDX_CAM_BALL_Y: usize = 17;
/// 标志字节偏移
pub const IDX_INFO: usize = 18;

// ============================================================================
// Actuation scaling
// ============================================================================

/// 踢球速度请求 ≥ 该值时表示 direct 模式（线材上以 +100 偏移编码）
pub const DIRECT_KICK_THRESHOLD: f32 = 100.0;

/// 踢球速度请求 → 设备功率的缩放系数
pub const KICK_POWER_SCALE: f32 = 10.0;

/// 带球电机功率上限
pub const DRIBBLE_POWER_MAX: f32 = 100.0;
