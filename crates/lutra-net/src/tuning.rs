//! 持久化的视觉阈值文档
//!
//! 管理面"更新检测阈值"的落点：一份核心之外的小 JSON 文档，
//! 状态广播随包带出。不存在时用默认值创建。

use crate::NetError;
use std::path::Path;
use tracing::{info, warn};

/// 球检测阈值配置
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisionTuning {
    pub min_threshold: String,
    pub max_threshold: String,
    pub ball_detect_radius: i32,
    pub circularity_threshold: f32,
}

impl Default for VisionTuning {
    fn default() -> Self {
        Self {
            min_threshold: "1, 120, 100".to_string(),
            max_threshold: "15, 255, 255".to_string(),
            ball_detect_radius: 150,
            circularity_threshold: 0.2,
        }
    }
}

impl VisionTuning {
    /// 从文件读取；不存在或损坏时回退默认值（损坏记日志）
    ///
    /// 不存在时用默认值落盘，保证广播端总有文档可带。
    pub fn load_or_create(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(tuning) => tuning,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "tuning document corrupt; using defaults");
                    Self::default()
                },
            },
            Err(_) => {
                let tuning = Self::default();
                if let Err(e) = tuning.save(path) {
                    warn!(error = %e, path = %path.display(), "failed to create tuning document");
                } else {
                    info!(path = %path.display(), "tuning document created with defaults");
                }
                tuning
            },
        }
    }

    /// 落盘（管理面更新后的持久化动作）
    pub fn save(&self, path: &Path) -> Result<(), NetError> {
        let bytes = serde_json::to_vec(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
