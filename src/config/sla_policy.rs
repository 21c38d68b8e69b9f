// ==========================================
// 镜片订单管理系统 - SLA 业务策略
// ==========================================
// 职责: SLA 计算与风险分级的可调参数
// 存储: 由外部配置注入 (JSON), 引擎只读快照
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 策略键常量 (配置快照中的字段名)
pub mod policy_keys {
    pub const MIN_LAB_DAYS: &str = "min_lab_days";
    pub const DEFAULT_SAFETY_MARGIN_DAYS: &str = "default_safety_margin_days";
    pub const LAB_WARNING_WINDOW_DAYS: &str = "lab_warning_window_days";
    pub const PROMISE_WARNING_WINDOW_DAYS: &str = "promise_warning_window_days";
}

/// SLA 业务策略 (SlaPolicy)
///
/// 默认值与线上配置一致; 类别默认天数仅在门店尚未
/// 维护类别主数据时用于初始化, 引擎计算不读它兜底。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaPolicy {
    /// 实验室 SLA 下限 (优先级修正后不得低于此值)
    pub min_lab_days: i64,

    /// 新建门店的默认安全边际 (工作日)
    pub default_safety_margin_days: i64,

    /// 实验室截止日预警窗口 (工作日)
    pub lab_warning_window_days: i64,

    /// 承诺日期预警窗口 (工作日)
    pub promise_warning_window_days: i64,

    /// 类别初始 SLA 天数 (建店初始化用)
    pub class_default_days: HashMap<String, i64>,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        let mut class_default_days = HashMap::new();
        class_default_days.insert("SINGLE_VISION".to_string(), 3);
        class_default_days.insert("MULTIFOCAL".to_string(), 5);
        class_default_days.insert("PHOTOCHROMIC".to_string(), 7);
        class_default_days.insert("TREATMENT_ONLY".to_string(), 4);

        Self {
            min_lab_days: 1,
            default_safety_margin_days: 2,
            lab_warning_window_days: 2,
            promise_warning_window_days: 3,
            class_default_days,
        }
    }
}

impl SlaPolicy {
    /// 从 JSON 快照加载 (缺省字段取默认值)
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// 导出 JSON 快照
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 类别初始天数查询
    pub fn class_default(&self, lens_class_id: &str) -> Option<i64> {
        self.class_default_days.get(lens_class_id).copied()
    }
}
