// ==========================================
// 镜片订单管理系统 - SLA 档案
// ==========================================
// 职责: SLA 计算结果的派生结构 (非持久化实体)
// 红线: 按需重算, 不落库, 无独立身份
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// SLA 档案 (SlaProfile)
///
/// 每次按订单字段即时重算。除两个截止日期外同时暴露
/// 全部计算输入, 供下游展示"截止日为什么是这一天"。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaProfile {
    /// 实验室基准天数 (类别覆写或 max(实验室默认, 类别基准))
    pub base_days: i64,

    /// 处理工艺追加天数合计
    pub treatment_extra_days: i64,

    /// 优先级修正天数 (可为负)
    pub priority_modifier_days: i64,

    /// 最终实验室 SLA 天数 (含下限保护)
    pub lab_days: i64,

    /// 门店安全边际 (工作日)
    pub safety_margin_days: i64,

    /// 实验室内部截止日
    pub lab_deadline: NaiveDate,

    /// 推荐承诺日期 (SLA + 安全边际)
    pub recommended_promise_date: NaiveDate,

    /// 实际承诺客户日期 (人工覆写时取覆写值)
    pub customer_promise_date: NaiveDate,

    /// 是否使用了人工覆写日期
    pub manual_override: bool,

    /// 软预警: 人工承诺日期早于实验室截止日 (接受但标记)
    pub promise_before_lab_deadline: bool,
}

impl SlaProfile {
    /// 是否存在软预警
    pub fn has_soft_warning(&self) -> bool {
        self.promise_before_lab_deadline
    }

    /// 计算过程解释 (JSON)
    ///
    /// 所有规则必须输出 reason, 供驾驶舱展示
    pub fn explain(&self) -> String {
        json!({
            "base_days": self.base_days,
            "treatment_extra_days": self.treatment_extra_days,
            "priority_modifier_days": self.priority_modifier_days,
            "lab_days": self.lab_days,
            "safety_margin_days": self.safety_margin_days,
            "lab_deadline": self.lab_deadline.to_string(),
            "customer_promise_date": self.customer_promise_date.to_string(),
            "manual_override": self.manual_override,
            "promise_before_lab_deadline": self.promise_before_lab_deadline,
        })
        .to_string()
    }
}

impl std::fmt::Display for SlaProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SLA {}d (base {} + treat {} {:+}) lab {} promise {}",
            self.lab_days,
            self.base_days,
            self.treatment_extra_days,
            self.priority_modifier_days,
            self.lab_deadline,
            self.customer_promise_date,
        )
    }
}
