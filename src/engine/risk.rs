// ==========================================
// 镜片订单管理系统 - 风险与预警引擎
// ==========================================
// 职责: 按"当前时间"对订单做风险分级与预警标记
// 红线: 读时重算, 永不落库缓存 ("现在"在移动)
// 红线: 时间注入, 不读全局时钟
// ==========================================

use crate::config::SlaPolicy;
use crate::domain::order::Order;
use crate::domain::types::{OrderStatus, Priority, SlaStatus};
use crate::engine::calendar::BusinessCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// 风险评估结果 (RiskAssessment)
///
/// 纯派生读模型, 每次查询重算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 订单 ID
    pub order_id: String,

    /// 付款逾期: 待付款且已过付款到期日
    pub payment_overdue: bool,

    /// 生产逾期: 生产中/完工但已过实验室截止日
    pub production_overdue: bool,

    /// 实验室截止日风险分级
    pub sla_status: SlaStatus,

    /// 距实验室截止日剩余工作日 (无截止日时为 None)
    pub days_to_lab_deadline: Option<i64>,

    /// 承诺日期风险分级
    pub promise_status: SlaStatus,

    /// 距承诺日期剩余工作日
    pub days_to_promise: Option<i64>,

    /// 需要人工关注
    pub requires_attention: bool,

    /// 规则命中明细 (JSON, 可解释)
    pub reason: String,
}

// ==========================================
// RiskEngine - 风险与预警引擎
// ==========================================
pub struct RiskEngine {
    policy: SlaPolicy,
}

impl RiskEngine {
    /// 构造函数 (默认策略)
    pub fn new() -> Self {
        Self {
            policy: SlaPolicy::default(),
        }
    }

    /// 指定策略构造
    pub fn with_policy(policy: SlaPolicy) -> Self {
        Self { policy }
    }

    /// 评估单个订单
    ///
    /// # 参数
    /// - `order`: 订单
    /// - `calendar`: 所属实验室的工作日日历
    /// - `today`: 注入的当前日期
    pub fn assess(
        &self,
        order: &Order,
        calendar: &BusinessCalendar,
        today: NaiveDate,
    ) -> RiskAssessment {
        let mut reasons: Vec<String> = Vec::new();

        // 1. 付款逾期
        let payment_overdue = order.status == OrderStatus::AwaitingPayment
            && order
                .payment_due_date
                .map(|due| today > due)
                .unwrap_or(false);
        if payment_overdue {
            reasons.push("付款逾期".to_string());
        }

        // 2. 生产逾期
        let in_lab = matches!(
            order.status,
            OrderStatus::InProduction | OrderStatus::Ready
        );
        let production_overdue = in_lab
            && order
                .lab_sla_date
                .map(|deadline| today > deadline)
                .unwrap_or(false);
        if production_overdue {
            reasons.push("生产逾期".to_string());
        }

        // 3. 实验室截止日分级 (预警窗口: 2 个工作日)
        let (sla_status, days_to_lab_deadline) = self.classify(
            order.lab_sla_date,
            calendar,
            today,
            self.policy.lab_warning_window_days,
        );
        if sla_status == SlaStatus::Overdue {
            reasons.push("实验室SLA已逾期".to_string());
        } else if sla_status == SlaStatus::Warning {
            reasons.push("实验室SLA临近".to_string());
        }

        // 4. 承诺日期分级 (预警窗口: 3 个工作日)
        let (promise_status, days_to_promise) = self.classify(
            order.effective_promised_date(),
            calendar,
            today,
            self.policy.promise_warning_window_days,
        );
        if promise_status == SlaStatus::Overdue {
            reasons.push("承诺日期已逾期".to_string());
        } else if promise_status == SlaStatus::Warning {
            reasons.push("承诺日期临近".to_string());
        }

        // 5. 人工关注判定
        let urgent_off_track =
            order.priority == Priority::Urgent && sla_status != SlaStatus::OnTrack;
        if urgent_off_track {
            reasons.push("紧急单偏离轨道".to_string());
        }
        let requires_attention = payment_overdue || production_overdue || urgent_off_track;

        let reason = json!({
            "status": order.status.to_db_str(),
            "priority": order.priority.to_db_str(),
            "sla_status": sla_status.to_string(),
            "promise_status": promise_status.to_string(),
            "reasons": reasons,
        })
        .to_string();

        RiskAssessment {
            order_id: order.id.clone(),
            payment_overdue,
            production_overdue,
            sla_status,
            days_to_lab_deadline,
            promise_status,
            days_to_promise,
            requires_attention,
            reason,
        }
    }

    /// 终态订单不再分级 (交付/取消后风险冻结为正常)
    pub fn assess_open(
        &self,
        order: &Order,
        calendar: &BusinessCalendar,
        today: NaiveDate,
    ) -> Option<RiskAssessment> {
        if order.is_closed() {
            return None;
        }
        Some(self.assess(order, calendar, today))
    }

    /// 单个截止日的分级
    ///
    /// OVERDUE: 已过截止日; WARNING: 剩余工作日 <= 窗口; 其余 ON_TRACK
    fn classify(
        &self,
        deadline: Option<NaiveDate>,
        calendar: &BusinessCalendar,
        today: NaiveDate,
        warning_window_days: i64,
    ) -> (SlaStatus, Option<i64>) {
        let deadline = match deadline {
            Some(d) => d,
            None => return (SlaStatus::OnTrack, None),
        };

        if today > deadline {
            return (SlaStatus::Overdue, Some(0));
        }

        let remaining = calendar.remaining_business_days(today, deadline);
        if remaining <= warning_window_days {
            (SlaStatus::Warning, Some(remaining))
        } else {
            (SlaStatus::OnTrack, Some(remaining))
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}
