// ==========================================
// 镜片订单管理系统 - 订单实体
// ==========================================
// 职责: 定义订单主实体与状态事件 (审计流水)
// 红线: status 只能通过 TransitionEngine 变更
// ==========================================

use crate::domain::types::{OrderStatus, Priority};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 订单 (Order)
///
/// 中心实体。身份不可变, 状态只能经过状态机流转,
/// 永不物理删除 (CANCELLED 是终态, 不是删除)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 订单 ID (UUID)
    pub id: String,

    /// 门店内物理单号 (按门店单调分配)
    pub sequence_number: i64,

    /// 所属门店 ID
    pub store_id: String,

    /// 加工实验室 ID
    pub lab_id: String,

    /// 镜片类别 ID
    pub lens_class_id: String,

    /// 当前状态
    pub status: OrderStatus,

    /// 优先级
    pub priority: Priority,

    /// 是否保修单
    pub is_warranty: bool,

    /// 已选处理工艺 ID 列表 (镀膜/染色等, 每项追加 SLA 天数)
    pub treatment_ids: Vec<String>,

    /// 下单日期
    pub order_date: NaiveDate,

    /// 实验室内部 SLA 截止日
    pub lab_sla_date: Option<NaiveDate>,

    /// 承诺客户日期 (计算值)
    pub promised_date: Option<NaiveDate>,

    /// 人工覆写的承诺日期 (存在时优先)
    pub manual_promised_date: Option<NaiveDate>,

    /// 付款到期日
    pub payment_due_date: Option<NaiveDate>,

    /// 生产开始时间 (首次进入 IN_PRODUCTION 时盖章, 仅一次)
    pub production_start_at: Option<DateTime<Utc>>,

    /// 生产完成时间
    pub production_end_at: Option<DateTime<Utc>>,

    /// 完工时间
    pub ready_at: Option<DateTime<Utc>>,

    /// 发货时间
    pub shipped_at: Option<DateTime<Utc>>,

    /// 到店时间
    pub arrived_at: Option<DateTime<Utc>>,

    /// 交付时间
    pub delivered_at: Option<DateTime<Utc>>,

    /// 取消时间
    pub cancelled_at: Option<DateTime<Utc>>,

    /// 乐观锁修订号 (每次成功转换 +1)
    pub revision: i64,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 创建新订单 (初始状态 REGISTERED)
    pub fn new(
        store_id: &str,
        lab_id: &str,
        lens_class_id: &str,
        sequence_number: i64,
        order_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sequence_number,
            store_id: store_id.to_string(),
            lab_id: lab_id.to_string(),
            lens_class_id: lens_class_id.to_string(),
            status: OrderStatus::Registered,
            priority: Priority::Normal,
            is_warranty: false,
            treatment_ids: Vec::new(),
            order_date,
            lab_sla_date: None,
            promised_date: None,
            manual_promised_date: None,
            payment_due_date: None,
            production_start_at: None,
            production_end_at: None,
            ready_at: None,
            shipped_at: None,
            arrived_at: None,
            delivered_at: None,
            cancelled_at: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 生效的承诺日期 (人工覆写优先)
    pub fn effective_promised_date(&self) -> Option<NaiveDate> {
        self.manual_promised_date.or(self.promised_date)
    }

    /// 终态时间戳 (交付或取消)
    pub fn terminal_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            OrderStatus::Delivered => self.delivered_at,
            OrderStatus::Cancelled => self.cancelled_at,
            _ => None,
        }
    }

    /// 是否处于终态
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }
}

/// 状态事件 (StatusEvent)
///
/// 不可变追加流水。订单的有序事件序列就是它的审计轨迹,
/// 也是时间线分解的唯一输入。写入后永不修改或删除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// 事件 ID (UUID)
    pub event_id: String,

    /// 所属订单 ID
    pub order_id: String,

    /// 转换前状态 (创建事件为 None)
    pub previous_status: Option<OrderStatus>,

    /// 转换后状态
    pub new_status: OrderStatus,

    /// 操作人
    pub actor: String,

    /// 事件时间
    pub timestamp: DateTime<Utc>,

    /// 备注
    pub note: Option<String>,
}

impl StatusEvent {
    /// 构造状态事件
    pub fn new(
        order_id: &str,
        previous_status: Option<OrderStatus>,
        new_status: OrderStatus,
        actor: &str,
        timestamp: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            previous_status,
            new_status,
            actor: actor.to_string(),
            timestamp,
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_order_starts_registered() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let order = Order::new(
            "S001",
            "LAB01",
            "MULTIFOCAL",
            1001,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            now,
        );

        assert_eq!(order.status, OrderStatus::Registered);
        assert_eq!(order.priority, Priority::Normal);
        assert_eq!(order.revision, 0);
        assert!(order.production_start_at.is_none());
        assert!(!order.is_closed());
    }

    #[test]
    fn test_effective_promised_date_prefers_manual() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut order = Order::new(
            "S001",
            "LAB01",
            "MULTIFOCAL",
            1001,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            now,
        );

        order.promised_date = NaiveDate::from_ymd_opt(2026, 3, 10);
        assert_eq!(order.effective_promised_date(), order.promised_date);

        order.manual_promised_date = NaiveDate::from_ymd_opt(2026, 3, 6);
        assert_eq!(order.effective_promised_date(), order.manual_promised_date);
    }
}
