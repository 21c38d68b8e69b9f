// ==========================================
// 镜片订单管理系统 - 领域类型定义
// ==========================================
// 职责: 订单生命周期的封闭枚举体系
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 正向链路: REGISTERED → ... → DELIVERED
// CANCELLED 可从任意非终态进入, 与正向链路分开校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Registered,      // 已登记
    AwaitingPayment, // 待付款
    Paid,            // 已付款
    InProduction,    // 生产中
    Ready,           // 实验室完工
    Shipped,         // 已发货
    ArrivedAtStore,  // 到店
    Delivered,       // 已交付 (终态)
    Cancelled,       // 已取消 (终态)
}

impl OrderStatus {
    /// 正向状态转换允许表
    ///
    /// 固定邻接表, 不含 CANCELLED (取消单独校验, 避免被当作普通前进步骤)
    pub fn forward_targets(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Registered => &[OrderStatus::AwaitingPayment, OrderStatus::Paid],
            OrderStatus::AwaitingPayment => &[OrderStatus::Paid],
            OrderStatus::Paid => &[OrderStatus::InProduction],
            OrderStatus::InProduction => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Shipped],
            OrderStatus::Shipped => &[OrderStatus::ArrivedAtStore],
            OrderStatus::ArrivedAtStore => &[OrderStatus::Delivered],
            OrderStatus::Delivered => &[],
            OrderStatus::Cancelled => &[],
        }
    }

    /// 是否终态 (终态不再允许任何转换)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// 是否允许取消
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "REGISTERED" => Some(OrderStatus::Registered),
            "AWAITING_PAYMENT" => Some(OrderStatus::AwaitingPayment),
            "PAID" => Some(OrderStatus::Paid),
            "IN_PRODUCTION" => Some(OrderStatus::InProduction),
            "READY" => Some(OrderStatus::Ready),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "ARRIVED_AT_STORE" => Some(OrderStatus::ArrivedAtStore),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OrderStatus::Registered => "REGISTERED",
            OrderStatus::AwaitingPayment => "AWAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::InProduction => "IN_PRODUCTION",
            OrderStatus::Ready => "READY",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::ArrivedAtStore => "ARRIVED_AT_STORE",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 订单优先级 (Priority)
// ==========================================
// 优先级修正: 在实验室 SLA 天数上加减, 下限由策略层保证
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,    // 低: +2 天
    Normal, // 正常: +0 天
    High,   // 高: -1 天
    Urgent, // 紧急: -3 天
}

impl Priority {
    /// SLA 天数修正值 (可为负)
    pub fn sla_modifier_days(&self) -> i64 {
        match self {
            Priority::Low => 2,
            Priority::Normal => 0,
            Priority::High => -1,
            Priority::Urgent => -3,
        }
    }

    /// 从字符串解析优先级
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "NORMAL" => Some(Priority::Normal),
            "HIGH" => Some(Priority::High),
            "URGENT" => Some(Priority::Urgent),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// SLA 风险状态 (SLA Status)
// ==========================================
// 顺序: OnTrack < Warning < Overdue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaStatus {
    OnTrack, // 正常
    Warning, // 临近截止
    Overdue, // 已逾期
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaStatus::OnTrack => write!(f, "ON_TRACK"),
            SlaStatus::Warning => write!(f, "WARNING"),
            SlaStatus::Overdue => write!(f, "OVERDUE"),
        }
    }
}

// ==========================================
// 序号台账状态 (Sequence Entry Status)
// ==========================================
// 状态机: NOT_LOGGED → LOGGED (对账命中)
//         NOT_LOGGED → PENDING_JUSTIFICATION → JUSTIFIED (人工说明)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceEntryStatus {
    Logged,               // 已登记 (找到匹配订单)
    NotLogged,            // 未登记 (序号缺口)
    PendingJustification, // 待说明
    Justified,            // 已说明 (终态)
}

impl SequenceEntryStatus {
    /// 是否允许人工说明
    pub fn can_justify(&self) -> bool {
        matches!(
            self,
            SequenceEntryStatus::NotLogged | SequenceEntryStatus::PendingJustification
        )
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SequenceEntryStatus::Logged => "LOGGED",
            SequenceEntryStatus::NotLogged => "NOT_LOGGED",
            SequenceEntryStatus::PendingJustification => "PENDING_JUSTIFICATION",
            SequenceEntryStatus::Justified => "JUSTIFIED",
        }
    }
}

impl fmt::Display for SequenceEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 缺口说明类型 (Justification Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JustificationType {
    CustomerCancelled, // 客户取消
    Duplicate,         // 重复开单
    NumberingError,    // 编号跳号
    NotCompleted,      // 未成交
    Test,              // 测试单
    Other,             // 其他
}

impl fmt::Display for JustificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JustificationType::CustomerCancelled => write!(f, "CUSTOMER_CANCELLED"),
            JustificationType::Duplicate => write!(f, "DUPLICATE"),
            JustificationType::NumberingError => write!(f, "NUMBERING_ERROR"),
            JustificationType::NotCompleted => write!(f, "NOT_COMPLETED"),
            JustificationType::Test => write!(f, "TEST"),
            JustificationType::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 台账来源 (Sequence Origin)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceOrigin {
    Import, // 批量导入
    Manual, // 人工录入
    System, // 系统生成
}

impl fmt::Display for SequenceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceOrigin::Import => write!(f, "IMPORT"),
            SequenceOrigin::Manual => write!(f, "MANUAL"),
            SequenceOrigin::System => write!(f, "SYSTEM"),
        }
    }
}
