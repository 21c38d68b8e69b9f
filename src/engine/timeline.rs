// ==========================================
// 镜片订单管理系统 - 时间线分解引擎
// ==========================================
// 职责: 由状态事件流水重建订单时间线, 分解各阶段耗时
// 输入: 订单 + 有序状态事件 + 注入的当前时间
// 输出: Timeline (只读派生, 不回写订单或事件)
// ==========================================

use crate::domain::order::{Order, StatusEvent};
use crate::domain::types::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 时间线阶段 (TimelineStage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStage {
    /// 阶段状态
    pub status: OrderStatus,
    /// 进入时间
    pub entered_at: DateTime<Utc>,
    /// 离开时间 (最后一个开放阶段为 None)
    pub exited_at: Option<DateTime<Utc>>,
    /// 阶段耗时 (小时)
    pub hours: f64,
    /// 占总耗时百分比 (0-100)
    pub percent_of_total: f64,
}

/// 订单时间线 (Timeline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// 订单 ID
    pub order_id: String,
    /// 按进入时间排列的阶段
    pub stages: Vec<TimelineStage>,
    /// 总耗时 (小时): 首事件到终态时间或当前时间
    pub total_hours: f64,
    /// 订单是否已闭环 (终态)
    pub closed: bool,
}

// ==========================================
// TimelineEngine - 时间线分解引擎
// ==========================================
pub struct TimelineEngine {
    // 无状态引擎
}

impl TimelineEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 重建时间线
    ///
    /// # 算法
    /// - 按时间戳升序稳定排序 (同一时刻的事件保持写入顺序)
    /// - 阶段耗时 = 下一事件时间 - 本事件时间;
    ///   最后一个阶段: 终态订单取终态时间戳, 否则取 now
    /// - total_hours = 0 时各阶段百分比定义为 0 (避免除零)
    pub fn build(&self, order: &Order, events: &[StatusEvent], now: DateTime<Utc>) -> Timeline {
        if events.is_empty() {
            return Timeline {
                order_id: order.id.clone(),
                stages: Vec::new(),
                total_hours: 0.0,
                closed: order.is_closed(),
            };
        }

        let mut sorted: Vec<&StatusEvent> = events.iter().collect();
        sorted.sort_by_key(|e| e.timestamp); // 稳定排序, 平局按写入顺序

        let closed = order.is_closed();
        let end_at = order.terminal_at().unwrap_or(now);
        let first_at = sorted[0].timestamp;
        let total_hours = Self::hours_between(first_at, end_at);

        let mut stages = Vec::with_capacity(sorted.len());
        for (i, event) in sorted.iter().enumerate() {
            let exited_at = sorted.get(i + 1).map(|next| next.timestamp);
            let stage_end = exited_at.unwrap_or(end_at);
            let hours = Self::hours_between(event.timestamp, stage_end);

            let percent_of_total = if total_hours > 0.0 {
                hours / total_hours * 100.0
            } else {
                0.0
            };

            stages.push(TimelineStage {
                status: event.new_status,
                entered_at: event.timestamp,
                exited_at: if closed { Some(stage_end) } else { exited_at },
                hours,
                percent_of_total,
            });
        }

        Timeline {
            order_id: order.id.clone(),
            stages,
            total_hours,
            closed,
        }
    }

    /// 两时刻间的小时数 (非负)
    fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        if end <= start {
            return 0.0;
        }
        (end - start).num_seconds() as f64 / 3600.0
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new()
    }
}
