// ==========================================
// 镜片订单管理系统 - 状态转换引擎
// ==========================================
// 职责: 订单状态机 (校验 + 应用 + 产出审计事件)
// 红线: 校验先于一切字段变更, 拒绝时订单零改动
// 红线: 乐观并发 — 按调用方读到的状态做 CAS 校验
// 说明: 本引擎不持有任何 SLA 知识
// ==========================================

use crate::domain::order::{Order, StatusEvent};
use crate::domain::types::OrderStatus;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use tracing::info;

// ==========================================
// TransitionEngine - 状态转换引擎
// ==========================================
pub struct TransitionEngine {
    // 无状态引擎, 持久化由调用方处理
}

impl TransitionEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 静态合法性判断 (不触碰订单)
    ///
    /// 取消走独立通道: 非终态皆可取消, 不走正向允许表
    pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return from.can_cancel();
        }
        from.forward_targets().contains(&to)
    }

    /// 应用状态转换
    ///
    /// # 参数
    /// - `order`: 目标订单
    /// - `expected_status`: 调用方读取时的状态 (CAS 校验基准)
    /// - `target`: 目标状态
    /// - `actor`: 操作人
    /// - `note`: 备注
    /// - `now`: 注入的当前时间
    ///
    /// # 返回
    /// - `Ok(StatusEvent)`: 转换已应用, 事件待调用方追加持久化
    /// - `Err(StaleState)`: 订单状态已被他人变更, 调用方应重读重试
    /// - `Err(IllegalTransition)`: 目标不在当前状态的允许范围
    pub fn transition(
        &self,
        order: &mut Order,
        expected_status: OrderStatus,
        target: OrderStatus,
        actor: &str,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> EngineResult<StatusEvent> {
        // 1. 乐观并发校验 (先于合法性, 输掉竞争的调用方拿到的是重试信号)
        if order.status != expected_status {
            return Err(EngineError::StaleState {
                entity: "Order",
                id: order.id.clone(),
                expected: expected_status.to_db_str().to_string(),
                actual: order.status.to_db_str().to_string(),
            });
        }

        // 2. 合法性校验 (拒绝时订单未被触碰)
        if !Self::can_transition(order.status, target) {
            return Err(EngineError::IllegalTransition {
                from: order.status,
                to: target,
            });
        }

        let previous = order.status;

        // 3. 盖章日期字段 (每个字段只盖一次, 已有值不覆盖)
        Self::stamp_dates(order, target, now);

        // 4. 应用状态
        order.status = target;
        order.revision += 1;
        order.updated_at = now;

        info!(
            order_id = %order.id,
            from = %previous,
            to = %target,
            actor = %actor,
            "订单状态转换"
        );

        // 5. 产出审计事件
        Ok(StatusEvent::new(
            &order.id,
            Some(previous),
            target,
            actor,
            now,
            note,
        ))
    }

    /// 里程碑日期盖章
    ///
    /// 只在字段为空时写入; 理论上的重入不会覆盖已有记录
    fn stamp_dates(order: &mut Order, target: OrderStatus, now: DateTime<Utc>) {
        match target {
            OrderStatus::InProduction => {
                if order.production_start_at.is_none() {
                    order.production_start_at = Some(now);
                }
            }
            OrderStatus::Ready => {
                if order.ready_at.is_none() {
                    order.ready_at = Some(now);
                }
                if order.production_end_at.is_none() {
                    order.production_end_at = Some(now);
                }
            }
            OrderStatus::Shipped => {
                if order.shipped_at.is_none() {
                    order.shipped_at = Some(now);
                }
            }
            OrderStatus::ArrivedAtStore => {
                if order.arrived_at.is_none() {
                    order.arrived_at = Some(now);
                }
            }
            OrderStatus::Delivered => {
                if order.delivered_at.is_none() {
                    order.delivered_at = Some(now);
                }
            }
            OrderStatus::Cancelled => {
                if order.cancelled_at.is_none() {
                    order.cancelled_at = Some(now);
                }
            }
            _ => {}
        }
    }

    /// 订单创建事件 (REGISTERED, 无前置状态)
    pub fn registration_event(order: &Order, actor: &str, now: DateTime<Utc>) -> StatusEvent {
        StatusEvent::new(&order.id, None, OrderStatus::Registered, actor, now, None)
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn test_order() -> Order {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Order::new(
            "S001",
            "LAB01",
            "MULTIFOCAL",
            1001,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            now,
        )
    }

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap()
    }

    #[test]
    fn test_forward_path_end_to_end() {
        let engine = TransitionEngine::new();
        let mut order = test_order();

        let path = [
            OrderStatus::AwaitingPayment,
            OrderStatus::Paid,
            OrderStatus::InProduction,
            OrderStatus::Ready,
            OrderStatus::Shipped,
            OrderStatus::ArrivedAtStore,
            OrderStatus::Delivered,
        ];

        for (i, target) in path.iter().enumerate() {
            let current = order.status;
            let event = engine
                .transition(&mut order, current, *target, "operator", None, ts(9 + i as u32))
                .expect("合法转换不应失败");
            assert_eq!(event.previous_status, Some(current));
            assert_eq!(event.new_status, *target);
            assert_eq!(order.status, *target);
        }

        assert_eq!(order.revision, path.len() as i64);
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn test_illegal_transition_leaves_order_untouched() {
        let engine = TransitionEngine::new();
        let mut order = test_order();
        let before = order.clone();

        let result = engine.transition(
            &mut order,
            OrderStatus::Registered,
            OrderStatus::Shipped,
            "operator",
            None,
            ts(10),
        );

        assert!(matches!(
            result,
            Err(EngineError::IllegalTransition {
                from: OrderStatus::Registered,
                to: OrderStatus::Shipped,
            })
        ));
        assert_eq!(order, before); // 零改动
    }

    #[test]
    fn test_registered_can_skip_to_paid() {
        let engine = TransitionEngine::new();
        let mut order = test_order();

        // 现款单可跳过待付款
        engine
            .transition(
                &mut order,
                OrderStatus::Registered,
                OrderStatus::Paid,
                "cashier",
                None,
                ts(10),
            )
            .expect("REGISTERED → PAID 合法");
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        let engine = TransitionEngine::new();

        for setup in [
            OrderStatus::Registered,
            OrderStatus::AwaitingPayment,
            OrderStatus::Paid,
            OrderStatus::InProduction,
            OrderStatus::Ready,
            OrderStatus::Shipped,
            OrderStatus::ArrivedAtStore,
        ] {
            let mut order = test_order();
            order.status = setup;

            let result = engine.transition(
                &mut order,
                setup,
                OrderStatus::Cancelled,
                "manager",
                Some("客户取消".to_string()),
                ts(11),
            );
            assert!(result.is_ok(), "{} 应允许取消", setup);
            assert!(order.cancelled_at.is_some());
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let engine = TransitionEngine::new();

        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            for target in [
                OrderStatus::Registered,
                OrderStatus::Paid,
                OrderStatus::InProduction,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ] {
                let mut order = test_order();
                order.status = terminal;

                let result =
                    engine.transition(&mut order, terminal, target, "operator", None, ts(12));
                assert!(
                    matches!(result, Err(EngineError::IllegalTransition { .. })),
                    "{} → {} 必须拒绝",
                    terminal,
                    target
                );
            }
        }
    }

    #[test]
    fn test_stale_state_rejected_before_validation() {
        let engine = TransitionEngine::new();
        let mut order = test_order();

        // 调用方以为还是 REGISTERED, 实际已被并发转为 PAID
        order.status = OrderStatus::Paid;

        let result = engine.transition(
            &mut order,
            OrderStatus::Registered,
            OrderStatus::AwaitingPayment,
            "operator",
            None,
            ts(13),
        );

        assert!(matches!(result, Err(EngineError::StaleState { .. })));
        assert_eq!(order.status, OrderStatus::Paid); // 未被双重应用
    }

    #[test]
    fn test_production_start_stamped_once() {
        let engine = TransitionEngine::new();
        let mut order = test_order();
        order.status = OrderStatus::Paid;

        engine
            .transition(
                &mut order,
                OrderStatus::Paid,
                OrderStatus::InProduction,
                "lab",
                None,
                ts(10),
            )
            .unwrap();
        let first_stamp = order.production_start_at;
        assert_eq!(first_stamp, Some(ts(10)));

        // 已有值时再次盖章不覆盖
        TransitionEngine::stamp_dates(&mut order, OrderStatus::InProduction, ts(15));
        assert_eq!(order.production_start_at, first_stamp);
    }

    #[test]
    fn test_ready_stamps_production_end() {
        let engine = TransitionEngine::new();
        let mut order = test_order();
        order.status = OrderStatus::InProduction;

        engine
            .transition(
                &mut order,
                OrderStatus::InProduction,
                OrderStatus::Ready,
                "lab",
                None,
                ts(14),
            )
            .unwrap();

        assert_eq!(order.ready_at, Some(ts(14)));
        assert_eq!(order.production_end_at, Some(ts(14)));
    }

    #[test]
    fn test_registration_event_has_no_previous() {
        let order = test_order();
        let event = TransitionEngine::registration_event(&order, "intake", ts(9));

        assert_eq!(event.previous_status, None);
        assert_eq!(event.new_status, OrderStatus::Registered);
        assert_eq!(event.order_id, order.id);
    }
}
