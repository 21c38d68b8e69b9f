// ==========================================
// 镜片订单管理系统 - 引擎层订单索引 trait
// ==========================================
// 职责: 定义对账所需的订单存在性查询, 实现依赖倒置
// 说明: Engine 层定义 trait, 持久化层实现适配器
// ==========================================

use std::collections::HashSet;

/// 已登记订单索引 (RegisteredOrderLookup)
///
/// 对账引擎只需要"该门店该物理单号是否存在订单"一个事实,
/// 由调用方用其存储适配实现。
pub trait RegisteredOrderLookup {
    /// 指定门店是否存在该物理单号的订单
    fn order_exists(&self, store_id: &str, sequence_number: i64) -> bool;
}

/// 内存订单索引
///
/// 测试与批处理场景用: 预先收集 (store_id, number) 集合。
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderIndex {
    numbers: HashSet<(String, i64)>,
}

impl InMemoryOrderIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个单号
    pub fn insert(&mut self, store_id: &str, sequence_number: i64) {
        self.numbers.insert((store_id.to_string(), sequence_number));
    }

    /// 从 (门店, 单号) 序列批量构建
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut index = Self::new();
        for (store_id, number) in pairs {
            index.insert(store_id, number);
        }
        index
    }
}

impl RegisteredOrderLookup for InMemoryOrderIndex {
    fn order_exists(&self, store_id: &str, sequence_number: i64) -> bool {
        self.numbers
            .contains(&(store_id.to_string(), sequence_number))
    }
}
