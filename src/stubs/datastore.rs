//! Datastore 服务桩
//!
//! 按 key 存取实体，并模拟多副本存储的可见性：按 key 读取总是强一致，
//! 按 kind 的查询只能看到"已应用"的写入。`Eventual` 策略下每次写入
//! 按概率立即应用，`apply_all` 强制应用积压的写入。

use crate::model::{Entity, EntityKey};
use crate::store::MemoryStore;
use crate::stubs::ServiceStub;
use dashmap::DashSet;
use rand::Rng;

/// 一致性策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsistencyPolicy {
    /// 强一致：写入对查询立即可见
    Strong,
    /// 最终一致：每次写入以给定概率立即应用
    Eventual { apply_probability: f64 },
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self::Strong
    }
}

/// Datastore 服务桩
#[derive(Debug)]
pub struct DatastoreStub {
    policy: ConsistencyPolicy,
    entities: MemoryStore<Entity>,
    /// 对查询可见的 key 集合
    applied: DashSet<String>,
}

impl Default for DatastoreStub {
    fn default() -> Self {
        Self::new(ConsistencyPolicy::Strong)
    }
}

impl DatastoreStub {
    pub fn new(policy: ConsistencyPolicy) -> Self {
        Self {
            policy,
            entities: MemoryStore::new(),
            applied: DashSet::new(),
        }
    }

    pub fn policy(&self) -> ConsistencyPolicy {
        self.policy
    }

    /// 写入实体
    ///
    /// 返回的 key 可用于后续按 key 读取。
    pub fn put(&self, key: &EntityKey, entity: Entity) -> EntityKey {
        let storage_key = key.storage_key();
        self.entities.insert(&storage_key, entity);

        let apply = match self.policy {
            ConsistencyPolicy::Strong => true,
            ConsistencyPolicy::Eventual { apply_probability } => {
                rand::thread_rng().gen_bool(apply_probability.clamp(0.0, 1.0))
            }
        };
        if apply {
            self.applied.insert(storage_key);
        } else {
            tracing::debug!(key = %key, "写入暂未应用，查询不可见");
        }
        key.clone()
    }

    /// 按 key 读取，总是强一致
    pub fn get(&self, key: &EntityKey) -> Option<Entity> {
        self.entities.get(&key.storage_key())
    }

    /// 删除实体，返回是否存在
    pub fn delete(&self, key: &EntityKey) -> bool {
        self.applied.remove(&key.storage_key());
        self.entities.remove(&key.storage_key()).is_some()
    }

    /// 按 kind 查询，只返回已应用的写入
    pub fn query_kind(&self, kind: &str) -> Vec<Entity> {
        let prefix = format!("{}/", kind);
        self.applied
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .filter_map(|key| self.entities.get(key.as_str()))
            .collect()
    }

    /// 强制应用全部积压的写入
    pub fn apply_all(&self) {
        for key in self.entities.keys() {
            self.applied.insert(key);
        }
    }

    /// 当前实体总数（含未应用的写入）
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }
}

impl ServiceStub for DatastoreStub {
    fn service_name(&self) -> &'static str {
        super::service::DATASTORE
    }

    fn reset(&self) {
        self.entities.clear();
        self.applied.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(kind: &str) -> Entity {
        let mut e = Entity::new(kind);
        e.set("title", json!("t"));
        e
    }

    #[test]
    fn test_strong_consistency_query_sees_writes() {
        let stub = DatastoreStub::new(ConsistencyPolicy::Strong);
        stub.put(&EntityKey::new("Post", "p1"), entity("Post"));

        assert_eq!(stub.query_kind("Post").len(), 1);
        assert!(stub.query_kind("User").is_empty());
    }

    #[test]
    fn test_eventual_get_by_key_always_consistent() {
        let stub = DatastoreStub::new(ConsistencyPolicy::Eventual {
            apply_probability: 0.0,
        });
        let key = EntityKey::new("Post", "p1");
        stub.put(&key, entity("Post"));

        assert!(stub.get(&key).is_some());
        assert!(stub.query_kind("Post").is_empty());
    }

    #[test]
    fn test_apply_all_flushes_backlog() {
        let stub = DatastoreStub::new(ConsistencyPolicy::Eventual {
            apply_probability: 0.0,
        });
        stub.put(&EntityKey::new("Post", "p1"), entity("Post"));
        stub.put(&EntityKey::new("Post", "p2"), entity("Post"));

        stub.apply_all();
        assert_eq!(stub.query_kind("Post").len(), 2);
    }

    #[test]
    fn test_delete_removes_from_queries() {
        let stub = DatastoreStub::new(ConsistencyPolicy::Strong);
        let key = EntityKey::new("Post", "p1");
        stub.put(&key, entity("Post"));

        assert!(stub.delete(&key));
        assert!(stub.get(&key).is_none());
        assert!(stub.query_kind("Post").is_empty());
        assert!(!stub.delete(&key));
    }
}
