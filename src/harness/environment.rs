//! 测试环境管理
//!
//! 统一管理一个测试所需的全部服务桩和应用实例：setup 按固定顺序
//! 激活桩、构建应用、压入请求上下文；teardown 无条件反向释放。
//! 环境析构时兜底执行 teardown，测试体 panic 也不会漏掉停用。

use crate::error::Result;
use crate::fixtures::{self, FixturePolicy};
use crate::model::{Entity, ModelSchema};
use crate::harness::app::{AppFactory, TestApp};
use crate::harness::client::TestClient;
use crate::harness::context::RequestContext;
use crate::stubs::{
    BlobRecord, BlobstoreStub, ConsistencyPolicy, DEFAULT_QUEUE, DatastoreStub, LifecycleSpy,
    MailFilter, MailMessage, MailStub, MemcacheStub, StubRegistry, TaskFilter, TaskQueueStub,
    TaskRecord,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 测试环境配置
#[derive(Debug, Clone)]
pub struct TestbedConfig {
    /// datastore 桩的一致性策略
    pub consistency: ConsistencyPolicy,
    /// 声明的任务队列名
    pub queues: Vec<String>,
    /// fixture 生成策略
    pub fixtures: FixturePolicy,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            consistency: ConsistencyPolicy::Strong,
            queues: vec![DEFAULT_QUEUE.to_string()],
            fixtures: FixturePolicy::default(),
        }
    }
}

impl TestbedConfig {
    /// 创建模拟多副本最终一致的配置
    pub fn eventual(apply_probability: f64) -> Self {
        Self {
            consistency: ConsistencyPolicy::Eventual { apply_probability },
            ..Default::default()
        }
    }

    /// 追加声明的队列名
    pub fn with_queues(mut self, queues: &[&str]) -> Self {
        for queue in queues {
            if !self.queues.iter().any(|q| q == queue) {
                self.queues.push(queue.to_string());
            }
        }
        self
    }

    /// 指定 fixture 生成策略
    pub fn with_fixtures(mut self, fixtures: FixturePolicy) -> Self {
        self.fixtures = fixtures;
        self
    }
}

/// 测试环境
///
/// 每个测试一个实例，独占自己的一套服务桩。
pub struct TestEnvironment {
    config: TestbedConfig,
    stubs: StubRegistry,
    factory: Box<dyn AppFactory>,
    app: Option<TestApp>,
    client: Option<TestClient>,
    context: Option<RequestContext>,
    torn_down: bool,
}

impl TestEnvironment {
    /// 用默认配置创建并初始化测试环境
    pub fn setup(factory: impl AppFactory + 'static) -> Result<Self> {
        Self::setup_with_config(TestbedConfig::default(), factory)
    }

    /// 使用自定义配置创建测试环境
    pub fn setup_with_config(
        config: TestbedConfig,
        factory: impl AppFactory + 'static,
    ) -> Result<Self> {
        tracing::info!("初始化测试环境...");
        let mut factory: Box<dyn AppFactory> = Box::new(factory);

        factory.pre_setup();

        // 1. 激活服务桩，应用构建可能依赖桩提供的服务
        let stubs = StubRegistry::new(&config.queues, config.consistency);
        stubs.activate();

        // 2. 构建应用；失败时先停用全部桩再传出原始错误
        let app = match factory.create_app() {
            Ok(app) => app,
            Err(e) => {
                tracing::warn!("应用构建失败，停用已激活的服务桩: {}", e);
                stubs.deactivate_all();
                return Err(e);
            }
        };

        // 3. 压入请求上下文
        let context = match RequestContext::push(app.clone()) {
            Ok(context) => context,
            Err(e) => {
                stubs.deactivate_all();
                return Err(e);
            }
        };

        // 4. 绑定测试客户端
        let client = TestClient::new(app.clone());

        factory.post_setup();
        tracing::info!("测试环境初始化完成");

        Ok(Self {
            config,
            stubs,
            factory,
            app: Some(app),
            client: Some(client),
            context: Some(context),
            torn_down: false,
        })
    }

    /// 销毁测试环境
    ///
    /// 无条件停用全部服务桩并弹出请求上下文；重复调用是空操作。
    pub fn teardown(&mut self) {
        self.teardown_inner();
    }

    fn teardown_inner(&mut self) {
        if self.torn_down {
            return;
        }
        self.factory.pre_teardown();

        // 先停用桩再弹出上下文，两步都不依赖对方成功
        self.stubs.deactivate_all();
        if let Some(context) = self.context.take() {
            context.pop();
        }
        self.app = None;
        self.client = None;

        self.factory.post_teardown();
        self.torn_down = true;
        tracing::info!("测试环境已销毁");
    }

    // ==================== 访问器 ====================

    pub fn config(&self) -> &TestbedConfig {
        &self.config
    }

    pub fn app(&self) -> &TestApp {
        self.app.as_ref().expect("测试环境已销毁")
    }

    pub fn client(&self) -> &TestClient {
        self.client.as_ref().expect("测试环境已销毁")
    }

    pub fn stubs(&self) -> &StubRegistry {
        &self.stubs
    }

    pub fn lifecycle_spy(&self) -> Arc<LifecycleSpy> {
        self.stubs.lifecycle_spy()
    }

    pub fn mail_stub(&self) -> &MailStub {
        self.stubs.mail()
    }

    pub fn memcache_stub(&self) -> &MemcacheStub {
        self.stubs.memcache()
    }

    pub fn taskqueue_stub(&self) -> &TaskQueueStub {
        self.stubs.taskqueue()
    }

    pub fn blobstore_stub(&self) -> &BlobstoreStub {
        self.stubs.blobstore()
    }

    pub fn datastore_stub(&self) -> &DatastoreStub {
        self.stubs.datastore()
    }

    // ==================== Mail API ====================

    /// 查询已发送的邮件
    pub fn get_sent_messages(&self, filter: &MailFilter) -> Vec<MailMessage> {
        self.stubs.mail().sent_messages(filter)
    }

    /// 断言发送过满足条件的邮件
    pub fn assert_mail_sent(&self, filter: &MailFilter) {
        crate::assertions::assert_mail_sent(self.stubs.mail(), filter);
    }

    // ==================== Memcache API ====================

    /// 断言缓存累计命中次数
    pub fn assert_memcache_hits(&self, hits: u64) {
        crate::assertions::assert_memcache_hits(self.stubs.memcache(), hits);
    }

    /// 断言缓存当前条目数
    pub fn assert_memcache_items(&self, items: usize) {
        crate::assertions::assert_memcache_items(self.stubs.memcache(), items);
    }

    // ==================== Task Queue API ====================

    /// 查询已入队的任务
    pub fn get_tasks(&self, filter: &TaskFilter) -> Vec<TaskRecord> {
        self.stubs.taskqueue().filtered_tasks(filter)
    }

    /// 断言匹配条件的任务数，n 缺省为 0
    pub fn assert_tasks_in_queue(&self, n: Option<usize>, filter: &TaskFilter) {
        crate::assertions::assert_tasks_in_queue(self.stubs.taskqueue(), n, filter);
    }

    // ==================== Blobstore API ====================

    /// 创建并存储一个 blob
    pub fn create_blob(&self, blob_key: &str, content: impl Into<Vec<u8>>) -> BlobRecord {
        self.stubs.blobstore().create_blob(blob_key, content)
    }

    // ==================== Fixture API ====================

    /// 按环境配置的策略生成随机实体
    pub fn random_entity(&self, schema: &ModelSchema, overrides: &BTreeMap<String, Value>) -> Entity {
        fixtures::random_entity(schema, overrides, &self.config.fixtures)
    }
}

impl std::fmt::Debug for TestEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestEnvironment")
            .field("config", &self.config)
            .field("stubs", &self.stubs)
            .field("app", &self.app.is_some())
            .field("client", &self.client.is_some())
            .field("context", &self.context.is_some())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        // 测试体 panic 时的兜底释放
        self.teardown_inner();
    }
}
