//! 服务桩注册表
//!
//! 管理固定的一组进程内服务模拟器：setup 时按固定顺序激活，
//! teardown 时无条件全部停用并清空状态。可选服务（images、search）
//! 在对应 feature 缺失时静默跳过。
//!
//! 注册表实例本身就是隔离单元：每个测试持有自己的一套桩，
//! 不依赖进程级单例，因此测试可以并行运行。

mod blobstore;
mod datastore;
#[cfg(feature = "images")]
mod images;
mod mail;
mod memcache;
mod misc;
#[cfg(feature = "search")]
mod search;
mod taskqueue;

pub use blobstore::{BlobRecord, BlobstoreStub};
pub use datastore::{ConsistencyPolicy, DatastoreStub};
#[cfg(feature = "images")]
pub use images::{ImagesStub, TransformRecord};
pub use mail::{MailFilter, MailMessage, MailStub};
pub use memcache::{CacheStats, MemcacheStub};
pub use misc::{
    AppIdentityStub, CannedResponse, CapabilityStub, ChannelStub, FilesStub, LogLine,
    LogServiceStub, UrlFetchStub, XmppMessage, XmppStub,
};
#[cfg(feature = "search")]
pub use search::{Document, SearchStub};
pub use taskqueue::{DEFAULT_QUEUE, TaskFilter, TaskQueueStub, TaskRecord};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 服务名常量
pub mod service {
    pub const MAIL: &str = "mail";
    pub const XMPP: &str = "xmpp";
    pub const FILES: &str = "files";
    pub const IMAGES: &str = "images";
    pub const CHANNEL: &str = "channel";
    pub const MEMCACHE: &str = "memcache";
    pub const URLFETCH: &str = "urlfetch";
    pub const BLOBSTORE: &str = "blobstore";
    pub const TASKQUEUE: &str = "taskqueue";
    pub const CAPABILITY: &str = "capability";
    pub const LOGSERVICE: &str = "logservice";
    pub const APP_IDENTITY: &str = "app_identity";
    pub const DATASTORE: &str = "datastore";
    pub const SEARCH: &str = "search";
}

/// 服务桩的公共表面
pub trait ServiceStub: Send + Sync {
    /// 服务名
    fn service_name(&self) -> &'static str;

    /// 清空桩内状态，停用时调用
    fn reset(&self);
}

/// 生命周期观测器
///
/// 记录激活/停用调用次数，供"激活的桩一定被停用"这类测试验证。
/// 以 Arc 共享，测试可以在环境销毁后继续读取计数。
#[derive(Debug, Default)]
pub struct LifecycleSpy {
    activated: AtomicUsize,
    deactivated: AtomicUsize,
}

impl LifecycleSpy {
    pub fn activate_calls(&self) -> usize {
        self.activated.load(Ordering::SeqCst)
    }

    pub fn deactivate_calls(&self) -> usize {
        self.deactivated.load(Ordering::SeqCst)
    }
}

/// 服务桩注册表
#[derive(Debug)]
pub struct StubRegistry {
    mail: MailStub,
    xmpp: XmppStub,
    files: FilesStub,
    #[cfg(feature = "images")]
    images: ImagesStub,
    channel: ChannelStub,
    memcache: MemcacheStub,
    urlfetch: UrlFetchStub,
    blobstore: BlobstoreStub,
    taskqueue: TaskQueueStub,
    capability: CapabilityStub,
    logservice: LogServiceStub,
    app_identity: AppIdentityStub,
    datastore: DatastoreStub,
    #[cfg(feature = "search")]
    search: SearchStub,
    active: AtomicBool,
    spy: Arc<LifecycleSpy>,
}

impl StubRegistry {
    /// 按声明的队列列表和一致性策略创建注册表（尚未激活）
    pub fn new(queues: &[String], policy: ConsistencyPolicy) -> Self {
        Self {
            mail: MailStub::default(),
            xmpp: XmppStub::default(),
            files: FilesStub::default(),
            #[cfg(feature = "images")]
            images: ImagesStub::default(),
            channel: ChannelStub::default(),
            memcache: MemcacheStub::default(),
            urlfetch: UrlFetchStub::default(),
            blobstore: BlobstoreStub::default(),
            taskqueue: TaskQueueStub::new(queues),
            capability: CapabilityStub::default(),
            logservice: LogServiceStub::default(),
            app_identity: AppIdentityStub::default(),
            datastore: DatastoreStub::new(policy),
            #[cfg(feature = "search")]
            search: SearchStub::default(),
            active: AtomicBool::new(false),
            spy: Arc::new(LifecycleSpy::default()),
        }
    }

    /// 固定顺序的全部桩
    fn all_stubs(&self) -> Vec<&dyn ServiceStub> {
        let mut stubs: Vec<&dyn ServiceStub> = vec![&self.mail, &self.xmpp, &self.files];
        #[cfg(feature = "images")]
        stubs.push(&self.images);
        stubs.extend([
            &self.channel as &dyn ServiceStub,
            &self.memcache,
            &self.urlfetch,
            &self.blobstore,
            &self.taskqueue,
            &self.capability,
            &self.logservice,
            &self.app_identity,
            &self.datastore,
        ]);
        #[cfg(feature = "search")]
        stubs.push(&self.search);
        stubs
    }

    /// 按固定顺序激活全部服务桩
    ///
    /// 必须先于应用构建调用，应用初始化可能依赖桩提供的服务。
    pub fn activate(&self) {
        for stub in self.all_stubs() {
            tracing::debug!(service = stub.service_name(), "激活服务桩");
            self.spy.activated.fetch_add(1, Ordering::SeqCst);
        }
        #[cfg(not(feature = "images"))]
        tracing::debug!("images 服务不可用，跳过激活");
        #[cfg(not(feature = "search"))]
        tracing::debug!("search 服务不可用，跳过激活");

        self.active.store(true, Ordering::SeqCst);
    }

    /// 无条件停用全部服务桩并清空状态
    ///
    /// 幂等：重复调用不再计数，保证激活/停用次数严格配平。
    pub fn deactivate_all(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        for stub in self.all_stubs() {
            tracing::debug!(service = stub.service_name(), "停用服务桩");
            stub.reset();
            self.spy.deactivated.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 注册表是否处于激活状态
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// 生命周期观测器
    pub fn lifecycle_spy(&self) -> Arc<LifecycleSpy> {
        Arc::clone(&self.spy)
    }

    // ==================== 桩访问器 ====================

    pub fn mail(&self) -> &MailStub {
        &self.mail
    }

    pub fn xmpp(&self) -> &XmppStub {
        &self.xmpp
    }

    pub fn files(&self) -> &FilesStub {
        &self.files
    }

    #[cfg(feature = "images")]
    pub fn images(&self) -> &ImagesStub {
        &self.images
    }

    pub fn channel(&self) -> &ChannelStub {
        &self.channel
    }

    pub fn memcache(&self) -> &MemcacheStub {
        &self.memcache
    }

    pub fn urlfetch(&self) -> &UrlFetchStub {
        &self.urlfetch
    }

    pub fn blobstore(&self) -> &BlobstoreStub {
        &self.blobstore
    }

    pub fn taskqueue(&self) -> &TaskQueueStub {
        &self.taskqueue
    }

    pub fn capability(&self) -> &CapabilityStub {
        &self.capability
    }

    pub fn logservice(&self) -> &LogServiceStub {
        &self.logservice
    }

    pub fn app_identity(&self) -> &AppIdentityStub {
        &self.app_identity
    }

    pub fn datastore(&self) -> &DatastoreStub {
        &self.datastore
    }

    #[cfg(feature = "search")]
    pub fn search(&self) -> &SearchStub {
        &self.search
    }
}
