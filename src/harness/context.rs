//! 请求上下文
//!
//! 让框架辅助能力（URL 反解、任务队列测试客户端）在没有真实请求时
//! 也可用：setup 时压入当前应用，teardown 时弹出。线程局部存放，
//! 每个测试线程同一时刻最多一个；guard 析构时自动弹出。

use crate::error::{Result, TestbedError};
use crate::harness::app::TestApp;
use crate::harness::client::TestClient;
use std::cell::RefCell;

#[derive(Clone)]
struct CurrentContext {
    app: TestApp,
    task_client: TestClient,
}

thread_local! {
    static CURRENT: RefCell<Option<CurrentContext>> = const { RefCell::new(None) };
}

/// 请求上下文 guard
///
/// 存在期间 [`current_app`] 和 [`current_task_client`] 可用；
/// 析构（或显式 [`pop`](RequestContext::pop)）后恢复为空。
#[derive(Debug)]
pub struct RequestContext {
    _private: (),
}

impl RequestContext {
    /// 压入当前应用
    ///
    /// 同线程已有激活的上下文时返回错误。
    pub(crate) fn push(app: TestApp) -> Result<Self> {
        CURRENT.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Err(TestbedError::ContextAlreadyActive);
            }
            let task_client = TestClient::new(app.clone());
            *slot = Some(CurrentContext { app, task_client });
            Ok(RequestContext { _private: () })
        })
    }

    /// 显式弹出上下文
    pub fn pop(self) {
        drop(self);
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        CURRENT.with(|slot| {
            slot.borrow_mut().take();
        });
    }
}

/// 当前测试的应用，上下文窗口之外返回 None
pub fn current_app() -> Option<TestApp> {
    CURRENT.with(|slot| slot.borrow().as_ref().map(|c| c.app.clone()))
}

/// 当前测试的任务队列测试客户端
///
/// 供测试执行已入队任务的处理逻辑，只在 setup 到 teardown 的窗口内有值。
pub fn current_task_client() -> Option<TestClient> {
    CURRENT.with(|slot| slot.borrow().as_ref().map(|c| c.task_client.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_window() {
        assert!(current_app().is_none());

        let ctx = RequestContext::push(TestApp::new()).unwrap();
        assert!(current_app().is_some());
        assert!(current_task_client().is_some());

        ctx.pop();
        assert!(current_app().is_none());
        assert!(current_task_client().is_none());
    }

    #[test]
    fn test_second_push_rejected() {
        let _ctx = RequestContext::push(TestApp::new()).unwrap();
        let err = RequestContext::push(TestApp::new()).unwrap_err();
        assert!(matches!(err, TestbedError::ContextAlreadyActive));
    }

    #[test]
    fn test_drop_pops() {
        {
            let _ctx = RequestContext::push(TestApp::new()).unwrap();
            assert!(current_app().is_some());
        }
        assert!(current_app().is_none());
    }
}
