//! 断言辅助
//!
//! 对服务桩状态和 HTTP 响应的断言。断言失败 panic 并带上
//! 期望值与实际值；释放逻辑由环境的 Drop 兜底，teardown 仍会执行。

use crate::harness::TestResponse;
use crate::stubs::{MailFilter, MailStub, MemcacheStub, TaskFilter, TaskQueueStub};

/// 断言发送过满足条件的邮件
pub fn assert_mail_sent(stub: &MailStub, filter: &MailFilter) {
    let matched = stub.sent_messages(filter);
    assert!(!matched.is_empty(), "没有满足条件的邮件被发送: {:?}", filter);
}

/// 断言缓存累计命中次数
pub fn assert_memcache_hits(stub: &MemcacheStub, hits: u64) {
    let actual = stub.stats().hits;
    assert_eq!(
        hits, actual,
        "memcache 命中次数应为 {}，实际为 {}",
        hits, actual
    );
}

/// 断言缓存当前条目数
pub fn assert_memcache_items(stub: &MemcacheStub, items: usize) {
    let actual = stub.stats().items;
    assert_eq!(
        items, actual,
        "memcache 条目数应为 {}，实际为 {}",
        items, actual
    );
}

/// 断言匹配条件的已入队任务数
///
/// `n` 缺省为 0，即默认期望"不存在匹配的任务"。
pub fn assert_tasks_in_queue(stub: &TaskQueueStub, n: Option<usize>, filter: &TaskFilter) {
    let expected = n.unwrap_or(0);
    let actual = stub.filtered_tasks(filter).len();
    assert_eq!(
        expected, actual,
        "匹配条件的任务数应为 {}，实际为 {}: {:?}",
        expected, actual, filter
    );
}

/// 断言响应状态码
///
/// 响应缺失时以独立的消息失败。
pub fn assert_status(response: Option<&TestResponse>, status_code: u16) {
    let response = match response {
        Some(response) => response,
        None => panic!("响应为 None"),
    };
    let actual = response.status_code();
    assert_eq!(
        actual, status_code,
        "响应状态码 {} 应为 {}",
        actual, status_code
    );
}

/// 断言响应状态码为 200
pub fn assert_200(response: Option<&TestResponse>) {
    assert_status(response, 200);
}

/// 断言响应状态码为 400
pub fn assert_400(response: Option<&TestResponse>) {
    assert_status(response, 400);
}

/// 断言响应状态码为 401
pub fn assert_401(response: Option<&TestResponse>) {
    assert_status(response, 401);
}

/// 断言响应状态码为 403
pub fn assert_403(response: Option<&TestResponse>) {
    assert_status(response, 403);
}

/// 断言响应状态码为 404
pub fn assert_404(response: Option<&TestResponse>) {
    assert_status(response, 404);
}

/// 断言响应状态码为 405
pub fn assert_405(response: Option<&TestResponse>) {
    assert_status(response, 405);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::{MailMessage, TaskRecord};

    #[test]
    fn test_assert_mail_sent_matches() {
        let stub = MailStub::new();
        stub.send(MailMessage::new("a@b.com").to("c@d.com").subject("hi"));
        assert_mail_sent(&stub, &MailFilter::new().subject("hi"));
    }

    #[test]
    #[should_panic(expected = "没有满足条件的邮件被发送")]
    fn test_assert_mail_sent_no_match() {
        let stub = MailStub::new();
        assert_mail_sent(&stub, &MailFilter::new());
    }

    #[test]
    fn test_assert_tasks_default_zero() {
        let stub = TaskQueueStub::default();
        assert_tasks_in_queue(&stub, None, &TaskFilter::new());
    }

    #[test]
    #[should_panic(expected = "匹配条件的任务数应为 0")]
    fn test_assert_tasks_default_zero_fails_after_enqueue() {
        let stub = TaskQueueStub::default();
        stub.enqueue(TaskRecord::new("/work")).unwrap();
        assert_tasks_in_queue(&stub, None, &TaskFilter::new());
    }

    #[test]
    #[should_panic(expected = "响应为 None")]
    fn test_assert_status_none_response() {
        assert_status(None, 200);
    }

    #[test]
    fn test_assert_memcache_counters() {
        let stub = MemcacheStub::new();
        stub.set("k", serde_json::json!(1));
        stub.get("k");

        assert_memcache_hits(&stub, 1);
        assert_memcache_items(&stub, 1);
    }
}
