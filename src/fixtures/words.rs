//! 随机词与随机邮箱
//!
//! 词源有两种：默认的 `Unique`（uuid 派生，每次调用唯一）和
//! `Lexicon`（固定词表随机取词，不保证唯一）。依赖词唯一性的测试
//! 必须使用默认词源。

use fake::Fake;
use fake::faker::lorem::en::Word;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 随机词来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordSource {
    /// uuid 派生的唯一 token
    #[default]
    Unique,
    /// 固定词表随机取词
    Lexicon,
}

/// 生成一个随机词
pub fn random_word(source: WordSource) -> String {
    match source {
        WordSource::Unique => Uuid::new_v4().simple().to_string(),
        WordSource::Lexicon => Word().fake(),
    }
}

/// 生成随机邮箱地址
///
/// 形如 `localpart@domain.com`，domain 未指定时独立随机取词。
pub fn random_email(domain: Option<&str>, source: WordSource) -> String {
    let localpart = random_word(source);
    let domain = domain
        .map(str::to_string)
        .unwrap_or_else(|| random_word(source));
    format!("{}@{}.com", localpart, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_words_differ() {
        let a = random_word(WordSource::Unique);
        let b = random_word(WordSource::Unique);
        assert!(!a.is_empty());
        assert_ne!(a, b, "唯一词源每次调用应产生不同的词");
    }

    #[test]
    fn test_lexicon_word_not_empty() {
        let word = random_word(WordSource::Lexicon);
        assert!(!word.is_empty());
        assert!(word.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_random_email_format() {
        let email = random_email(None, WordSource::Unique);
        let (local, rest) = email.split_once('@').unwrap();
        assert!(!local.is_empty());
        assert!(rest.ends_with(".com"));
        assert!(rest.len() > ".com".len());
    }

    #[test]
    fn test_random_email_fixed_domain() {
        let email = random_email(Some("example"), WordSource::Unique);
        assert!(email.ends_with("@example.com"));
    }

    #[test]
    fn test_random_email_independent_draws() {
        let a = random_email(None, WordSource::Unique);
        let b = random_email(None, WordSource::Unique);
        assert_ne!(a, b);
    }
}
