use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static RE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(?:RE|FW|FWD|ＲＥ|ＦＷ|ＦＷＤ)\s*[:：]\s*)+").unwrap());

static RE_BRACKETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[【\[\(（［〔〈《<\{][^】\]\)）］〕〉》>\}]*[】\]\)）］〕〉》>\}]\s*)+")
        .unwrap()
});

/// 件名の正規化（RE/FW 多重プレフィックスと先頭タグを除去）
///
/// 空文字を返さない契約:
/// 1. prefix を剥がして s1 を作る
/// 2. s1 から括弧タグを剥がして s2 を作る
/// 3. s2 が空なら s1 を返す。s1 も空なら元の subject を返す（全て trim 済み）
/// 4. 入力が空なら空文字を返す
pub fn normalize_subject(subject: &str) -> String {
    let original_trimmed = subject.trim();

    if original_trimmed.is_empty() {
        return String::new();
    }

    let s1 = RE_PREFIX.replace(subject, "");
    let s1_trimmed = s1.trim();

    let s2 = RE_BRACKETS.replace(s1_trimmed, "");
    let s2_trimmed = s2.trim();

    if !s2_trimmed.is_empty() {
        s2_trimmed.to_string()
    } else if !s1_trimmed.is_empty() {
        s1_trimmed.to_string()
    } else {
        original_trimmed.to_string()
    }
}

/// 正規化済み件名から SHA-256 で subject_hash を生成（先頭16文字）
pub fn calculate_subject_hash(subject: &str) -> String {
    let normalized = normalize_subject(subject);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(16);
    hex
}
