// src/monster/src/name.rs

/// 名字规则：大写字母开头，其后为字母、数字、撇号或空格，总长度至少 2
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_uppercase() {
        return false;
    }
    let mut rest = 0usize;
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '\'' || c == ' ') {
            return false;
        }
        rest += 1;
    }
    rest >= 1
}
