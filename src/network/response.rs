//! 响应解释器 (Response Interpreters)

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::envelope::Envelope;
use crate::core::model::Payload;
use crate::network::request::Format;

/// 允许的最大嵌套层数 (数组与对象合计)
pub const MAX_DEPTH: usize = 512;

/// JSON 解码错误码 (与站点原有客户端的编号一致)
///
/// 由 serde_json 的错误信息映射而来，只覆盖会出现的几类，其余一律归为语法错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorCode {
    Depth = 1,
    CtrlChar = 3,
    Syntax = 4,
    Utf8 = 5,
    Utf16 = 10,
}

impl JsonErrorCode {
    pub fn classify(err: &serde_json::Error) -> Self {
        let text = err.to_string();
        if !err.is_syntax() {
            JsonErrorCode::Syntax
        } else if text.contains("control character") {
            JsonErrorCode::CtrlChar
        } else if text.contains("surrogate")
            || text.contains("end of hex escape")
            || text.contains("unicode code point")
        {
            JsonErrorCode::Utf16
        } else {
            JsonErrorCode::Syntax
        }
    }

    fn envelope<T>(self) -> Envelope<T> {
        Envelope::failure(format!("JSON Error [{}]", self as i32))
    }
}

/// 按格式解释响应体
pub fn interpret(format: Format, body: Vec<u8>) -> Envelope<Payload> {
    match format {
        Format::Json => decode_json(&body).map(Payload::Json),
        Format::Html => match String::from_utf8(body) {
            Ok(text) => Envelope::success(Payload::Text(text)),
            Err(e) => {
                warn!("HTML 响应含非法 UTF-8 字节，已替换: {}", e.utf8_error());
                Envelope::success(Payload::Text(
                    String::from_utf8_lossy(e.as_bytes()).into_owned(),
                ))
            }
        },
    }
}

/// 严格 JSON 解码；合法的 `null` 与标量均视为成功
pub fn decode_json(body: &[u8]) -> Envelope<Value> {
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(e) => {
            debug!("JSON 响应不是合法 UTF-8: {}", e);
            return JsonErrorCode::Utf8.envelope();
        }
    };

    if exceeds_depth(text.as_bytes(), MAX_DEPTH) {
        debug!("JSON 嵌套超过 {} 层", MAX_DEPTH);
        return JsonErrorCode::Depth.envelope();
    }

    // 深度已在上面限定，关闭 serde_json 自带的 128 层上限
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let parsed = Value::deserialize(&mut de).and_then(|value| de.end().map(|()| value));

    match parsed {
        Ok(value) => Envelope::success(value),
        Err(e) => {
            debug!("JSON 解码失败: {}", e);
            JsonErrorCode::classify(&e).envelope()
        }
    }
}

/// 扫描括号嵌套 (跳过字符串字面量)，超过 `limit` 即返回 true
fn exceeds_depth(body: &[u8], limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &b in body {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}
