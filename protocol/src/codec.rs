//! 文本帧编解码
//!
//! WebSocket 文本帧承载一条 JSON 消息。解码前先检查帧大小，
//! 避免为超大帧做无意义的解析。

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::MAX_FRAME_SIZE;
use crate::error::{ProtocolError, Result};
use crate::message::{ClientMessage, ServerMessage};

fn check_size(len: usize) -> Result<()> {
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(())
}

fn encode<M: Serialize>(msg: &M) -> Result<String> {
    let text = serde_json::to_string(msg)?;
    check_size(text.len())?;
    Ok(text)
}

fn decode<M: DeserializeOwned>(text: &str) -> Result<M> {
    check_size(text.len())?;
    Ok(serde_json::from_str(text)?)
}

/// 编码服务端消息
pub fn encode_server(msg: &ServerMessage) -> Result<String> {
    encode(msg)
}

/// 解码服务端消息
///
/// 客户端一侧的解码，服务端集成测试用它读取 WebSocket 帧。
pub fn decode_server(text: &str) -> Result<ServerMessage> {
    decode(text)
}

/// 编码客户端消息，客户端一侧使用
pub fn encode_client(msg: &ClientMessage) -> Result<String> {
    encode(msg)
}

/// 解码客户端消息
pub fn decode_client(text: &str) -> Result<ClientMessage> {
    decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frame() {
        let text = encode_client(&ClientMessage::MakeMove(8)).unwrap();
        assert_eq!(text, r#"{"event":"makeMove","data":8}"#);
        assert_eq!(decode_client(&text).unwrap(), ClientMessage::MakeMove(8));
    }

    #[test]
    fn test_frame_too_large() {
        let game_id = "g".repeat(MAX_FRAME_SIZE);
        let text = format!(r#"{{"event":"joinGame","data":"{game_id}"}}"#);

        let err = decode_client(&text).unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLarge { max: MAX_FRAME_SIZE, .. }));

        let err = encode_client(&ClientMessage::JoinGame(game_id)).unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLarge { .. }));
    }

    #[test]
    fn test_malformed_frame() {
        let err = decode_client("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn test_server_frame() {
        let text = encode_server(&ServerMessage::GameFull).unwrap();
        assert_eq!(decode_server(&text).unwrap(), ServerMessage::GameFull);
    }
}
