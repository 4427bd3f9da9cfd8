//! Message codec: framing and serialization for the wire protocol.
//!
//! A frame is a 4-byte big-endian length followed by that many bytes of
//! bincode-encoded [`Message`].

use crate::{Action, Message, ProtocolError};

/// Maximum frame body size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024; // 16 MiB

/// Length of the frame header.
pub const HEADER_LEN: usize = 4;

/// Encode a message as a complete frame, header included.
pub fn encode_frame(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    message.validate()?;
    let body = bincode::serialize(message).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: body.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Body length announced by a frame header.
pub fn frame_length(header: [u8; HEADER_LEN]) -> Result<usize, ProtocolError> {
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(len)
}

/// Decode a frame body into a validated message.
pub fn decode_message(body: &[u8]) -> Result<Message, ProtocolError> {
    // The action is the first field; bincode writes its tag as a little-endian u32.
    let tag_bytes: [u8; 4] = body
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| ProtocolError::Malformed("frame body shorter than action tag".into()))?;
    let tag = u32::from_le_bytes(tag_bytes);
    if tag as usize >= Action::ALL.len() {
        return Err(ProtocolError::UnknownAction(tag));
    }

    let message: Message =
        bincode::deserialize(body).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    message.validate()?;
    Ok(message)
}

/// Decode one complete frame from the front of `bytes`.
///
/// Returns the message and the number of bytes consumed.
pub fn decode_frame(bytes: &[u8]) -> Result<(Message, usize), ProtocolError> {
    let header: [u8; HEADER_LEN] = bytes
        .get(..HEADER_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| ProtocolError::Malformed("truncated frame header".into()))?;
    let len = frame_length(header)?;
    let body = bytes
        .get(HEADER_LEN..HEADER_LEN + len)
        .ok_or_else(|| ProtocolError::Malformed(format!("truncated frame body, expected {len} bytes")))?;
    Ok((decode_message(body)?, HEADER_LEN + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;
    use quill_types::{Address, TxHash};

    #[test]
    fn frame_header_is_big_endian_length() {
        let frame = encode_frame(&Message::status_request(TxHash::ZERO)).unwrap();
        let len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        assert_eq!(len, frame.len() - HEADER_LEN);
    }

    #[test]
    fn frame_roundtrip() {
        let msg = Message::balance_request(Address::new("qk_abc").unwrap()).with_reply_port(7);
        let frame = encode_frame(&msg).unwrap();
        let (decoded, consumed) = decode_frame(&frame).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(consumed, frame.len());
    }

    #[test]
    fn oversized_header_rejected() {
        let header = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes();
        assert!(matches!(
            frame_length(header),
            Err(ProtocolError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn unknown_action_tag_rejected() {
        let mut body = bincode::serialize(&Message::error("x")).unwrap();
        body[..4].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(
            decode_message(&body),
            Err(ProtocolError::UnknownAction(99))
        ));
    }

    #[test]
    fn mismatched_payload_rejected_on_decode() {
        let bogus = Message {
            action: Action::TxStatusResp,
            payload: Payload::Balance(3),
            reply_port: 0,
        };
        let body = bincode::serialize(&bogus).unwrap();
        assert!(matches!(
            decode_message(&body),
            Err(ProtocolError::ActionMismatch { .. })
        ));
        assert!(encode_frame(&bogus).is_err());
    }

    #[test]
    fn truncated_frames_rejected() {
        let frame = encode_frame(&Message::status_reply("pending")).unwrap();
        assert!(decode_frame(&frame[..2]).is_err());
        assert!(decode_frame(&frame[..frame.len() - 1]).is_err());
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            decode_message(&[0, 0, 0, 0, 0xFF]),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
