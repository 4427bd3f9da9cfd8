//! Framed message IO over async byte streams.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use quill_protocol::codec::HEADER_LEN;
use quill_protocol::{decode_message, encode_frame, frame_length, Message, ProtocolError};

use crate::NetworkError;

/// Write one length-prefixed frame and flush.
pub async fn write_frame<W>(writer: &mut W, message: &Message) -> Result<(), NetworkError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(message)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` when the stream closes cleanly before any header byte
/// arrives; a stream closing mid-frame is an error.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Message>, NetworkError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ProtocolError::Malformed("connection closed inside frame header".into()).into());
        }
        filled += n;
    }

    let len = frame_length(header)?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            NetworkError::Protocol(ProtocolError::Malformed(format!(
                "connection closed inside {len}-byte frame body"
            )))
        } else {
            e.into()
        }
    })?;
    Ok(Some(decode_message(&body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_types::TxHash;

    #[tokio::test]
    async fn frame_roundtrip_over_duplex() {
        let (mut a, mut b) = tokio::io::duplex(1024);
        let msg = Message::status_request(TxHash::new([5; 32]));
        write_frame(&mut a, &msg).await.unwrap();
        assert_eq!(read_frame(&mut b).await.unwrap(), Some(msg));
    }

    #[tokio::test]
    async fn clean_close_reads_as_absence() {
        let (a, mut b) = tokio::io::duplex(64);
        drop(a);
        assert_eq!(read_frame(&mut b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn close_inside_header_is_an_error() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&[0, 0]).await.unwrap();
        drop(a);
        assert!(matches!(
            read_frame(&mut b).await,
            Err(NetworkError::Protocol(ProtocolError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn close_inside_body_is_an_error() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&10u32.to_be_bytes()).await.unwrap();
        a.write_all(&[1, 2, 3]).await.unwrap();
        drop(a);
        assert!(matches!(
            read_frame(&mut b).await,
            Err(NetworkError::Protocol(ProtocolError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn oversized_header_rejected_without_reading_body() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&u32::MAX.to_be_bytes()).await.unwrap();
        assert!(matches!(
            read_frame(&mut b).await,
            Err(NetworkError::Protocol(ProtocolError::MessageTooLarge { .. }))
        ));
    }
}
