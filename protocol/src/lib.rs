//! Wire protocol: the `Message` envelope and its length-prefixed framing.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode_frame, decode_message, encode_frame, frame_length, MAX_MESSAGE_SIZE};
pub use error::ProtocolError;
pub use message::{Action, Message, Payload};
