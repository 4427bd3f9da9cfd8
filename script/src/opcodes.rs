//! The opcode subset used by the standard templates.

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
/// `OP_1` .. `OP_16` are `OP_1 + (k - 1)`.
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Largest length encoded directly in the opcode byte.
pub const MAX_DIRECT_PUSH: usize = 0x4b;

/// Opcode pushing the small integer `k` (0..=16).
pub fn small_int(k: usize) -> Option<u8> {
    match k {
        0 => Some(OP_0),
        1..=16 => Some(OP_1 + (k as u8 - 1)),
        _ => None,
    }
}

/// Inverse of [`small_int`].
pub fn decode_small_int(op: u8) -> Option<usize> {
    match op {
        OP_0 => Some(0),
        OP_1..=OP_16 => Some((op - OP_1) as usize + 1),
        _ => None,
    }
}

/// Append a minimal data push of `data` to `script`.
///
/// Pushes above `u16::MAX` bytes never occur in the standard templates.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len <= MAX_DIRECT_PUSH {
        script.push(len as u8);
    } else if len <= u8::MAX as usize {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    }
    script.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_ints_roundtrip() {
        for k in 0..=16 {
            assert_eq!(decode_small_int(small_int(k).unwrap()), Some(k));
        }
        assert_eq!(small_int(17), None);
        assert_eq!(decode_small_int(OP_DUP), None);
    }

    #[test]
    fn push_uses_minimal_prefix() {
        let mut s = Vec::new();
        push_data(&mut s, &[0xAA; 20]);
        assert_eq!(s[0], 20);
        assert_eq!(s.len(), 21);

        let mut s = Vec::new();
        push_data(&mut s, &[0xAA; 100]);
        assert_eq!(&s[..2], &[OP_PUSHDATA1, 100]);

        let mut s = Vec::new();
        push_data(&mut s, &[0xAA; 300]);
        assert_eq!(&s[..3], &[OP_PUSHDATA2, 0x2c, 0x01]);
        assert_eq!(s.len(), 303);
    }
}
