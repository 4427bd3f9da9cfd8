//! Parsing unlocking and redeem scripts back into their parts.

use quill_types::{PublicKey, Script, Signature};

use crate::opcodes::{self, OP_PUSHDATA1, OP_PUSHDATA2};
use crate::{ScriptError, UnlockProof};

#[derive(Debug, PartialEq, Eq)]
enum Instruction<'a> {
    Push(&'a [u8]),
    Op(u8),
}

struct Instructions<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Instructions<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ScriptError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| ScriptError::Malformed(format!("push of {n} bytes runs past end")))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn next_instruction(&mut self) -> Option<Result<Instruction<'a>, ScriptError>> {
        let op = *self.bytes.get(self.pos)?;
        self.pos += 1;
        let len = match op {
            1..=0x4b => op as usize,
            OP_PUSHDATA1 => match self.take(1) {
                Ok(b) => b[0] as usize,
                Err(e) => return Some(Err(e)),
            },
            OP_PUSHDATA2 => match self.take(2) {
                Ok(b) => u16::from_le_bytes([b[0], b[1]]) as usize,
                Err(e) => return Some(Err(e)),
            },
            _ => return Some(Ok(Instruction::Op(op))),
        };
        Some(self.take(len).map(Instruction::Push))
    }

    fn collect_all(mut self) -> Result<Vec<Instruction<'a>>, ScriptError> {
        let mut out = Vec::new();
        while let Some(ins) = self.next_instruction() {
            out.push(ins?);
        }
        Ok(out)
    }
}

fn signature(bytes: &[u8]) -> Result<Signature, ScriptError> {
    Signature::from_slice(bytes)
        .ok_or_else(|| ScriptError::Malformed(format!("signature of {} bytes", bytes.len())))
}

fn public_key(bytes: &[u8]) -> Result<PublicKey, ScriptError> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| ScriptError::Malformed(format!("public key of {} bytes", bytes.len())))?;
    Ok(PublicKey(arr))
}

/// Recover the ordered key list from a threshold redeem script.
pub fn parse_redeem_script(script: &Script) -> Result<Vec<PublicKey>, ScriptError> {
    let ins = Instructions::new(script.as_bytes()).collect_all()?;
    let [Instruction::Op(m_op), middle @ .., Instruction::Op(n_op), Instruction::Op(opcodes::OP_CHECKMULTISIG)] =
        ins.as_slice()
    else {
        return Err(ScriptError::Malformed("not a threshold redeem script".into()));
    };

    let m = opcodes::decode_small_int(*m_op)
        .ok_or_else(|| ScriptError::Malformed("bad signature count".into()))?;
    let n = opcodes::decode_small_int(*n_op)
        .ok_or_else(|| ScriptError::Malformed("bad key count".into()))?;
    if n < 2 || m + 1 != n || middle.len() != n {
        return Err(ScriptError::Malformed(format!(
            "redeem script lists {} keys for {m}-of-{n}",
            middle.len()
        )));
    }

    middle
        .iter()
        .map(|ins| match ins {
            Instruction::Push(bytes) => public_key(bytes),
            Instruction::Op(op) => Err(ScriptError::Malformed(format!(
                "unexpected opcode {op:#04x} in key list"
            ))),
        })
        .collect()
}

/// Split an unlocking script back into the proof it presents.
pub fn parse_unlocking_script(script: &Script) -> Result<UnlockProof, ScriptError> {
    let ins = Instructions::new(script.as_bytes()).collect_all()?;
    match ins.as_slice() {
        [Instruction::Push(sig), Instruction::Push(pk)] => Ok(UnlockProof::SingleSig {
            signature: signature(sig)?,
            public_key: public_key(pk)?,
        }),
        [Instruction::Op(opcodes::OP_0), sigs @ .., Instruction::Push(redeem)] => {
            let signatures = sigs
                .iter()
                .map(|ins| match ins {
                    Instruction::Push(bytes) => signature(bytes),
                    Instruction::Op(op) => Err(ScriptError::Malformed(format!(
                        "unexpected opcode {op:#04x} among signatures"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let redeem_script = Script::new(redeem.to_vec());
            let keys = parse_redeem_script(&redeem_script)?;
            if signatures.len() != keys.len() - 1 {
                return Err(ScriptError::SignatureCount {
                    got: signatures.len(),
                    expected: keys.len() - 1,
                });
            }
            Ok(UnlockProof::Threshold {
                signatures,
                redeem_script,
            })
        }
        _ => Err(ScriptError::Malformed("unrecognised unlocking script".into())),
    }
}
