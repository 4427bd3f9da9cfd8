use proptest::prelude::*;
use quill_protocol::{decode_frame, encode_frame, Action, Message, Payload};
use quill_types::{
    Address, Block, BlockHash, BlockHeader, OutPoint, Peer, Script, Transaction, TxHash, TxIn,
    TxOut, UnspentTxOut,
};

fn arb_hash() -> impl Strategy<Value = TxHash> {
    any::<[u8; 32]>().prop_map(TxHash::new)
}

fn arb_address() -> impl Strategy<Value = Address> {
    ("(qk|qs)_[13-9a-km-uw-z]{1,39}").prop_map(|s| Address::new(s).unwrap())
}

fn arb_script() -> impl Strategy<Value = Script> {
    proptest::collection::vec(any::<u8>(), 0..64).prop_map(Script::new)
}

fn arb_outpoint() -> impl Strategy<Value = OutPoint> {
    (arb_hash(), any::<u32>()).prop_map(|(txid, index)| OutPoint::new(txid, index))
}

fn arb_tx() -> impl Strategy<Value = Transaction> {
    let txin = (arb_outpoint(), arb_script(), any::<u32>()).prop_map(|(to_spend, signature_script, sequence)| TxIn {
        to_spend,
        signature_script,
        sequence,
    });
    let txout = (any::<u64>(), arb_script()).prop_map(|(value, locking_script)| TxOut {
        value,
        locking_script,
    });
    (
        proptest::collection::vec(txin, 0..4),
        proptest::collection::vec(txout, 0..4),
    )
        .prop_map(|(inputs, outputs)| Transaction::new(inputs, outputs))
}

fn arb_utxo() -> impl Strategy<Value = UnspentTxOut> {
    (arb_outpoint(), any::<u64>(), any::<u64>(), arb_address(), any::<bool>()).prop_map(
        |(outpoint, value, height, address, is_coinbase)| UnspentTxOut {
            outpoint,
            value,
            height,
            address,
            is_coinbase,
        },
    )
}

fn arb_block() -> impl Strategy<Value = Block> {
    (
        any::<u32>(),
        any::<[u8; 32]>(),
        arb_hash(),
        any::<u64>(),
        any::<u32>(),
        any::<u64>(),
        proptest::collection::vec(arb_tx(), 0..3),
    )
        .prop_map(|(version, prev, merkle_root, timestamp, bits, nonce, txns)| Block {
            header: BlockHeader {
                version,
                prev_block_hash: BlockHash::new(prev),
                merkle_root,
                timestamp,
                bits,
                nonce,
            },
            txns,
        })
}

fn arb_peer() -> impl Strategy<Value = Peer> {
    ("[a-z0-9.]{1,20}", any::<u16>()).prop_map(|(host, port)| Peer::new(host, port))
}

/// Every action paired with every payload it may carry.
fn arb_message() -> impl Strategy<Value = Message> {
    let body = prop_oneof![
        arb_address().prop_map(|a| (Action::Balance4Addr, Payload::Address(a))),
        any::<u64>().prop_map(|b| (Action::Balance4Addr, Payload::Balance(b))),
        arb_address().prop_map(|a| (Action::Utxo4Addr, Payload::Address(a))),
        proptest::collection::vec(arb_utxo(), 0..5).prop_map(|u| (Action::Utxo4Addr, Payload::Utxos(u))),
        arb_tx().prop_map(|t| (Action::TxSubmit, Payload::Transaction(t))),
        arb_hash().prop_map(|h| (Action::TxStatusReq, Payload::TxId(h))),
        ".{0,32}".prop_map(|s| (Action::TxStatusResp, Payload::Status(s))),
        ".{0,32}".prop_map(|s| (Action::Error, Payload::Text(s))),
        arb_block().prop_map(|b| (Action::BlockAnnounce, Payload::Block(b))),
        proptest::collection::vec(arb_peer(), 0..5).prop_map(|p| (Action::PeerExtend, Payload::Peers(p))),
    ];
    (body, any::<u16>()).prop_map(|((action, payload), port)| {
        Message::new(action, payload).unwrap().with_reply_port(port)
    })
}

proptest! {
    #[test]
    fn every_message_survives_framing(msg in arb_message()) {
        let frame = encode_frame(&msg).unwrap();
        let (decoded, consumed) = decode_frame(&frame).unwrap();
        prop_assert_eq!(consumed, frame.len());
        prop_assert_eq!(decoded, msg);
    }

    #[test]
    fn back_to_back_frames_decode_in_order(a in arb_message(), b in arb_message()) {
        let mut stream = encode_frame(&a).unwrap();
        stream.extend(encode_frame(&b).unwrap());
        let (first, used) = decode_frame(&stream).unwrap();
        let (second, _) = decode_frame(&stream[used..]).unwrap();
        prop_assert_eq!(first, a);
        prop_assert_eq!(second, b);
    }

    #[test]
    fn decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_frame(&bytes);
    }
}
