// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for framing and submit decoding.

use proptest::prelude::*;
use tg_core::JobKind;

use super::*;

fn any_kind() -> impl Strategy<Value = JobKind> {
    prop::sample::select(JobKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn frames_survive_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let read_back = rt.block_on(async {
            let mut buffer = Vec::new();
            write_message(&mut buffer, &data).await.unwrap();
            read_message(&mut std::io::Cursor::new(buffer)).await.unwrap()
        });
        prop_assert_eq!(read_back, data);
    }

    #[test]
    fn submit_preserves_owner_and_payload(
        owner in "\\PC{0,40}",
        kind in any_kind(),
        text in "\\PC{0,80}",
        n in any::<i64>(),
    ) {
        let request = Request::Submit {
            owner: owner.clone(),
            kind,
            payload: serde_json::json!({ "target": text, "n": n }),
        };
        let decoded: Request = decode(&encode(&request).unwrap()).unwrap();
        prop_assert_eq!(decoded, request);
    }
}
