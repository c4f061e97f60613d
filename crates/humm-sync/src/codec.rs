//! Wire encoding for record batches.

use humm_log::SignedAction;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

const BATCH_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct RecordBatch {
    version: u8,
    actions: Vec<SignedAction>,
}

/// Encode signed actions for transfer. Record hashes are not sent; the
/// receiver recomputes them.
pub fn encode_batch(actions: &[SignedAction]) -> SyncResult<Vec<u8>> {
    let batch = RecordBatch {
        version: BATCH_VERSION,
        actions: actions.to_vec(),
    };
    Ok(bincode::serialize(&batch)?)
}

pub fn decode_batch(bytes: &[u8]) -> SyncResult<Vec<SignedAction>> {
    let batch: RecordBatch = bincode::deserialize(bytes)?;
    if batch.version != BATCH_VERSION {
        return Err(crate::error::SyncError::Encoding(format!(
            "unsupported batch version {}",
            batch.version
        )));
    }
    Ok(batch.actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use humm_log::{Agent, Op, TombstoneOp};
    use humm_types::ContentHash;

    #[test]
    fn batch_survives_transfer_and_still_verifies() {
        let agent = Agent::generate(1);
        let signed = agent
            .sign(Op::Tombstone(TombstoneOp {
                target: ContentHash::from_hash([9; 32]),
            }))
            .unwrap();
        let bytes = encode_batch(&[signed.clone()]).unwrap();
        let decoded = decode_batch(&bytes).unwrap();
        assert_eq!(decoded, vec![signed]);
        assert!(decoded[0].verify().is_ok());
    }

    #[test]
    fn garbage_is_an_encoding_error() {
        assert!(matches!(
            decode_batch(&[0xff; 3]),
            Err(crate::error::SyncError::Encoding(_))
        ));
    }
}
