//! Compact binary snapshots of a `Document` (MessagePack via `rmp-serde`).
//!
//! Used where an IR crosses a process or storage boundary and text would
//! have to be re-parsed on the other side.

use crate::model::Document;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Serialize `doc` with named fields, so snapshots survive added fields.
pub fn encode(doc: &Document) -> Result<Vec<u8>, SnapshotError> {
    let bytes = rmp_serde::to_vec_named(doc)?;
    log::debug!("encoded snapshot of frame `{}`: {} bytes", doc.frame.id, bytes.len());
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Document, SnapshotError> {
    Ok(rmp_serde::from_slice(bytes)?)
}
