// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading of packed segment streams.

use std::io::Read;

use tilesim_encoding::PackedSegment;

use crate::{Error, Result};

const WORD_SIZE: usize = size_of::<u64>();

/// Decodes a flat buffer of little-endian 64-bit segment words.
///
/// Fails if the buffer ends in the middle of a word; the contents of the words
/// are not validated.
pub fn segments_from_le_bytes(bytes: &[u8]) -> Result<Vec<PackedSegment>> {
    if bytes.len() % WORD_SIZE != 0 {
        return Err(Error::TruncatedInput { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(WORD_SIZE)
        .map(|word| PackedSegment::from_bits(u64::from_le(bytemuck::pod_read_unaligned(word))))
        .collect())
}

/// Reads `reader` to the end and decodes it with [`segments_from_le_bytes`].
pub fn read_segments(mut reader: impl Read) -> Result<Vec<PackedSegment>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("Read {} bytes of segment data", bytes.len());
    segments_from_le_bytes(&bytes)
}
