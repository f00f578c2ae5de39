// Copyright (c) 2023 The ledger-ada Contributors

//! Chunked streaming for payloads exceeding a single APDU
//!
//! Payloads are split into ordered chunks, each tagged with a position
//! marker (carried in P1) and an aggregate frame mode (carried in P2).
//! Chunks must be delivered strictly in order, the app state machine
//! rejects anything else.
//!
//! ```text
//! L = 0 or L <= C   [SINGLE, Single]
//! L > C             [FIRST, Multi] [NEXT, Multi]* [LAST, Multi]
//! ```

use num_enum::TryFromPrimitive;
use strum::Display;

bitflags::bitflags! {
    /// Chunk position flags
    pub struct ChunkFlags: u8 {
        /// First chunk of a payload
        const FIRST = 0x01;
        /// Last chunk of a payload
        const LAST = 0x02;
        /// Payload fits in one chunk
        const SINGLE = Self::FIRST.bits | Self::LAST.bits;
    }
}

impl ChunkFlags {
    /// Intermediate chunk (neither first nor last)
    pub const NEXT: Self = Self::empty();
}

/// Aggregate frame mode, whether the payload needed more than one chunk
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum FrameMode {
    Single = 0x01,
    Multi = 0x02,
}

/// A single chunk of a streamed payload
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub flags: ChunkFlags,
    pub mode: FrameMode,
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// P1 encoding for this chunk
    pub fn p1(&self) -> u8 {
        self.flags.bits()
    }

    /// P2 encoding for this chunk
    pub fn p2(&self) -> u8 {
        self.mode as u8
    }

    /// Check whether this is the final chunk of the payload
    pub fn is_last(&self) -> bool {
        self.flags.contains(ChunkFlags::LAST)
    }
}

/// Iterator over the chunks of a payload, see [chunks]
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    payload: &'a [u8],
    max: usize,
    index: usize,
    count: usize,
}

/// Split a payload into chunks of at most `max` bytes
///
/// An empty payload yields one empty [ChunkFlags::SINGLE] chunk, `max`
/// is clamped to at least one byte.
pub fn chunks(payload: &[u8], max: usize) -> Chunks<'_> {
    let max = max.max(1);

    Chunks {
        payload,
        max,
        index: 0,
        count: chunk_count(payload.len(), max),
    }
}

/// Number of chunks required for a payload of `len` bytes
pub fn chunk_count(len: usize, max: usize) -> usize {
    match len {
        0 => 1,
        _ => (len + max.max(1) - 1) / max.max(1),
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let start = self.index * self.max;
        let end = (start + self.max).min(self.payload.len());

        let mode = match self.count {
            1 => FrameMode::Single,
            _ => FrameMode::Multi,
        };

        let mut flags = ChunkFlags::NEXT;
        if self.index == 0 {
            flags |= ChunkFlags::FIRST;
        }
        if self.index == self.count - 1 {
            flags |= ChunkFlags::LAST;
        }

        self.index += 1;

        Some(Chunk {
            flags,
            mode,
            data: &self.payload[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count - self.index;
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for Chunks<'a> {}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;

    #[test]
    fn empty_payload_single_chunk() {
        let c: Vec<_> = chunks(&[], 16).collect();

        assert_eq!(c.len(), 1);
        assert_eq!(c[0].flags, ChunkFlags::SINGLE);
        assert_eq!(c[0].mode, FrameMode::Single);
        assert!(c[0].data.is_empty());
    }

    #[test]
    fn exact_fit_single_chunk() {
        let p = [0xabu8; 16];
        let c: Vec<_> = chunks(&p, 16).collect();

        assert_eq!(c.len(), 1);
        assert_eq!((c[0].p1(), c[0].p2()), (0x03, 0x01));
    }

    #[test]
    fn multi_chunk_markers() {
        let p: Vec<u8> = (0..40).collect();
        let c: Vec<_> = chunks(&p, 16).collect();

        assert_eq!(c.len(), 3);
        assert_eq!(c[0].flags, ChunkFlags::FIRST);
        assert_eq!(c[1].flags, ChunkFlags::NEXT);
        assert_eq!(c[2].flags, ChunkFlags::LAST);
        assert!(c.iter().all(|c| c.mode == FrameMode::Multi));
        assert_eq!(c[2].data, &p[32..]);
    }

    #[test]
    fn zero_max_clamped() {
        let c: Vec<_> = chunks(&[1, 2], 0).collect();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn random_payload_reassembly() {
        for _ in 0..200 {
            let len = random::<usize>() % 1024;
            let max = 1 + random::<usize>() % 255;
            let payload: Vec<u8> = (0..len).map(|_| random()).collect();

            let c: Vec<_> = chunks(&payload, max).collect();

            // Chunk count
            let expected = match len {
                0 => 1,
                _ => (len + max - 1) / max,
            };
            assert_eq!(c.len(), expected, "len: {len} max: {max}");

            // Position markers
            assert!(c[0].flags.contains(ChunkFlags::FIRST));
            assert!(c[c.len() - 1].is_last());
            if c.len() == 1 {
                assert_eq!(c[0].flags, ChunkFlags::SINGLE);
            }
            assert!(c.iter().all(|c| c.data.len() <= max));

            // Reassembly
            let joined: Vec<u8> = c.iter().flat_map(|c| c.data.iter().copied()).collect();
            assert_eq!(joined, payload);
        }
    }
}
