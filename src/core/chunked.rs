//! Reconstruction of large remote payloads from bounded-size chunk calls.
//!
//! A single evaluator call cannot safely return an arbitrarily large value, so
//! remote content is read as a size query followed by chunk queries of a
//! fixed size `C` at offsets `0, C, 2C, ...`:
//!
//! ```text
//! size query ──> size < 0  : NotFound
//!            ──> size == 0 : Empty
//!            ──> chunk loop(offset = 0) ──> offset >= size : Complete
//! ```
//!
//! Every interior chunk must be exactly `C` bytes long, only the final chunk
//! may be shorter, and the reassembled length must equal the reported size.
//! Any violation is a [`GnitError::ProtocolError`]. Chunks may be fetched by
//! several workers; reassembly is always in offset order and one failed
//! chunk fails the whole retrieval.

use crate::core::error::{GnitError, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Default number of bytes requested per chunk call
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Chunks worth of buffer reserved before any content has arrived
const INITIAL_CHUNKS: usize = 16;

/// Remote value readable through a size accessor and a chunk accessor
pub trait ChunkSource {
    /// Human-readable name of the remote value, used in error messages
    fn resource(&self) -> &str;

    /// Total size in bytes. Negative means the value does not exist.
    fn size(&self) -> Result<i64>;

    /// At most `length` bytes starting at `offset`
    fn chunk(&self, offset: u64, length: usize) -> Result<Vec<u8>>;
}

/// A single chunk request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub offset: u64,
    pub length: usize,
}

/// Terminal state of a retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    NotFound,
    Empty,
    Complete(Vec<u8>),
}

impl Retrieval {
    /// Content of the value, `None` when it does not exist
    pub fn into_content(self) -> Option<Vec<u8>> {
        match self {
            Retrieval::NotFound => None,
            Retrieval::Empty => Some(Vec::new()),
            Retrieval::Complete(bytes) => Some(bytes),
        }
    }
}

/// Driver for the size-then-chunks protocol
#[derive(Debug, Clone)]
pub struct ChunkedRetrieval {
    chunk_size: usize,
    workers: usize,
}

impl Default for ChunkedRetrieval {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkedRetrieval {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            workers: 1,
        }
    }

    /// Number of concurrent chunk fetches used by [`Self::retrieve_parallel`]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk requests covering `[0, size)`, produced lazily
    pub fn plan(&self, size: u64) -> impl Iterator<Item = ChunkDescriptor> {
        let length = self.chunk_size;
        (0..size).step_by(length).map(move |offset| ChunkDescriptor { offset, length })
    }

    /// Fetch the value one chunk after another
    pub fn retrieve<S: ChunkSource + ?Sized>(&self, source: &S) -> Result<Retrieval> {
        let size = match self.query_size(source)? {
            Ok(size) => size,
            Err(terminal) => return Ok(terminal),
        };
        self.retrieve_sequential(source, size)
    }

    /// Fetch chunks on up to `workers` threads, then reassemble by offset
    pub fn retrieve_parallel<S: ChunkSource + Sync + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Retrieval> {
        let size = match self.query_size(source)? {
            Ok(size) => size,
            Err(terminal) => return Ok(terminal),
        };

        let chunk_count = size.div_ceil(self.chunk_size as u64);
        if self.workers == 1 || chunk_count == 1 {
            return self.retrieve_sequential(source, size);
        }

        let next = AtomicU64::new(0);
        let failed = AtomicBool::new(false);
        let results: Mutex<Vec<(ChunkDescriptor, Result<Vec<u8>>)>> = Mutex::new(Vec::new());
        let threads = usize::try_from(chunk_count).map_or(self.workers, |n| self.workers.min(n));

        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| loop {
                    if failed.load(Ordering::Relaxed) {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(offset) = index
                        .checked_mul(self.chunk_size as u64)
                        .filter(|&offset| offset < size)
                    else {
                        break;
                    };
                    let descriptor = ChunkDescriptor {
                        offset,
                        length: self.chunk_size,
                    };
                    let result = self.fetch_chunk(source, descriptor, size);
                    if result.is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                    if let Ok(mut guard) = results.lock() {
                        guard.push((descriptor, result));
                    }
                });
            }
        });

        let mut fetched = results
            .into_inner()
            .map_err(|_| GnitError::protocol_error(source.resource(), 0, "chunk worker panicked"))?;
        fetched.sort_by_key(|(descriptor, _)| descriptor.offset);

        // report the chunk that failed, not the gap it left behind
        if let Some(index) = fetched.iter().position(|(_, chunk)| chunk.is_err()) {
            if let (_, Err(e)) = fetched.swap_remove(index) {
                return Err(e);
            }
        }

        let mut content = Vec::with_capacity(self.initial_capacity(size));
        for (descriptor, chunk) in fetched {
            let chunk = chunk?;
            if descriptor.offset != content.len() as u64 {
                return Err(GnitError::protocol_error(
                    source.resource(),
                    descriptor.offset,
                    format!("chunk missing before offset (have {} bytes)", content.len()),
                ));
            }
            content.extend_from_slice(&chunk);
        }

        self.finish(source, size, content)
    }

    fn retrieve_sequential<S: ChunkSource + ?Sized>(
        &self,
        source: &S,
        size: u64,
    ) -> Result<Retrieval> {
        let mut content = Vec::with_capacity(self.initial_capacity(size));
        for descriptor in self.plan(size) {
            let chunk = self.fetch_chunk(source, descriptor, size)?;
            content.extend_from_slice(&chunk);
        }
        self.finish(source, size, content)
    }

    /// Buffer reserved up front: the reported size, capped at
    /// [`INITIAL_CHUNKS`] chunks
    fn initial_capacity(&self, size: u64) -> usize {
        let bound = self.chunk_size.saturating_mul(INITIAL_CHUNKS);
        usize::try_from(size).map_or(bound, |size| size.min(bound))
    }

    /// `Ok(size)` to continue with the chunk loop, `Err(terminal)` to stop.
    fn query_size<S: ChunkSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<std::result::Result<u64, Retrieval>> {
        let size = source.size()?;
        log::debug!("Size of {}: {}", source.resource(), size);

        if size < 0 {
            return Ok(Err(Retrieval::NotFound));
        }
        if size == 0 {
            return Ok(Err(Retrieval::Empty));
        }
        Ok(Ok(size as u64))
    }

    fn fetch_chunk<S: ChunkSource + ?Sized>(
        &self,
        source: &S,
        descriptor: ChunkDescriptor,
        size: u64,
    ) -> Result<Vec<u8>> {
        let ChunkDescriptor { offset, length } = descriptor;
        log::debug!(
            "Fetching chunk of {} at offset {} (length {})",
            source.resource(),
            offset,
            length
        );

        let chunk = source.chunk(offset, length)?;

        if chunk.len() > length {
            return Err(GnitError::protocol_error(
                source.resource(),
                offset,
                format!("chunk of {} bytes exceeds requested {}", chunk.len(), length),
            ));
        }

        let is_final = offset + length as u64 >= size;
        if !is_final && chunk.len() < length {
            return Err(GnitError::protocol_error(
                source.resource(),
                offset,
                format!("short interior chunk: {} of {} bytes", chunk.len(), length),
            ));
        }

        Ok(chunk)
    }

    fn finish<S: ChunkSource + ?Sized>(
        &self,
        source: &S,
        size: u64,
        content: Vec<u8>,
    ) -> Result<Retrieval> {
        if content.len() as u64 != size {
            return Err(GnitError::protocol_error(
                source.resource(),
                content.len() as u64,
                format!("reassembled {} bytes, size query reported {}", content.len(), size),
            ));
        }
        Ok(Retrieval::Complete(content))
    }
}
