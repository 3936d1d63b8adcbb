use crate::clock::Stopwatch;
use crate::error::Result;
use log::{debug, trace};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Size of the scratch buffer and of each growth step of the response.
pub const DEFAULT_GROWTH_STEP: NonZeroUsize = match NonZeroUsize::new(64 * 1024) {
    Some(step) => step,
    None => panic!("growth step must be positive"),
};

/// Anything a response can be read from in chunks.
pub trait ChunkSource {
    /// Reads up to `buf.len()` bytes. Fewer bytes, zero included, means the
    /// source went quiet.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// One `read_chunk` call as seen by the collector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkRead {
    pub requested: usize,
    pub bytes: usize,
    pub started_ms: u64,
    pub finished_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Response {
    pub bytes: Vec<u8>,
    pub chunks: Vec<ChunkRead>,
    /// How often the destination had to grow past its initial capacity.
    pub growth_events: usize,
}

impl Response {
    pub fn last_chunk(&self) -> Option<&ChunkRead> {
        self.chunks.last()
    }
}

pub struct ResponseCollector {
    step: NonZeroUsize,
}

impl Default for ResponseCollector {
    fn default() -> Self {
        ResponseCollector::new(DEFAULT_GROWTH_STEP)
    }
}

impl ResponseCollector {
    pub fn new(step: NonZeroUsize) -> ResponseCollector {
        ResponseCollector { step }
    }

    pub fn step(&self) -> usize {
        self.step.get()
    }

    /// Reads chunks until one comes back short of what was asked for. A
    /// chunk that fills its request exactly means more may be pending, so
    /// the destination grows by one step and another chunk is read.
    /// `on_chunk` sees every chunk as soon as it has been read.
    pub fn collect<S, F>(&self, source: &mut S, clock: &Stopwatch, mut on_chunk: F) -> Result<Response>
    where
        S: ChunkSource,
        F: FnMut(&ChunkRead) -> Result<()>,
    {
        let step = self.step();
        let mut scratch = vec![0u8; step];
        let mut capacity = step;
        let mut response = Response {
            bytes: Vec::with_capacity(capacity),
            ..Response::default()
        };

        loop {
            let total = response.bytes.len();
            if total >= capacity {
                capacity += step;
                response.bytes.reserve_exact(capacity - total);
                response.growth_events += 1;
                debug!("Response buffer grown to {} bytes", capacity);
            }

            let requested = scratch.len().min(capacity - total);
            let started_ms = clock.elapsed_ms();
            let n = source.read_chunk(&mut scratch[..requested])?;
            let finished_ms = clock.elapsed_ms();
            trace!("Chunk of {} / {} byte(s)", n, requested);

            response.bytes.extend_from_slice(&scratch[..n]);
            let chunk = ChunkRead {
                requested,
                bytes: n,
                started_ms,
                finished_ms,
            };
            on_chunk(&chunk)?;
            response.chunks.push(chunk);

            if n < requested {
                break;
            }
        }

        debug!(
            "Collected {} byte(s) in {} chunk(s)",
            response.bytes.len(),
            response.chunks.len()
        );
        Ok(response)
    }
}
