#![forbid(unsafe_code)]

//! In-memory search over flow records.
//!
//! Audio is cut into half-overlapping chunks. Each chunk is fingerprinted,
//! its waveform line is encoded as a flow signature and stored as a
//! [`FlowRecord`]. A query goes through the same steps and is scored against
//! every stored chunk that shares its dominant flow (or against all chunks
//! when none do):
//!
//! ```text
//! score = flow_weight * flow_similarity + (1 - flow_weight) * pattern_similarity
//! ```
//!
//! Hits below `min_similarity` are dropped and the best `top_k` returned.

use std::cmp::Ordering;

use octodot_render::{FingerprintConfig, Fingerprinter};

use crate::record::{FlowRecord, RecordError};
use crate::signature::{FlowSignature, encode_flow};
use crate::similarity::{FlowWeights, pattern_similarity};
use crate::transition::FlowDirection;

/// Search and chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    /// Chunk length in seconds.
    pub chunk_secs: f64,
    /// Hits returned at most.
    pub top_k: usize,
    /// Lowest combined score kept.
    pub min_similarity: f64,
    /// Share of the combined score taken by flow similarity.
    pub flow_weight: f64,
    /// Fingerprint size for chunks and queries.
    pub fingerprint: FingerprintConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_secs: 3.0,
            top_k: 5,
            min_similarity: 0.4,
            flow_weight: 0.7,
            fingerprint: FingerprintConfig::default().width(40).height(2),
        }
    }
}

impl IndexConfig {
    /// Set the chunk length in seconds.
    #[must_use]
    pub fn chunk_secs(mut self, secs: f64) -> Self {
        self.chunk_secs = secs;
        self
    }

    /// Set the maximum number of hits.
    #[must_use]
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the score cut-off.
    #[must_use]
    pub fn min_similarity(mut self, min: f64) -> Self {
        self.min_similarity = min;
        self
    }

    /// Set the fingerprint size.
    #[must_use]
    pub fn fingerprint(mut self, fingerprint: FingerprintConfig) -> Self {
        self.fingerprint = fingerprint;
        self
    }
}

/// One indexed chunk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexEntry {
    /// Identifier of the source recording.
    pub source: String,
    /// Offset of the chunk in the source, in samples.
    pub offset: usize,
    /// Offset of the chunk in the source, in seconds.
    pub start_secs: f64,
    /// Stored signature.
    pub record: FlowRecord,
}

impl IndexEntry {
    /// `"{source}_{offset}"`.
    pub fn chunk_id(&self) -> String {
        format!("{}_{}", self.source, self.offset)
    }
}

/// A scored match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// The matched chunk.
    pub entry: &'a IndexEntry,
    /// Flow similarity to the query.
    pub flow_similarity: f64,
    /// Pattern similarity of the waveform lines.
    pub pattern_similarity: f64,
    /// Weighted combination used for ranking.
    pub score: f64,
}

/// Flow records with dominant-flow prefiltering.
#[derive(Debug, Clone)]
pub struct FlowIndex {
    config: IndexConfig,
    fingerprinter: Fingerprinter,
    weights: FlowWeights,
    entries: Vec<IndexEntry>,
}

impl Default for FlowIndex {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl FlowIndex {
    /// Empty index.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            fingerprinter: Fingerprinter::new(config.fingerprint),
            weights: FlowWeights::default(),
            entries: Vec::new(),
        }
    }

    /// Index over existing entries.
    pub fn with_entries(config: IndexConfig, entries: Vec<IndexEntry>) -> Self {
        Self {
            entries,
            ..Self::new(config)
        }
    }

    /// The active config.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Stored chunks in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Take the stored chunks.
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a record.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        offset: usize,
        start_secs: f64,
        record: FlowRecord,
    ) {
        self.entries.push(IndexEntry {
            source: source.into(),
            offset,
            start_secs,
            record,
        });
    }

    /// Chunk length in samples at `sample_rate`.
    fn chunk_len(&self, sample_rate: u32) -> usize {
        (self.config.chunk_secs * f64::from(sample_rate)).max(0.0) as usize
    }

    /// Signature of the fingerprint waveform line for `samples`.
    pub fn signature_of(&self, samples: &[f64], sample_rate: u32) -> (String, FlowSignature) {
        let waveform = self.fingerprinter.fingerprint(samples, sample_rate).waveform;
        let sig = encode_flow(&waveform);
        (waveform, sig)
    }

    /// Chunk `samples` with 50% overlap and store every chunk.
    ///
    /// Chunks start every half chunk while a full chunk plus at least one
    /// sample remains. Returns the number of chunks stored.
    pub fn index_samples(&mut self, source: &str, samples: &[f64], sample_rate: u32) -> usize {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("index_samples", source, samples = samples.len()).entered();

        let chunk = self.chunk_len(sample_rate);
        if chunk == 0 {
            return 0;
        }
        let step = (chunk / 2).max(1);
        let last = samples.len().saturating_sub(chunk);
        let rate = f64::from(sample_rate.max(1));

        let mut stored = 0;
        for offset in (0..last).step_by(step) {
            let (_, sig) = self.signature_of(&samples[offset..offset + chunk], sample_rate);
            self.insert(source, offset, offset as f64 / rate, FlowRecord::from_signature(&sig));
            stored += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(stored, "indexed chunks");
        stored
    }

    /// Fingerprint a query buffer and search for it.
    pub fn search(
        &self,
        samples: &[f64],
        sample_rate: u32,
    ) -> Result<Vec<SearchHit<'_>>, RecordError> {
        let (waveform, sig) = self.signature_of(samples, sample_rate);
        self.search_signature(&waveform, &sig)
    }

    /// Search with an already encoded waveform line.
    pub fn search_waveform(&self, waveform: &str) -> Result<Vec<SearchHit<'_>>, RecordError> {
        self.search_signature(waveform, &encode_flow(waveform))
    }

    fn search_signature(
        &self,
        waveform: &str,
        query: &FlowSignature,
    ) -> Result<Vec<SearchHit<'_>>, RecordError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "search",
            dominant = %query.dominant_flow,
            entries = self.entries.len()
        )
        .entered();

        let same_flow: Vec<&IndexEntry> = self
            .entries
            .iter()
            .filter(|e| e.record.dominant_flow == query.dominant_flow)
            .collect();
        let candidates = if same_flow.is_empty() {
            self.entries.iter().collect()
        } else {
            same_flow
        };

        let cfg = &self.config;
        let mut hits = Vec::new();
        for entry in candidates {
            let stored = entry.record.to_signature()?;
            let flow = self.weights.score(query, &stored);
            let pattern = pattern_similarity(waveform, &entry.record.waveform);
            let score = flow * cfg.flow_weight + pattern * (1.0 - cfg.flow_weight);
            if score >= cfg.min_similarity {
                hits.push(SearchHit {
                    entry,
                    flow_similarity: flow,
                    pattern_similarity: pattern,
                    score,
                });
            }
        }

        // Stable sort keeps insertion order among equal scores.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(cfg.top_k);
        Ok(hits)
    }

    /// Stored chunks per dominant flow, in [`FlowDirection::ALL`] order,
    /// omitting directions with no chunks.
    pub fn dominant_counts(&self) -> Vec<(FlowDirection, usize)> {
        FlowDirection::ALL
            .into_iter()
            .map(|dir| {
                let n = self
                    .entries
                    .iter()
                    .filter(|e| e.record.dominant_flow == dir)
                    .count();
                (dir, n)
            })
            .filter(|&(_, n)| n > 0)
            .collect()
    }
}
