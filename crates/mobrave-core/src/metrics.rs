//! Rows for the debug metrics table.

use crate::tracked::TrackState;

#[inline]
pub fn fmt2(v: f64) -> String {
    format!("{v:.2}")
}

/// Snapshot of the engine's `getMetrics()` result.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineMetrics {
    pub decode_time: f64,
    pub update_latents_time: f64,
    pub input_overflows: f64,
    pub output_underflows: f64,
    pub samples_available: f64,
}

impl EngineMetrics {
    /// Field names as the engine reports them.
    pub const FIELDS: [&'static str; 5] = [
        "decodeTime",
        "updateLatentsTime",
        "inputOverflows",
        "outputUnderflows",
        "samplesAvailable",
    ];

    /// Build from a field getter; missing fields read as zero.
    pub fn from_lookup(mut get: impl FnMut(&str) -> Option<f64>) -> Self {
        let mut read = |name: &str| get(name).unwrap_or(0.0);
        Self {
            decode_time: read("decodeTime"),
            update_latents_time: read("updateLatentsTime"),
            input_overflows: read("inputOverflows"),
            output_underflows: read("outputUnderflows"),
            samples_available: read("samplesAvailable"),
        }
    }

    pub fn rows(&self) -> Vec<(String, String)> {
        let values = [
            self.decode_time,
            self.update_latents_time,
            self.input_overflows,
            self.output_underflows,
            self.samples_available,
        ];
        Self::FIELDS
            .iter()
            .zip(values)
            .map(|(name, v)| (name.to_string(), fmt2(v)))
            .collect()
    }
}

pub fn readiness_rows(entries: &[(&str, TrackState)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(label, state)| (format!("{label}.state"), state.as_str().to_string()))
        .collect()
}

/// Progress of a streamed download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadProgress {
    pub received: u64,
    /// Total size from `Content-Length`, 0 when unknown.
    pub total: u64,
    pub done: bool,
}

/// Upper bound on the buffer reserved up front from `Content-Length`.
pub const MAX_DOWNLOAD_RESERVE: u64 = 64 * 1024 * 1024;

impl DownloadProgress {
    /// Bytes to reserve before the body arrives. The header is untrusted, so
    /// anything past [`MAX_DOWNLOAD_RESERVE`] grows as chunks come in.
    pub fn reserve_hint(&self) -> usize {
        usize::try_from(self.total.min(MAX_DOWNLOAD_RESERVE)).unwrap_or(0)
    }

    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return if self.done { 100 } else { 0 };
        }
        let pct = (100 * self.received).div_ceil(self.total);
        pct.min(100) as u32
    }

    pub fn advance(&mut self, bytes: u64) {
        self.received += bytes;
    }

    pub fn finish(&mut self) {
        self.done = true;
    }
}
