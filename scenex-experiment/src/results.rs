use crate::error::ExperimentError;
use scenex_core::ResponseRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes the session's records as a pretty-printed JSON array.
pub fn write_results(path: &Path, records: &[ResponseRecord]) -> Result<(), ExperimentError> {
    let write_err = |source| ExperimentError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, records).map_err(ExperimentError::Encode)?;
    out.flush().map_err(write_err)?;
    info!(path = %path.display(), trials = records.len(), "results saved");
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub trials: usize,
    pub answered: usize,
    pub mean_rt_ms: Option<f64>,
    pub min_rt_ms: Option<f64>,
    pub max_rt_ms: Option<f64>,
}

impl ResultSummary {
    pub fn from_records(records: &[ResponseRecord]) -> Self {
        let rts: Vec<f64> = records.iter().filter_map(|r| r.rt).collect();
        let (mean, min, max) = if rts.is_empty() {
            (None, None, None)
        } else {
            (
                Some(rts.iter().sum::<f64>() / rts.len() as f64),
                Some(rts.iter().copied().fold(f64::INFINITY, f64::min)),
                Some(rts.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            )
        };
        Self {
            trials: records.len(),
            answered: records.iter().filter(|r| r.is_answered()).count(),
            mean_rt_ms: mean,
            min_rt_ms: min,
            max_rt_ms: max,
        }
    }

    pub fn log(&self) {
        info!(
            trials = self.trials,
            answered = self.answered,
            mean_rt_ms = self.mean_rt_ms,
            min_rt_ms = self.min_rt_ms,
            max_rt_ms = self.max_rt_ms,
            "session summary"
        );
    }
}
