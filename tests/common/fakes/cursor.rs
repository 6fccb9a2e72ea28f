use pmt_metrics::core::clock::Timestamp;
use pmt_metrics::traits::Cursor;

/// Cursor recording every write, as a host's timeline would
#[derive(Debug, Default)]
pub struct RecordingCursor {
    pub points: Vec<(Timestamp, f64)>,
}

impl RecordingCursor {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, value)| value).collect()
    }

    pub fn is_ordered(&self) -> bool {
        self.points.windows(2).all(|pair| pair[0].0 <= pair[1].0)
    }
}

impl Cursor for RecordingCursor {
    fn write(&mut self, timestamp: Timestamp, value: f64) {
        self.points.push((timestamp, value));
    }
}
