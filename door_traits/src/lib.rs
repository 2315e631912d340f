pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Consumer of finished frames: one timestamp plus one angle per door.
///
/// Frames arrive strictly in timestamp order; `finish` is called once after
/// the last frame so buffered sinks can flush.
pub trait FrameSink {
    fn write_frame(
        &mut self,
        timestamp_ms: u64,
        angles: &[i32],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory sink, handy for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub frames: Vec<(u64, Vec<i32>)>,
    pub finished: bool,
}

impl FrameSink for VecSink {
    fn write_frame(
        &mut self,
        timestamp_ms: u64,
        angles: &[i32],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.frames.push((timestamp_ms, angles.to_vec()));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.finished = true;
        Ok(())
    }
}
