use std::collections::VecDeque;

use crate::shared::frame::Frame;

/// Ring of the most recent frames, sized to hold `pre_seconds` of video.
pub struct FramePrebuffer {
    frames: VecDeque<Frame>,
    capacity: usize,
    pre_seconds: f64,
}

impl FramePrebuffer {
    /// Capacity is `pre_seconds * fps`, at least one frame.
    pub fn new(pre_seconds: f64, fps: f64) -> Self {
        let capacity = ((pre_seconds * fps) as usize).max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            pre_seconds,
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    /// Frames captured in `[now - pre_seconds, now]`, oldest first.
    pub fn window(&self, now: f64) -> Vec<Frame> {
        let earliest = now - self.pre_seconds;
        self.frames
            .iter()
            .filter(|f| f.timestamp() >= earliest && f.timestamp() <= now)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn frame(index: usize, timestamp: f64) -> Frame {
        Frame::blank(2, 2, index, timestamp)
    }

    #[rstest]
    #[case::five_seconds_at_20(5.0, 20.0, 100)]
    #[case::fractional(0.5, 30.0, 15)]
    #[case::at_least_one(0.0, 30.0, 1)]
    fn test_capacity(#[case] seconds: f64, #[case] fps: f64, #[case] expected: usize) {
        assert_eq!(FramePrebuffer::new(seconds, fps).capacity(), expected);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut buffer = FramePrebuffer::new(1.0, 3.0);
        for i in 0..5 {
            buffer.push(frame(i, i as f64 / 3.0));
        }
        assert_eq!(buffer.len(), 3);
        let indices: Vec<usize> = buffer.window(10.0).iter().map(|f| f.index()).collect();
        assert!(indices.is_empty());
        let indices: Vec<usize> = buffer.window(4.0 / 3.0).iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![2, 3, 4]);
    }

    #[test]
    fn test_window_excludes_frames_outside_range() {
        let mut buffer = FramePrebuffer::new(2.0, 10.0);
        for (i, t) in [0.0, 1.0, 2.0, 3.0, 4.0].iter().enumerate() {
            buffer.push(frame(i, *t));
        }
        let indices: Vec<usize> = buffer.window(3.0).iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_buffer_window() {
        let buffer = FramePrebuffer::new(5.0, 20.0);
        assert!(buffer.is_empty());
        assert!(buffer.window(1.0).is_empty());
    }
}
