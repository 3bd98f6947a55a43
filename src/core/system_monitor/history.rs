use std::collections::VecDeque;

pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Rolling window of recent samples for the overview charts
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    pub cpu_usage: VecDeque<f32>,
    pub memory_usage: VecDeque<f32>,
    pub upload: VecDeque<f64>,
    pub download: VecDeque<f64>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cpu_usage: VecDeque::with_capacity(capacity),
            memory_usage: VecDeque::with_capacity(capacity),
            upload: VecDeque::with_capacity(capacity),
            download: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push_usage(&mut self, cpu: f32, memory: f32) {
        let capacity = self.capacity;
        Self::push_value(&mut self.cpu_usage, cpu, capacity);
        Self::push_value(&mut self.memory_usage, memory, capacity);
    }

    pub fn push_traffic(&mut self, upload: f64, download: f64) {
        let capacity = self.capacity;
        Self::push_value(&mut self.upload, upload, capacity);
        Self::push_value(&mut self.download, download, capacity);
    }

    fn push_value<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(value);
    }

    /// Percentages scaled by 10 so bar charts keep one decimal (0-1000)
    pub fn cpu_as_u64(&self) -> Vec<u64> {
        self.cpu_usage.iter().map(|&v| (v * 10.0) as u64).collect()
    }

    pub fn memory_as_u64(&self) -> Vec<u64> {
        self.memory_usage.iter().map(|&v| (v * 10.0) as u64).collect()
    }

    pub fn upload_as_u64(&self) -> Vec<u64> {
        self.upload.iter().map(|&v| v.max(0.0) as u64).collect()
    }

    pub fn download_as_u64(&self) -> Vec<u64> {
        self.download.iter().map(|&v| v.max(0.0) as u64).collect()
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_oldest_at_capacity() {
        let mut history = MetricsHistory::with_capacity(3);
        for i in 0..5 {
            history.push_usage(i as f32, 0.0);
        }
        assert_eq!(history.cpu_usage, VecDeque::from(vec![2.0, 3.0, 4.0]));
        assert_eq!(history.memory_usage.len(), 3);
    }

    #[test]
    fn test_scaled_views() {
        let mut history = MetricsHistory::new();
        history.push_usage(12.34, 50.0);
        history.push_traffic(-1.0, 2048.5);
        assert_eq!(history.cpu_as_u64(), vec![123]);
        assert_eq!(history.memory_as_u64(), vec![500]);
        assert_eq!(history.upload_as_u64(), vec![0]);
        assert_eq!(history.download_as_u64(), vec![2048]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = MetricsHistory::with_capacity(0);
        history.push_traffic(1.0, 1.0);
        history.push_traffic(2.0, 2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.upload, VecDeque::from(vec![2.0]));
    }
}
