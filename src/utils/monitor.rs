use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// 批次進度追蹤，可在多個工作中共享
#[derive(Debug)]
pub struct BatchProgress {
    label: String,
    total: usize,
    completed: AtomicUsize,
    step: usize,
    start_time: Instant,
}

impl BatchProgress {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        // 約每 10% 輸出一次
        let step = (total / 10).max(1);

        Self {
            label: label.into(),
            total,
            completed: AtomicUsize::new(0),
            step,
            start_time: Instant::now(),
        }
    }

    /// 記錄一個完成的單位，回傳目前完成數
    pub fn tick(&self) -> usize {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;

        if done % self.step == 0 || done == self.total {
            let percent = if self.total > 0 {
                done as f64 / self.total as f64 * 100.0
            } else {
                100.0
            };
            tracing::info!(
                "⏳ {}: {}/{} ({:.0}%) after {:?}",
                self.label,
                done,
                self.total,
                percent,
                self.elapsed()
            );
        }

        done
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_final(&self) {
        tracing::info!(
            "📊 {} finished - {}/{} units in {:?}",
            self.label,
            self.completed(),
            self.total,
            self.elapsed()
        );
    }
}
