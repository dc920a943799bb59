/*
MIT License
Copyright (c) 2021 Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Report every time this many percentage points are completed
const REPORT_EVERY: usize = 2;

/// Counts finished tasks and logs the progress. Can be shared
/// between threads.
#[derive(Debug)]
pub struct ProgressCounter {
    label: String,
    counter: AtomicUsize,
    last_reported: AtomicUsize,
    total_count: usize,
    start: Instant,
}

impl ProgressCounter {
    /// Starts counting towards `total_count`
    pub fn new<S: Into<String>>(label: S, total_count: usize) -> Self {
        Self {
            label: label.into(),
            counter: AtomicUsize::new(0),
            last_reported: AtomicUsize::new(0),
            total_count,
            start: Instant::now(),
        }
    }

    /// Percentage completed after `count` tasks
    fn percent(&self, count: usize) -> usize {
        if self.total_count == 0 {
            return 100;
        }
        (100 * count / self.total_count).min(100)
    }

    /// Registers one finished task. Returns the number of
    /// tasks finished so far.
    pub fn tic(&self) -> usize {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let progress = self.percent(count);
        let last = self.last_reported.load(Ordering::Relaxed);
        if progress >= last + REPORT_EVERY
            && self
                .last_reported
                .compare_exchange(last, progress, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            info!(
                "{}: {}% ({}/{})",
                self.label, progress, count, self.total_count
            );
        }
        count
    }

    /// Number of finished tasks
    pub fn count(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }

    /// Time since the counter was created
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Logs the end of the process
    pub fn done(&self) {
        info!(
            "{}: done after {:.2} seconds ({} of {} tasks)",
            self.label,
            self.elapsed().as_secs_f64(),
            self.count(),
            self.total_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        let p = ProgressCounter::new("test", 10);
        for i in 1..=10 {
            assert_eq!(p.tic(), i);
        }
        assert_eq!(p.count(), 10);
        assert_eq!(p.percent(10), 100);
        p.done();
    }

    #[test]
    fn test_threads() {
        let p = ProgressCounter::new("threads", 400);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        p.tic();
                    }
                });
            }
        });
        assert_eq!(p.count(), 400);
    }

    #[test]
    fn test_empty() {
        let p = ProgressCounter::new("empty", 0);
        assert_eq!(p.percent(0), 100);
    }
}
