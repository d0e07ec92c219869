//! Off-thread convolution.
//!
//! The source buffer is handed to a dedicated OS thread; the caller gets a
//! [`ConvolutionJob`] and can await it, poll it or block on it. The source is
//! shared immutably, never written, so the layer that owns it stays intact
//! whatever happens to the job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokio::sync::oneshot;

use crate::buffer::PixelBuffer;
use crate::error::FilterError;
use crate::filter::convolve::convolve_cancellable;
use crate::filter::kernel::Kernel;

/// Handle to a convolution running on a worker thread.
///
/// Dropping the handle does not stop the worker; it runs to completion and
/// its result is discarded. Call [`cancel`](Self::cancel) to stop it early.
pub struct ConvolutionJob {
    rx: oneshot::Receiver<Option<PixelBuffer>>,
    cancel: Arc<AtomicBool>,
}

/// Start convolving `src` with `kernel` on a new worker thread.
pub fn spawn_convolution(
    src: impl Into<Arc<PixelBuffer>>,
    kernel: Kernel,
) -> Result<ConvolutionJob, FilterError> {
    spawn_with_flag(src.into(), kernel, Arc::new(AtomicBool::new(false)))
}

fn spawn_with_flag(
    src: Arc<PixelBuffer>,
    kernel: Kernel,
    cancel: Arc<AtomicBool>,
) -> Result<ConvolutionJob, FilterError> {
    let (tx, rx) = oneshot::channel();
    let flag = Arc::clone(&cancel);

    tracing::info!(
        width = src.width(),
        height = src.height(),
        "starting background convolution"
    );

    std::thread::Builder::new()
        .name("pigment-convolve".into())
        .spawn(move || {
            let started = Instant::now();
            let result = convolve_cancellable(&src, &kernel, &flag);
            match &result {
                Some(_) => tracing::debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "background convolution finished"
                ),
                None => tracing::info!("background convolution cancelled"),
            }
            // The receiver is gone if the caller dismissed the job.
            let _ = tx.send(result);
        })?;

    Ok(ConvolutionJob { rx, cancel })
}

/// Cloneable cancel switch for a running job, usable after the job itself
/// has been moved into [`ConvolutionJob::finish`].
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl ConvolutionJob {
    /// Ask the worker to stop at the next row boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    /// Wait for the result without blocking the calling thread.
    pub async fn finish(self) -> Result<PixelBuffer, FilterError> {
        match self.rx.await {
            Ok(result) => result.ok_or(FilterError::Cancelled),
            Err(_) => Err(FilterError::WorkerLost),
        }
    }

    /// Poll for the result. `None` while the worker is still running.
    ///
    /// Once a result has been returned the job is spent and further calls
    /// report [`FilterError::WorkerLost`].
    pub fn try_finish(&mut self) -> Option<Result<PixelBuffer, FilterError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result.ok_or(FilterError::Cancelled)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(FilterError::WorkerLost)),
        }
    }

    /// Block the current thread until the result arrives.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`finish`](Self::finish) there.
    pub fn wait(self) -> Result<PixelBuffer, FilterError> {
        match self.rx.blocking_recv() {
            Ok(result) => result.ok_or(FilterError::Cancelled),
            Err(_) => Err(FilterError::WorkerLost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::convolve::convolve;

    fn noise(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let v = (x * 31 + y * 57) % 256;
            [v as u8, (255 - v) as u8, (v / 2) as u8, 255]
        })
    }

    #[tokio::test]
    async fn test_finish_matches_synchronous_convolution() {
        let src = noise(64, 48);
        let expected = convolve(&src, &Kernel::SHARPEN);
        let job = spawn_convolution(src, Kernel::SHARPEN).unwrap();
        assert_eq!(job.finish().await.unwrap(), expected);
    }

    #[test]
    fn test_wait_blocks_until_done() {
        let src = Arc::new(noise(32, 32));
        let job = spawn_convolution(Arc::clone(&src), Kernel::GAUSSIAN).unwrap();
        let out = job.wait().unwrap();
        assert_eq!(out, convolve(&src, &Kernel::GAUSSIAN));
        // The shared source is untouched.
        assert_eq!(*src, noise(32, 32));
    }

    #[test]
    fn test_try_finish_eventually_yields() {
        let mut job = spawn_convolution(noise(16, 16), Kernel::BOX_BLUR).unwrap();
        let result = loop {
            if let Some(result) = job.try_finish() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        };
        assert!(result.is_ok());
        assert!(matches!(job.try_finish(), Some(Err(FilterError::WorkerLost))));
    }

    #[test]
    fn test_cancelled_job_reports_cancelled() {
        let flag = Arc::new(AtomicBool::new(true));
        let job = spawn_with_flag(Arc::new(noise(16, 16)), Kernel::BOX_BLUR, flag).unwrap();
        assert!(job.is_cancelled());
        assert!(matches!(job.wait(), Err(FilterError::Cancelled)));
    }

    #[test]
    fn test_cancel_handle_shares_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let job = spawn_with_flag(Arc::new(noise(4, 4)), Kernel::IDENTITY, flag).unwrap();
        let handle = job.cancel_handle();
        handle.cancel();
        assert!(job.is_cancelled());
        assert!(handle.clone().is_cancelled());
        let _ = job.wait();
    }
}
