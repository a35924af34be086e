use std::io;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::git::{CommandRunner, PatchFetcher};

use super::channel::{PatchRequest, PatchResult};

/// Owns the [`PatchFetcher`] on a background thread so `git show` never runs
/// on the UI loop. Requests are handled one at a time, which keeps at most one
/// process in flight and guarantees the cache is checked before each spawn.
pub struct PatchWorker {
    request_tx: mpsc::UnboundedSender<PatchRequest>,
    result_rx: mpsc::UnboundedReceiver<PatchResult>,
}

impl PatchWorker {
    pub fn new<R>(fetcher: PatchFetcher<R>) -> io::Result<Self>
    where
        R: CommandRunner + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel::<PatchRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<PatchResult>();

        thread::Builder::new()
            .name("vdiff-patch".to_string())
            .spawn(move || worker_loop(fetcher, request_rx, result_tx))?;

        Ok(Self {
            request_tx,
            result_rx,
        })
    }

    /// Queue a fetch. Hands the request back if the worker thread is gone.
    pub fn request(&self, req: PatchRequest) -> Result<(), PatchRequest> {
        self.request_tx.send(req).map_err(|e| e.0)
    }

    pub fn try_recv(&mut self) -> Option<PatchResult> {
        self.result_rx.try_recv().ok()
    }

    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<PatchResult> {
        self.result_rx.recv().await
    }
}

fn worker_loop<R: CommandRunner>(
    mut fetcher: PatchFetcher<R>,
    mut request_rx: mpsc::UnboundedReceiver<PatchRequest>,
    result_tx: mpsc::UnboundedSender<PatchResult>,
) {
    info!("patch worker started");
    while let Some(mut request) = request_rx.blocking_recv() {
        // Skip anything the user already scrolled past.
        while let Ok(newer) = request_rx.try_recv() {
            debug!(skipped = %request.reference, "superseded patch request");
            request = newer;
        }

        let patch = fetcher.fetch(request.reference.as_str());
        let result = PatchResult {
            generation: request.generation,
            reference: request.reference,
            patch,
            cached_patches: fetcher.cache_len(),
        };
        if result_tx.send(result).is_err() {
            break;
        }
    }
    info!("patch worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{GitCommands, Reference, VdiffError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc as std_mpsc, Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingRunner {
        calls: AtomicUsize,
    }

    impl CommandRunner for CountingRunner {
        fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("patch for {}", argv.last().map(String::as_str).unwrap_or("")))
        }
    }

    fn request(generation: u64, id: &str) -> PatchRequest {
        PatchRequest {
            generation,
            reference: Reference::parse(id).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_repeat_request_reuses_cached_patch() {
        let runner = Arc::new(CountingRunner::default());
        let fetcher = PatchFetcher::new(Arc::clone(&runner), GitCommands::default());
        let mut worker = PatchWorker::new(fetcher).unwrap();

        worker.request(request(1, "aaa111")).unwrap();
        let first = worker.recv().await.unwrap();
        worker.request(request(2, "aaa111")).unwrap();
        let second = worker.recv().await.unwrap();

        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.generation, 2);
        assert_eq!(&*first.patch.unwrap(), "patch for aaa111");
        assert_eq!(&*second.patch.unwrap(), "patch for aaa111");
        assert_eq!(second.cached_patches, 1);
    }

    struct BrokenRunner;

    impl CommandRunner for BrokenRunner {
        fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
            Err(VdiffError::ExternalTool {
                command: argv.join(" "),
                code: Some(128),
                stderr: "fatal: bad object".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_errors_come_back_as_results() {
        let fetcher = PatchFetcher::new(BrokenRunner, GitCommands::default());
        let mut worker = PatchWorker::new(fetcher).unwrap();

        worker.request(request(7, "deadbeef")).unwrap();
        let result = worker.recv().await.unwrap();
        assert_eq!(result.generation, 7);
        assert_eq!(result.reference.as_str(), "deadbeef");
        assert!(matches!(result.patch, Err(VdiffError::ExternalTool { .. })));
        assert_eq!(result.cached_patches, 0);
    }

    /// Blocks every fetch until the test sends a release, recording the
    /// reference each spawn was for.
    struct GatedRunner {
        seen: Mutex<Vec<String>>,
        started: Mutex<std_mpsc::Sender<()>>,
        release: Mutex<std_mpsc::Receiver<()>>,
    }

    impl CommandRunner for GatedRunner {
        fn run(&self, argv: &[String]) -> Result<String, VdiffError> {
            let id = argv.last().cloned().unwrap_or_default();
            self.seen.lock().unwrap().push(id.clone());
            let _ = self.started.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv();
            Ok(format!("patch for {id}"))
        }
    }

    #[tokio::test]
    async fn test_superseded_requests_are_skipped() {
        let (started_tx, started_rx) = std_mpsc::channel();
        let (release_tx, release_rx) = std_mpsc::channel();
        let runner = Arc::new(GatedRunner {
            seen: Mutex::new(Vec::new()),
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        });
        let fetcher = PatchFetcher::new(Arc::clone(&runner), GitCommands::default());
        let mut worker = PatchWorker::new(fetcher).unwrap();

        worker.request(request(1, "aaa111")).unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        // Queued while the first fetch is still running.
        worker.request(request(2, "bbb222")).unwrap();
        worker.request(request(3, "ccc333")).unwrap();
        worker.request(request(4, "ddd444")).unwrap();

        release_tx.send(()).unwrap();
        release_tx.send(()).unwrap();

        let first = worker.recv().await.unwrap();
        let second = worker.recv().await.unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 4);
        assert_eq!(second.reference.as_str(), "ddd444");
        assert_eq!(*runner.seen.lock().unwrap(), vec!["aaa111", "ddd444"]);
    }

    struct PanickingRunner;

    impl CommandRunner for PanickingRunner {
        fn run(&self, _argv: &[String]) -> Result<String, VdiffError> {
            panic!("runner blew up");
        }
    }

    #[test]
    fn test_request_handed_back_once_worker_is_gone() {
        let fetcher = PatchFetcher::new(PanickingRunner, GitCommands::default());
        let worker = PatchWorker::new(fetcher).unwrap();
        worker.request(request(1, "aaa111")).unwrap();

        let mut rejected = None;
        for generation in 2..500 {
            if let Err(req) = worker.request(request(generation, "bbb222")) {
                rejected = Some(req);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let rejected = rejected.expect("worker thread should have stopped");
        assert_eq!(rejected.reference.as_str(), "bbb222");
    }
}
