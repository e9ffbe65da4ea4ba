use crate::dedup::DedupTable;
use crate::error::{Result, WatcherError};
use crate::events::{ChangeEvent, EventType};
use crate::processor::{FileProcessor, ProcessOutcome};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(2);
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Capacity of the completion channel returned by [`start`]
pub const COMPLETION_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct WatcherConfig {
	/// Directory to watch (non-recursively)
	pub path: PathBuf,
	/// Repeat creations of the same filename inside this window are ignored
	pub dedup_window: Duration,
	/// Minimum time between sweeps of the dedup table
	pub cleanup_interval: Duration,
	/// Pause between seeing a creation and acting on it
	pub settle_delay: Duration,
}

impl WatcherConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			dedup_window: DEFAULT_DEDUP_WINDOW,
			cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
			settle_delay: DEFAULT_SETTLE_DELAY,
		}
	}

	/// The dedup window must be non-zero and strictly shorter than the cleanup interval
	pub fn validate(&self) -> Result<()> {
		if self.dedup_window.is_zero() {
			return Err(WatcherError::configuration_error(
				"dedup_window",
				"must be greater than zero",
				"> 0ms",
				"0ms",
			));
		}
		if self.dedup_window >= self.cleanup_interval {
			return Err(WatcherError::configuration_error(
				"dedup_window",
				"must be shorter than cleanup_interval",
				&format!("< {:?}", self.cleanup_interval),
				&format!("{:?}", self.dedup_window),
			));
		}
		Ok(())
	}
}

/// Live subscription to change notifications for one directory.
///
/// Dropping it releases the underlying OS watch.
pub struct Subscription {
	events: mpsc::UnboundedReceiver<ChangeEvent>,
	errors: mpsc::UnboundedReceiver<notify::Error>,
	_watcher: Option<RecommendedWatcher>,
}

impl Subscription {
	pub fn from_channels(
		events: mpsc::UnboundedReceiver<ChangeEvent>,
		errors: mpsc::UnboundedReceiver<notify::Error>,
	) -> Self {
		Self { events, errors, _watcher: None }
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("os_watch", &self._watcher.is_some())
			.finish_non_exhaustive()
	}
}

/// Produces change notifications for a directory
pub trait NotificationSource: Send + Sync + 'static {
	fn subscribe(&self, path: &Path) -> Result<Subscription>;
}

/// Notification source backed by the platform watcher
#[derive(Debug, Clone)]
pub struct NotifySource {
	pub poll_interval: Duration,
}

impl Default for NotifySource {
	fn default() -> Self {
		Self { poll_interval: Duration::from_millis(100) }
	}
}

impl NotificationSource for NotifySource {
	fn subscribe(&self, path: &Path) -> Result<Subscription> {
		let (event_tx, events) = mpsc::unbounded_channel();
		let (error_tx, errors) = mpsc::unbounded_channel();

		let mut watcher = RecommendedWatcher::new(
			move |result: notify::Result<Event>| match result {
				Ok(event) => {
					let kind = event.kind;
					for path in event.paths {
						// receiver gone means the loop has exited
						let _ = event_tx.send(ChangeEvent::new(EventType::from(kind), path));
					}
				}
				Err(e) => {
					let _ = error_tx.send(e);
				}
			},
			Config::default().with_poll_interval(self.poll_interval),
		)?;
		watcher.watch(path, RecursiveMode::NonRecursive)?;

		Ok(Subscription { events, errors, _watcher: Some(watcher) })
	}
}

/// Notification source fed by hand through a [`ChannelFeed`].
///
/// Hands out exactly one subscription.
#[derive(Debug)]
pub struct ChannelSource {
	subscription: Mutex<Option<Subscription>>,
}

/// Sending half of a [`ChannelSource`]
#[derive(Debug)]
pub struct ChannelFeed {
	events: Option<mpsc::UnboundedSender<ChangeEvent>>,
	errors: Option<mpsc::UnboundedSender<notify::Error>>,
}

impl ChannelSource {
	pub fn new() -> (Self, ChannelFeed) {
		let (event_tx, events) = mpsc::unbounded_channel();
		let (error_tx, errors) = mpsc::unbounded_channel();
		let source = Self {
			subscription: Mutex::new(Some(Subscription::from_channels(events, errors))),
		};
		let feed = ChannelFeed { events: Some(event_tx), errors: Some(error_tx) };
		(source, feed)
	}
}

impl NotificationSource for ChannelSource {
	fn subscribe(&self, _path: &Path) -> Result<Subscription> {
		self.subscription
			.lock()
			.ok()
			.and_then(|mut guard| guard.take())
			.ok_or_else(|| {
				WatcherError::Notify(notify::Error::generic("channel source already subscribed"))
			})
	}
}

impl ChannelFeed {
	/// Returns `false` once the watch loop has released the subscription
	pub fn send(&self, event: ChangeEvent) -> bool {
		self.events.as_ref().is_some_and(|tx| tx.send(event).is_ok())
	}

	pub fn create(&self, path: impl Into<PathBuf>) -> bool {
		self.send(ChangeEvent::new(EventType::Create, path))
	}

	pub fn error(&self, err: notify::Error) -> bool {
		self.errors.as_ref().is_some_and(|tx| tx.send(err).is_ok())
	}

	pub fn close_events(&mut self) {
		self.events = None;
	}

	pub fn close_errors(&mut self) {
		self.errors = None;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
	Starting,
	Running,
	Stopped,
}

/// Why a watch loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
	Cancelled,
	EventStreamClosed,
	ErrorStreamClosed,
	SubscribeFailed,
}

/// Watches one directory and hands each new file to a [`FileProcessor`]
pub struct FolderWatcher<S = NotifySource> {
	config: WatcherConfig,
	processor: FileProcessor,
	source: S,
	state: WatchState,
}

impl FolderWatcher<NotifySource> {
	pub fn new(config: WatcherConfig, processor: FileProcessor) -> Self {
		Self::with_source(config, processor, NotifySource::default())
	}
}

impl<S: NotificationSource> FolderWatcher<S> {
	pub fn with_source(config: WatcherConfig, processor: FileProcessor, source: S) -> Self {
		Self { config, processor, source, state: WatchState::Starting }
	}

	pub fn state(&self) -> WatchState {
		self.state
	}

	fn transition(&mut self, next: WatchState) {
		debug!("Watch loop {:?} -> {:?}", self.state, next);
		self.state = next;
	}

	/// Run until `cancel` fires or either notification stream closes.
	///
	/// Subscription failures are logged and reported as
	/// [`WatchExit::SubscribeFailed`]. Cancellation is observed between events,
	/// so an in-flight settle delay and move always complete first.
	pub async fn run(
		&mut self, cancel: CancellationToken, processed: Option<mpsc::Sender<ProcessOutcome>>,
	) -> WatchExit {
		self.transition(WatchState::Starting);
		let path = self.config.path.clone();

		let mut subscription = match self.source.subscribe(&path) {
			Ok(subscription) => subscription,
			Err(e) => {
				error!("Failed to watch {}: {}", path.display(), e);
				self.transition(WatchState::Stopped);
				return WatchExit::SubscribeFailed;
			}
		};

		self.transition(WatchState::Running);
		info!("Watching {} for new screenshots...", path.display());

		let mut dedup = DedupTable::new(
			self.config.dedup_window,
			self.config.cleanup_interval,
			Instant::now(),
		);

		let exit = loop {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => break WatchExit::Cancelled,
				event = subscription.events.recv() => match event {
					Some(event) => self.handle_event(event, &mut dedup, processed.as_ref()).await,
					None => break WatchExit::EventStreamClosed,
				},
				err = subscription.errors.recv() => match err {
					Some(e) => warn!("Watcher error: {}", e),
					None => break WatchExit::ErrorStreamClosed,
				},
			}
		};

		drop(subscription);
		self.transition(WatchState::Stopped);
		info!("Stopped watching {} ({:?})", path.display(), exit);
		exit
	}

	async fn handle_event(
		&self, event: ChangeEvent, dedup: &mut DedupTable,
		processed: Option<&mpsc::Sender<ProcessOutcome>>,
	) {
		if !event.is_create() {
			debug!("Ignoring {:?} event for {}", event.event_type, event.path.display());
			return;
		}
		if let Ok(json) = event.to_json() {
			debug!("Event JSON: {}", json);
		}

		let now = Instant::now();
		dedup.maybe_cleanup(now);

		let Some(filename) = event.file_name() else {
			return;
		};
		if !dedup.check_and_record(&filename, now) {
			debug!("Skipping duplicate create event for {}", filename);
			return;
		}

		// give the writer a moment to finish flushing
		tokio::time::sleep(self.config.settle_delay).await;

		let outcome = self.processor.process(&filename);

		if let Some(tx) = processed {
			if let Err(e) = tx.try_send(outcome) {
				debug!("Dropped completion signal for {}: {}", filename, e);
			}
		}
	}

	/// Spawn the loop on the runtime and return a handle that can stop it
	pub fn spawn(self, processed: Option<mpsc::Sender<ProcessOutcome>>) -> WatcherHandle {
		let cancel = CancellationToken::new();
		let token = cancel.clone();
		let mut watcher = self;
		let task = tokio::spawn(async move { watcher.run(token, processed).await });
		WatcherHandle { cancel, task }
	}
}

/// Handle to a spawned watch loop
#[derive(Debug)]
pub struct WatcherHandle {
	cancel: CancellationToken,
	task: JoinHandle<WatchExit>,
}

impl WatcherHandle {
	/// Cancel the loop and wait for it to release its subscription
	pub async fn stop(self) -> Result<WatchExit> {
		self.cancel.cancel();
		Ok(self.task.await?)
	}

	/// Wait for the loop to end on its own
	pub async fn join(self) -> Result<WatchExit> {
		Ok(self.task.await?)
	}
}

/// Validate `config`, then start watching with the platform notification source.
///
/// The returned receiver yields one [`ProcessOutcome`] per accepted creation
/// event; it may be dropped or left undrained.
pub fn start(
	config: WatcherConfig, processor: FileProcessor,
) -> Result<(WatcherHandle, mpsc::Receiver<ProcessOutcome>)> {
	config.validate()?;
	if !config.path.is_dir() {
		return Err(WatcherError::invalid_path(&config.path, "not an existing directory"));
	}

	let (tx, rx) = mpsc::channel(COMPLETION_CHANNEL_CAPACITY);
	let handle = FolderWatcher::new(config, processor).spawn(Some(tx));
	Ok((handle, rx))
}
