use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Tunable engine constants.
///
/// The settle delays compensate for eventual consistency in the wrapped
/// engine: a field handle can be returned before the session has confirmed
/// its validity, and a variable write can take a moment to propagate. Their
/// correct values depend on the backing engine, so they are configuration
/// rather than constants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wait before evaluating field existence.
    pub field_settle_delay: Duration,
    /// Wait after REST-driven variable writes before the next step reads them.
    pub variable_settle_delay: Duration,
    /// Cadence of elapsed-time updates and status polls in progress dialogs.
    pub progress_tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field_settle_delay: Duration::from_millis(120),
            variable_settle_delay: Duration::from_millis(100),
            progress_tick: Duration::from_secs(1),
        }
    }
}

/// Runtime context providing time and ID generation.
#[derive(Clone)]
pub struct RuntimeContext {
    pub time_provider: Arc<dyn TimeProvider>,
    pub id_generator: Arc<dyn IdGenerator>,
    pub config: EngineConfig,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            time_provider: Arc::new(RealTimeProvider::default()),
            id_generator: Arc::new(RealIdGenerator),
            config: EngineConfig::default(),
        }
    }
}

impl RuntimeContext {
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Per-invocation context of a chain run.
///
/// `no_selections` suppresses selection-mutating actions; `no_interaction`
/// suppresses the whole chain and navigation. `alternate_state` is the
/// hosting object's selection state, used when an action does not name one.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub no_selections: bool,
    pub no_interaction: bool,
    pub alternate_state: Option<String>,
}

impl RunContext {
    /// The selection state an action applies to: its own `state` when set,
    /// otherwise the context's inherited state, otherwise the default state.
    pub fn state_for(&self, item_state: &str) -> String {
        if !item_state.is_empty() {
            item_state.to_string()
        } else {
            self.alternate_state.clone().unwrap_or_else(|| "$".to_string())
        }
    }
}

pub trait TimeProvider: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

// --- Real implementations ---

pub struct RealTimeProvider {
    #[allow(dead_code)]
    start: Instant,
}

impl RealTimeProvider {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for RealTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for RealTimeProvider {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

pub struct RealIdGenerator;

impl IdGenerator for RealIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

// --- Fake implementations ---

pub struct FakeTimeProvider {
    pub fixed_millis: i64,
}

impl FakeTimeProvider {
    pub fn new(fixed_millis: i64) -> Self {
        Self { fixed_millis }
    }
}

impl TimeProvider for FakeTimeProvider {
    fn now_millis(&self) -> i64 {
        self.fixed_millis
    }
}

pub struct FakeIdGenerator {
    pub prefix: String,
    pub counter: AtomicU64,
}

impl FakeIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for FakeIdGenerator {
    fn next_id(&self) -> String {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, id)
    }
}

/// Format the time elapsed between two millisecond timestamps as `HH:MM:SS`.
pub fn format_elapsed(started_millis: i64, now_millis: i64) -> String {
    let diff_secs = (now_millis - started_millis).max(0) as u64 / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        diff_secs / 3600,
        diff_secs % 3600 / 60,
        diff_secs % 60
    )
}
