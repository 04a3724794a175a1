pub mod chain;
pub mod context;
pub mod dialog;
pub mod http;
pub mod navigation;
pub mod resolver;

pub use chain::{ActionSource, ChainOutcome, ChainRunner, ChainState, ConfirmationGuard};
pub use context::{
    format_elapsed, EngineConfig, FakeIdGenerator, FakeTimeProvider, IdGenerator, RealIdGenerator,
    RealTimeProvider, RunContext, RuntimeContext, TimeProvider,
};
pub use dialog::{DialogOptions, DialogService, DialogUpdate, ProgressDialog};
pub use http::{HttpClientProvider, HttpPoolConfig, PlatformRestClient};
pub use navigation::NavigationDispatcher;
pub use resolver::FieldResolver;
