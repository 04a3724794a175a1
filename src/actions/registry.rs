use std::collections::HashMap;
use std::sync::Arc;

use super::ActionExecutor;
use crate::config::ActionKind;

/// Registry of action executors by kind.
pub struct ActionRegistry {
    executors: HashMap<ActionKind, Arc<dyn ActionExecutor>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        ActionRegistry {
            executors: HashMap::new(),
        }
    }

    pub fn register(&mut self, executor: Arc<dyn ActionExecutor>) {
        self.executors.insert(executor.kind(), executor);
    }

    pub fn get(&self, kind: ActionKind) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.get(&kind).cloned()
    }

    pub fn registered_kinds(&self) -> Vec<ActionKind> {
        self.executors.keys().copied().collect()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with every built-in executor registered.
pub fn create_default_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();

    // Selections
    registry.register(Arc::new(super::selection::ApplyBookmarkExecutor));
    registry.register(Arc::new(super::selection::ApplySelectionExecutor));
    registry.register(Arc::new(super::selection::ClearSelectionExecutor));
    registry.register(Arc::new(super::selection::BackOrForwardExecutor));
    registry.register(Arc::new(super::selection::LockFieldExecutor));
    registry.register(Arc::new(super::selection::SelectVerbExecutor::all()));
    registry.register(Arc::new(super::selection::SelectVerbExecutor::possible()));
    registry.register(Arc::new(super::selection::SelectVerbExecutor::alternative()));
    registry.register(Arc::new(super::selection::SelectVerbExecutor::excluded()));
    registry.register(Arc::new(super::adjacent::SelectAdjacentExecutor));
    registry.register(Arc::new(super::pareto::SelectParetoExecutor));

    // Variables
    registry.register(Arc::new(super::variable::SetVariableExecutor));

    // App
    registry.register(Arc::new(super::reload::StartReloadExecutor));
    registry.register(Arc::new(super::task::StartReloadTaskExecutor));
    registry.register(Arc::new(super::rest_call::CallRestApiExecutor));

    // Other
    registry.register(Arc::new(super::control::ApplyThemeExecutor));
    registry.register(Arc::new(super::control::DelayExecutionExecutor));
    registry.register(Arc::new(super::control::ContinueOrTerminateExecutor));
    registry.register(Arc::new(super::control::LogToConsoleExecutor));
    registry.register(Arc::new(super::control::RequestConfirmationExecutor));

    registry
}
