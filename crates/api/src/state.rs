use crate::config::ApiConfig;
use alloc_greedy::GreedyAllocator;
use alloc_milp::MilpAllocator;
use sched_core::Allocator;
use std::sync::Arc;
use store::TimetableStore;
use types::AllocatorKind;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TimetableStore>,
    pub allocators: Dispatch,
    pub config: Arc<ApiConfig>,
}

/// One shared instance per allocator kind.
#[derive(Clone)]
pub struct Dispatch {
    greedy: Arc<dyn Allocator>,
    milp: Arc<dyn Allocator>,
}

impl Dispatch {
    pub fn new() -> Self {
        Self::from_parts(Arc::new(GreedyAllocator::new()), Arc::new(MilpAllocator::new()))
    }

    pub fn from_parts(greedy: Arc<dyn Allocator>, milp: Arc<dyn Allocator>) -> Self {
        Self { greedy, milp }
    }

    pub fn pick(&self, kind: AllocatorKind) -> Arc<dyn Allocator> {
        match kind {
            AllocatorKind::Greedy => self.greedy.clone(),
            AllocatorKind::Milp => self.milp.clone(),
        }
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            store: Arc::new(TimetableStore::new()),
            allocators: Dispatch::new(),
            config: Arc::new(config),
        }
    }

    pub fn new_default() -> Self {
        Self::new(ApiConfig::default())
    }
}
