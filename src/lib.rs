pub mod state;

pub mod evaluation;

pub mod cache;

pub mod sled_cache;

pub mod notify;

pub mod reconciler;

pub mod handler;

pub mod gate;

pub use cache::{
    MemoryStateCache,
    StateCache,
};
pub use evaluation::{
    ActionEvaluation,
    TableEvaluation,
};
pub use gate::{
    GateState,
    SubmitGate,
};
pub use handler::{
    ChannelEvaluationSource,
    EvaluationSource,
    SyncHandler,
};
pub use notify::{
    Localizer,
    NotificationCategory,
    NotificationSink,
    QueueNotificationSink,
    StaticLocalizer,
    TracingNotificationSink,
};
pub use reconciler::StateSyncReconciler;
pub use sled_cache::SledStateCache;
pub use state::{
    Address,
    Agent,
    Avatar,
    Currency,
    GameConfigState,
    GoldBalance,
    Quest,
    QuestList,
    WeeklyArenaState,
    derive_arena_address,
};
