use crate::state::{
    Agent,
    Avatar,
    GameConfigState,
    GoldBalance,
    WeeklyArenaState,
};
use color_eyre::eyre::Result;
use std::{
    collections::BTreeMap,
    future::Future,
    sync::{
        Arc,
        Mutex,
    },
};

/// Local view of the current principal's world state.
///
/// Owned by the surrounding application and passed by reference into every
/// reconciler call; mutated only through this interface. Agent and avatar
/// writes are suspending because the commit may be durable (see
/// [`SledStateCache`](crate::sled_cache::SledStateCache)); callers must await
/// completion before applying the next evaluation so each field stays
/// last-write-wins.
pub trait StateCache {
    fn current_agent(&self) -> Option<Agent>;

    fn avatar(&self, slot: usize) -> Option<Avatar>;

    fn current_avatar_slot(&self) -> Option<usize>;

    fn current_avatar(&self) -> Option<Avatar> {
        self.current_avatar_slot().and_then(|slot| self.avatar(slot))
    }

    fn gold_balance(&self) -> Option<GoldBalance>;

    fn weekly_arena(&self) -> Option<WeeklyArenaState>;

    fn game_config(&self) -> Option<GameConfigState>;

    fn set_agent(&mut self, agent: Agent) -> impl Future<Output = Result<()>>;

    fn set_avatar(&mut self, slot: usize, avatar: Avatar) -> impl Future<Output = Result<()>>;

    fn remove_avatar(&mut self, slot: usize) -> Result<()>;

    fn set_current_avatar_slot(&mut self, slot: Option<usize>) -> Result<()>;

    fn set_gold_balance(&mut self, balance: Option<GoldBalance>) -> Result<()>;

    fn set_weekly_arena(&mut self, arena: WeeklyArenaState) -> Result<()>;

    fn set_game_config(&mut self, config: GameConfigState) -> Result<()>;
}

#[derive(Debug, Default)]
struct CacheInner {
    agent: Option<Agent>,
    avatars: BTreeMap<usize, Avatar>,
    current_slot: Option<usize>,
    gold_balance: Option<GoldBalance>,
    weekly_arena: Option<WeeklyArenaState>,
    game_config: Option<GameConfigState>,
}

/// Process-local [`StateCache`] with cloneable handles, so tests and UI code
/// can observe writes made through a handle held elsewhere.
#[derive(Clone, Default)]
pub struct MemoryStateCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl MemoryStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(agent: Agent) -> Self {
        let cache = Self::new();
        cache.inner.lock().unwrap().agent = Some(agent);
        cache
    }

    pub fn select_avatar(&self, slot: usize, avatar: Avatar) {
        let mut inner = self.inner.lock().unwrap();
        inner.avatars.insert(slot, avatar);
        inner.current_slot = Some(slot);
    }
}

impl StateCache for MemoryStateCache {
    fn current_agent(&self) -> Option<Agent> {
        self.inner.lock().unwrap().agent.clone()
    }

    fn avatar(&self, slot: usize) -> Option<Avatar> {
        self.inner.lock().unwrap().avatars.get(&slot).cloned()
    }

    fn current_avatar_slot(&self) -> Option<usize> {
        self.inner.lock().unwrap().current_slot
    }

    fn gold_balance(&self) -> Option<GoldBalance> {
        self.inner.lock().unwrap().gold_balance.clone()
    }

    fn weekly_arena(&self) -> Option<WeeklyArenaState> {
        self.inner.lock().unwrap().weekly_arena.clone()
    }

    fn game_config(&self) -> Option<GameConfigState> {
        self.inner.lock().unwrap().game_config.clone()
    }

    async fn set_agent(&mut self, agent: Agent) -> Result<()> {
        self.inner.lock().unwrap().agent = Some(agent);
        Ok(())
    }

    async fn set_avatar(&mut self, slot: usize, avatar: Avatar) -> Result<()> {
        self.inner.lock().unwrap().avatars.insert(slot, avatar);
        Ok(())
    }

    fn remove_avatar(&mut self, slot: usize) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.avatars.remove(&slot);
        if inner.current_slot == Some(slot) {
            inner.current_slot = None;
        }
        Ok(())
    }

    fn set_current_avatar_slot(&mut self, slot: Option<usize>) -> Result<()> {
        self.inner.lock().unwrap().current_slot = slot;
        Ok(())
    }

    fn set_gold_balance(&mut self, balance: Option<GoldBalance>) -> Result<()> {
        self.inner.lock().unwrap().gold_balance = balance;
        Ok(())
    }

    fn set_weekly_arena(&mut self, arena: WeeklyArenaState) -> Result<()> {
        self.inner.lock().unwrap().weekly_arena = Some(arena);
        Ok(())
    }

    fn set_game_config(&mut self, config: GameConfigState) -> Result<()> {
        self.inner.lock().unwrap().game_config = Some(config);
        Ok(())
    }
}
