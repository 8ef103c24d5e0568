use crate::{
    cache::StateCache,
    state::{
        Agent,
        Avatar,
        GameConfigState,
        GoldBalance,
        WeeklyArenaState,
    },
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use std::path::Path;
use tracing::warn;

const AGENT_KEY: &[u8] = b"agent";
const CURRENT_SLOT_KEY: &[u8] = b"current_slot";
const GOLD_BALANCE_KEY: &[u8] = b"gold_balance";
const WEEKLY_ARENA_KEY: &[u8] = b"weekly_arena";
const GAME_CONFIG_KEY: &[u8] = b"game_config";

/// [`StateCache`] persisted with sled, so a restarted client resumes from its
/// last synced view instead of an empty one.
///
/// Records are stored as JSON. Writes flush before returning; reads that hit
/// a corrupt or unreadable record log a warning and report the entry as
/// absent, and the next sync overwrites it.
pub struct SledStateCache {
    db: sled::Db,
    avatars: sled::Tree,
    singletons: sled::Tree,
}

impl SledStateCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path.as_ref())
            .wrap_err_with(|| format!("failed to open state cache at {:?}", path.as_ref()))?;
        let avatars = db
            .open_tree("avatars")
            .wrap_err("failed to open avatars tree")?;
        let singletons = db
            .open_tree("singletons")
            .wrap_err("failed to open singletons tree")?;
        Ok(Self {
            db,
            avatars,
            singletons,
        })
    }

    fn read<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> Option<T> {
        let bytes = match tree.get(key) {
            Ok(found) => found?,
            Err(error) => {
                warn!(key = %String::from_utf8_lossy(key), %error, "state cache read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %String::from_utf8_lossy(key), %error, "state cache record corrupt");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, tree: &sled::Tree, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).wrap_err("failed to serialize cache record")?;
        tree.insert(key, bytes).wrap_err("failed to write cache record")?;
        self.db.flush().wrap_err("failed to flush state cache")?;
        Ok(())
    }

    fn remove(&self, tree: &sled::Tree, key: &[u8]) -> Result<()> {
        tree.remove(key).wrap_err("failed to remove cache record")?;
        self.db.flush().wrap_err("failed to flush state cache")?;
        Ok(())
    }
}

impl StateCache for SledStateCache {
    fn current_agent(&self) -> Option<Agent> {
        Self::read(&self.singletons, AGENT_KEY)
    }

    fn avatar(&self, slot: usize) -> Option<Avatar> {
        Self::read(&self.avatars, &(slot as u64).to_be_bytes())
    }

    fn current_avatar_slot(&self) -> Option<usize> {
        Self::read(&self.singletons, CURRENT_SLOT_KEY)
    }

    fn gold_balance(&self) -> Option<GoldBalance> {
        Self::read(&self.singletons, GOLD_BALANCE_KEY)
    }

    fn weekly_arena(&self) -> Option<WeeklyArenaState> {
        Self::read(&self.singletons, WEEKLY_ARENA_KEY)
    }

    fn game_config(&self) -> Option<GameConfigState> {
        Self::read(&self.singletons, GAME_CONFIG_KEY)
    }

    async fn set_agent(&mut self, agent: Agent) -> Result<()> {
        self.write(&self.singletons, AGENT_KEY, &agent)
    }

    async fn set_avatar(&mut self, slot: usize, avatar: Avatar) -> Result<()> {
        self.write(&self.avatars, &(slot as u64).to_be_bytes(), &avatar)
    }

    fn remove_avatar(&mut self, slot: usize) -> Result<()> {
        self.remove(&self.avatars, &(slot as u64).to_be_bytes())?;
        if self.current_avatar_slot() == Some(slot) {
            self.remove(&self.singletons, CURRENT_SLOT_KEY)?;
        }
        Ok(())
    }

    fn set_current_avatar_slot(&mut self, slot: Option<usize>) -> Result<()> {
        match slot {
            Some(slot) => self.write(&self.singletons, CURRENT_SLOT_KEY, &slot),
            None => self.remove(&self.singletons, CURRENT_SLOT_KEY),
        }
    }

    fn set_gold_balance(&mut self, balance: Option<GoldBalance>) -> Result<()> {
        match balance {
            Some(balance) => self.write(&self.singletons, GOLD_BALANCE_KEY, &balance),
            None => self.remove(&self.singletons, GOLD_BALANCE_KEY),
        }
    }

    fn set_weekly_arena(&mut self, arena: WeeklyArenaState) -> Result<()> {
        self.write(&self.singletons, WEEKLY_ARENA_KEY, &arena)
    }

    fn set_game_config(&mut self, config: GameConfigState) -> Result<()> {
        self.write(&self.singletons, GAME_CONFIG_KEY, &config)
    }
}
