use serde::{
    Deserialize,
    Serialize,
};
use sha2::{
    Digest,
    Sha256,
};
use std::{
    collections::BTreeMap,
    fmt,
};

/// 32-byte account/state identifier, rendered as hex.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..4]))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub ticker: String,
    pub decimals: u8,
}

impl Currency {
    pub fn new(ticker: impl Into<String>, decimals: u8) -> Self {
        Self {
            ticker: ticker.into(),
            decimals,
        }
    }

    pub fn gold() -> Self {
        Self::new("GOLD", 2)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldBalance {
    pub address: Address,
    pub currency: Currency,
    pub quantity: u64,
}

/// Top-level account entity. Owns zero or more avatars via a slot mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub address: Address,
    pub avatar_addresses: BTreeMap<usize, Address>,
}

impl Agent {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            avatar_addresses: BTreeMap::new(),
        }
    }

    pub fn with_avatar(mut self, slot: usize, avatar_address: Address) -> Self {
        self.avatar_addresses.insert(slot, avatar_address);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub content: String,
    pub completed: bool,
    /// Whether the completion reward has already been handed out to the user.
    pub rewarded: bool,
}

impl Quest {
    pub fn new(id: u32, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            completed: false,
            rewarded: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn rewarded(mut self) -> Self {
        self.rewarded = true;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestList {
    quests: Vec<Quest>,
}

impl QuestList {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    pub fn push(&mut self, quest: Quest) {
        self.quests.push(quest);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    /// Quests finished by gameplay but not yet acknowledged/rewarded, in list order.
    pub fn unpaid_complete(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(|q| q.completed && !q.rewarded)
    }
}

/// In-game character entity owned by an agent slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub address: Address,
    pub name: String,
    pub level: u32,
    pub quest_list: QuestList,
}

impl Avatar {
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            level: 1,
            quest_list: QuestList::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaRanking {
    pub avatar_address: Address,
    pub score: u32,
}

/// Periodically-rotating competitive ranking snapshot, addressed by a derived
/// key based on the interval index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyArenaState {
    pub address: Address,
    pub index: u64,
    pub rankings: Vec<ArenaRanking>,
}

impl WeeklyArenaState {
    pub fn new(index: u64) -> Self {
        Self {
            address: derive_arena_address(index),
            index,
            rankings: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfigState {
    pub weekly_arena_interval: u64,
    pub daily_reward_interval: u64,
    pub hourglass_per_block: u64,
    pub action_point_max: u64,
}

impl Default for GameConfigState {
    fn default() -> Self {
        Self {
            weekly_arena_interval: 100,
            daily_reward_interval: 1700,
            hourglass_per_block: 3,
            action_point_max: 120,
        }
    }
}

/// Deterministically derive the storage address for the weekly arena at `index`.
pub fn derive_arena_address(index: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"weekly_arena");
    hasher.update(index.to_be_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Address::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_arena_address__same_index__same_address() {
        assert_eq!(derive_arena_address(15), derive_arena_address(15));
        assert_ne!(derive_arena_address(15), derive_arena_address(16));
    }

    #[test]
    fn unpaid_complete__skips_rewarded_and_incomplete() {
        let quests = QuestList::new(vec![
            Quest::new(1, "collect wood").completed(),
            Quest::new(2, "hunt boars").completed().rewarded(),
            Quest::new(3, "reach level 5"),
        ]);

        let unpaid: Vec<u32> = quests.unpaid_complete().map(|q| q.id).collect();
        assert_eq!(unpaid, vec![1]);
    }
}
