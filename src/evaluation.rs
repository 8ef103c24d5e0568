use crate::state::{
    Address,
    Agent,
    Avatar,
    Currency,
    GameConfigState,
    GoldBalance,
    WeeklyArenaState,
};
use std::collections::{
    HashMap,
    HashSet,
};

/// Read-only view over the outcome of evaluating one state-changing action.
///
/// Produced externally by the evaluation oracle; this crate only queries it.
/// Missing entities are reported as `None` rather than errors; an entity the
/// action did not touch is simply absent from the evaluation.
pub trait ActionEvaluation {
    /// Label of the evaluated action, used for logging only.
    fn action_label(&self) -> &str;

    /// The acting principal that signed the evaluated action.
    fn signer(&self) -> Address;

    /// Block height at which the evaluation was produced.
    fn block_height(&self) -> u64;

    /// Whether `address` is in the evaluation's updated-address set.
    fn updates_address(&self, address: &Address) -> bool;

    /// Whether `address` keys the evaluation's updated-fungible-assets mapping.
    fn updates_assets_of(&self, address: &Address) -> bool;

    fn agent(&self, address: &Address) -> Option<Agent>;

    fn avatar(&self, agent_address: &Address, avatar_address: &Address) -> Option<Avatar>;

    /// Balance absence after an update is an expected transient state, so the
    /// missing case is an `Option`, not an error.
    fn gold_balance(&self, address: &Address, currency: &Currency) -> Option<GoldBalance>;

    /// Well-formed arena addresses always resolve.
    fn weekly_arena(&self, address: &Address) -> WeeklyArenaState;

    fn game_config(&self) -> GameConfigState;
}

/// In-memory [`ActionEvaluation`] backed by plain lookup tables.
///
/// Used by the demo binary and tests; a production oracle would implement the
/// trait over its own result representation.
#[derive(Clone, Debug)]
pub struct TableEvaluation {
    action_label: String,
    signer: Address,
    block_height: u64,
    updated_addresses: HashSet<Address>,
    updated_assets: HashMap<Address, Vec<GoldBalance>>,
    agents: HashMap<Address, Agent>,
    avatars: HashMap<Address, Avatar>,
    arenas: HashMap<Address, WeeklyArenaState>,
    game_config: GameConfigState,
}

impl TableEvaluation {
    pub fn new(action_label: impl Into<String>, signer: Address, block_height: u64) -> Self {
        Self {
            action_label: action_label.into(),
            signer,
            block_height,
            updated_addresses: HashSet::new(),
            updated_assets: HashMap::new(),
            agents: HashMap::new(),
            avatars: HashMap::new(),
            arenas: HashMap::new(),
            game_config: GameConfigState::default(),
        }
    }

    /// Record an updated agent; its address joins the updated-address set.
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.updated_addresses.insert(agent.address);
        self.agents.insert(agent.address, agent);
        self
    }

    /// Record an updated avatar; its address joins the updated-address set.
    pub fn with_avatar(mut self, avatar: Avatar) -> Self {
        self.updated_addresses.insert(avatar.address);
        self.avatars.insert(avatar.address, avatar);
        self
    }

    /// Record an updated fungible-asset balance for its holder.
    pub fn with_gold_balance(mut self, balance: GoldBalance) -> Self {
        self.updated_addresses.insert(balance.address);
        self.updated_assets
            .entry(balance.address)
            .or_default()
            .push(balance);
        self
    }

    /// Mark an address as touched without attaching a value (e.g. a debited
    /// counterparty).
    pub fn with_updated_address(mut self, address: Address) -> Self {
        self.updated_addresses.insert(address);
        self
    }

    pub fn with_arena(mut self, arena: WeeklyArenaState) -> Self {
        self.arenas.insert(arena.address, arena);
        self
    }

    pub fn with_game_config(mut self, config: GameConfigState) -> Self {
        self.game_config = config;
        self
    }
}

impl ActionEvaluation for TableEvaluation {
    fn action_label(&self) -> &str {
        &self.action_label
    }

    fn signer(&self) -> Address {
        self.signer
    }

    fn block_height(&self) -> u64 {
        self.block_height
    }

    fn updates_address(&self, address: &Address) -> bool {
        self.updated_addresses.contains(address)
    }

    fn updates_assets_of(&self, address: &Address) -> bool {
        self.updated_assets.contains_key(address)
    }

    fn agent(&self, address: &Address) -> Option<Agent> {
        self.agents.get(address).cloned()
    }

    fn avatar(&self, _agent_address: &Address, avatar_address: &Address) -> Option<Avatar> {
        self.avatars.get(avatar_address).cloned()
    }

    fn gold_balance(&self, address: &Address, currency: &Currency) -> Option<GoldBalance> {
        self.updated_assets
            .get(address)?
            .iter()
            .find(|balance| balance.currency == *currency)
            .cloned()
    }

    fn weekly_arena(&self, address: &Address) -> WeeklyArenaState {
        self.arenas.get(address).cloned().unwrap_or(WeeklyArenaState {
            address: *address,
            index: 0,
            rankings: Vec::new(),
        })
    }

    fn game_config(&self) -> GameConfigState {
        self.game_config.clone()
    }
}
