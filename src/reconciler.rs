use crate::{
    cache::StateCache,
    evaluation::ActionEvaluation,
    notify::{
        Localizer,
        MULTIPLE_QUEST_COMPLETE_KEY,
        NotificationCategory,
        NotificationSink,
        QUEST_COMPLETE_KEY,
    },
    state::{
        Avatar,
        Currency,
        Quest,
        derive_arena_address,
    },
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use tracing::debug;


/// Pulls updated sub-states out of an [`ActionEvaluation`] into a
/// [`StateCache`].
///
/// While `pending` is set (e.g. during a live battle simulation), writes to
/// the currently-selected avatar are staged instead of committed; the caller
/// later resolves the staged value with [`commit_staged`](Self::commit_staged)
/// or [`discard_staged`](Self::discard_staged). All other cache fields are
/// never deferred.
pub struct StateSyncReconciler<N, L> {
    gold_currency: Currency,
    pending: bool,
    staged: Option<Avatar>,
    notifications: N,
    localizer: L,
}

impl<N, L> StateSyncReconciler<N, L>
where
    N: NotificationSink,
    L: Localizer,
{
    pub fn new(gold_currency: Currency, notifications: N, localizer: L) -> Self {
        Self {
            gold_currency,
            pending: false,
            staged: None,
            notifications,
            localizer,
        }
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Avatar held back while `pending`, awaiting commit or discard.
    pub fn staged_avatar(&self) -> Option<&Avatar> {
        self.staged.as_ref()
    }

    /// True iff a current agent is cached and its address keys the
    /// evaluation's updated-fungible-assets mapping.
    pub fn has_updated_assets_for<E, C>(&self, evaluation: &E, cache: &C) -> bool
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        match cache.current_agent() {
            Some(agent) => evaluation.updates_assets_of(&agent.address),
            None => false,
        }
    }

    /// True iff a current avatar is cached and its address is a member of the
    /// evaluation's updated-address set.
    pub fn affects_current_avatar<E, C>(&self, evaluation: &E, cache: &C) -> bool
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        match cache.current_avatar() {
            Some(avatar) => evaluation.updates_address(&avatar.address),
            None => false,
        }
    }

    /// True iff a current agent is cached and the evaluation was signed by it.
    pub fn affects_current_agent<E, C>(&self, evaluation: &E, cache: &C) -> bool
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        match cache.current_agent() {
            Some(agent) => evaluation.signer() == agent.address,
            None => false,
        }
    }

    /// Refresh the cached agent and its gold balance from the evaluation.
    ///
    /// A balance the evaluation cannot resolve is written as absent; balance
    /// absence right after an update is expected, not an error.
    pub async fn sync_agent<E, C>(&self, evaluation: &E, cache: &mut C) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        let Some(current) = cache.current_agent() else {
            return Ok(());
        };
        if let Some(agent) = evaluation.agent(&current.address) {
            debug!(action = evaluation.action_label(), "syncing agent state");
            cache.set_agent(agent).await?;
        }
        let balance = evaluation.gold_balance(&current.address, &self.gold_currency);
        cache.set_gold_balance(balance)?;
        Ok(())
    }

    /// Refresh the avatar stored at `slot`.
    ///
    /// Slot validity is judged against the locally cached agent, not the
    /// evaluation: if the cached agent no longer lists `slot`, the stale
    /// avatar is evicted and the oracle is not queried. An avatar the
    /// evaluation did not touch leaves prior cache state intact.
    pub async fn sync_avatar_by_slot<E, C>(
        &mut self,
        evaluation: &E,
        slot: usize,
        cache: &mut C,
    ) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        let Some(agent) = cache.current_agent() else {
            return Ok(());
        };
        debug!(action = evaluation.action_label(), slot, "syncing avatar state");
        let Some(avatar_address) = agent.avatar_addresses.get(&slot).copied() else {
            cache.remove_avatar(slot)?;
            return Ok(());
        };
        if let Some(avatar) = evaluation.avatar(&agent.address, &avatar_address) {
            self.write_avatar(avatar, slot, cache, false).await?;
        }
        Ok(())
    }

    /// Refresh the currently-selected avatar, honoring `pending` deferral.
    pub async fn sync_current_avatar<E, C>(&mut self, evaluation: &E, cache: &mut C) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        let (Some(agent), Some(current), Some(slot)) = (
            cache.current_agent(),
            cache.current_avatar(),
            cache.current_avatar_slot(),
        ) else {
            return Ok(());
        };
        if let Some(avatar) = evaluation.avatar(&agent.address, &current.address) {
            self.write_avatar(avatar, slot, cache, true).await?;
        }
        Ok(())
    }

    /// Fetch and write the arena snapshot for the interval containing the
    /// evaluation's block height.
    pub fn sync_weekly_arena<E, C>(&self, evaluation: &E, cache: &mut C, interval: u64) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        if interval == 0 {
            return Err(eyre!("weekly arena interval must be non-zero"));
        }
        let arena_index = evaluation.block_height() / interval;
        let arena = evaluation.weekly_arena(&derive_arena_address(arena_index));
        cache.set_weekly_arena(arena)
    }

    pub fn sync_game_config<E, C>(&self, evaluation: &E, cache: &mut C) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        cache.set_game_config(evaluation.game_config())
    }

    /// Commit a staged avatar into the cache at the current slot, running the
    /// usual quest-notification pass. No-op when nothing is staged; if no slot
    /// is selected anymore the staged value is dropped.
    pub async fn commit_staged<C>(&mut self, cache: &mut C) -> Result<()>
    where
        C: StateCache,
    {
        let Some(avatar) = self.staged.take() else {
            return Ok(());
        };
        let Some(slot) = cache.current_avatar_slot() else {
            debug!("no avatar slot selected; dropping staged avatar");
            return Ok(());
        };
        self.write_avatar(avatar, slot, cache, false).await
    }

    pub fn discard_staged(&mut self) -> Option<Avatar> {
        self.staged.take()
    }

    /// Shared avatar-write path. Only the current-avatar route defers on
    /// `pending` (`defer_on_pending`); slot-indexed sync always commits.
    async fn write_avatar<C>(
        &mut self,
        avatar: Avatar,
        slot: usize,
        cache: &mut C,
        defer_on_pending: bool,
    ) -> Result<()>
    where
        C: StateCache,
    {
        if defer_on_pending {
            if self.pending {
                debug!(slot, "pending operation in progress; staging avatar");
                self.staged = Some(avatar);
                return Ok(());
            }
            // Only this route owns the scratch slot; slot-indexed writes
            // leave a staged current avatar alone.
            self.staged = None;
        }
        if let Some(message) = self.quest_notification(&avatar) {
            self.notifications.push(NotificationCategory::System, message);
        }
        cache.set_avatar(slot, avatar).await
    }

    fn quest_notification(&self, avatar: &Avatar) -> Option<String> {
        let unpaid: Vec<&Quest> = avatar.quest_list.unpaid_complete().collect();
        match unpaid.as_slice() {
            [] => None,
            [quest] => Some(
                self.localizer
                    .localize(QUEST_COMPLETE_KEY, &[quest.content.as_str()]),
            ),
            many => {
                let count = many.len().to_string();
                Some(
                    self.localizer
                        .localize(MULTIPLE_QUEST_COMPLETE_KEY, &[count.as_str()]),
                )
            }
        }
    }
}
