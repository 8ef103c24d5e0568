use crate::{
    cache::StateCache,
    evaluation::ActionEvaluation,
    notify::{
        Localizer,
        NotificationSink,
    },
    reconciler::StateSyncReconciler,
};
use color_eyre::eyre::Result;
use std::future::Future;
use tokio::sync::mpsc::Receiver;
use tracing::{
    debug,
    error,
    info,
};

/// Feed of action evaluations, ordered by the producer. Yields `None` once
/// drained.
pub trait EvaluationSource {
    type Evaluation: ActionEvaluation;

    fn next_evaluation(&mut self) -> impl Future<Output = Result<Option<Self::Evaluation>>>;
}

/// [`EvaluationSource`] over a tokio channel, for wiring a producer task to
/// the sync loop.
pub struct ChannelEvaluationSource<E> {
    receiver: Receiver<E>,
}

impl<E> ChannelEvaluationSource<E> {
    pub fn new(receiver: Receiver<E>) -> Self {
        Self { receiver }
    }
}

impl<E> EvaluationSource for ChannelEvaluationSource<E>
where
    E: ActionEvaluation,
{
    async fn next_evaluation(&mut self) -> Result<Option<E>> {
        Ok(self.receiver.recv().await)
    }

    type Evaluation = E;
}

/// Applies each incoming evaluation to the cache through a
/// [`StateSyncReconciler`], routing by which cached entities the evaluation
/// touches.
pub struct SyncHandler<N, L> {
    reconciler: StateSyncReconciler<N, L>,
}

impl<N, L> SyncHandler<N, L>
where
    N: NotificationSink,
    L: Localizer,
{
    pub fn new(reconciler: StateSyncReconciler<N, L>) -> Self {
        Self { reconciler }
    }

    pub fn reconciler(&self) -> &StateSyncReconciler<N, L> {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut StateSyncReconciler<N, L> {
        &mut self.reconciler
    }

    /// Apply one evaluation. Agent-signed or asset-touching evaluations
    /// refresh agent state, game config and the weekly arena; evaluations
    /// touching the selected avatar refresh it. An evaluation can match both
    /// routes, or neither, in which case it is skipped.
    pub async fn apply<E, C>(&mut self, evaluation: &E, cache: &mut C) -> Result<()>
    where
        E: ActionEvaluation,
        C: StateCache,
    {
        let agent_route = self.reconciler.affects_current_agent(evaluation, cache)
            || self.reconciler.has_updated_assets_for(evaluation, cache);
        let avatar_route = self.reconciler.affects_current_avatar(evaluation, cache);

        if !agent_route && !avatar_route {
            debug!(
                action = evaluation.action_label(),
                "evaluation does not touch cached state; skipping"
            );
            return Ok(());
        }

        if agent_route {
            self.reconciler.sync_agent(evaluation, cache).await?;
            self.reconciler.sync_game_config(evaluation, cache)?;
            let interval = cache
                .game_config()
                .unwrap_or_default()
                .weekly_arena_interval;
            self.reconciler.sync_weekly_arena(evaluation, cache, interval)?;
        }
        if avatar_route {
            self.reconciler.sync_current_avatar(evaluation, cache).await?;
        }
        Ok(())
    }

    /// Drive evaluations from `source` into `cache` until the source drains
    /// or `interrupt` resolves. A failed application is logged and the loop
    /// moves on to the next evaluation.
    pub async fn run<S, C>(
        &mut self,
        mut source: S,
        cache: &mut C,
        interrupt: impl Future<Output = ()>,
    ) -> Result<()>
    where
        S: EvaluationSource,
        C: StateCache,
    {
        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                next = source.next_evaluation() => {
                    let Some(evaluation) = next? else {
                        info!("evaluation source drained; stopping sync loop");
                        break;
                    };
                    if let Err(report) = self.apply(&evaluation, cache).await {
                        error!(
                            action = evaluation.action_label(),
                            "failed to apply evaluation: {report:?}"
                        );
                    }
                }
                _ = &mut interrupt => {
                    info!("sync loop interrupted");
                    break;
                }
            }
        }
        Ok(())
    }
}
