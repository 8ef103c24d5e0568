use color_eyre::eyre::Result;
use questline::{
    Address,
    Agent,
    Avatar,
    ChannelEvaluationSource,
    Currency,
    GoldBalance,
    MemoryStateCache,
    Quest,
    QuestList,
    QueueNotificationSink,
    StateCache,
    StateSyncReconciler,
    StaticLocalizer,
    SyncHandler,
    TableEvaluation,
};
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn init_tracing() {
    let file_appender = rolling::daily("logs", "questline.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

/// Plays a short scripted session against an in-memory cache so the sync
/// behavior can be observed end to end.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let agent_address = Address::new([1u8; 32]);
    let avatar_address = Address::new([2u8; 32]);

    let mut cache =
        MemoryStateCache::with_agent(Agent::new(agent_address).with_avatar(0, avatar_address));
    cache.select_avatar(0, Avatar::new(avatar_address, "lancer"));

    let notifications = QueueNotificationSink::new();
    let reconciler = StateSyncReconciler::new(
        Currency::gold(),
        notifications.clone(),
        StaticLocalizer::new(),
    );
    let mut handler = SyncHandler::new(reconciler);

    let (sender, receiver) = mpsc::channel(16);
    let producer = tokio::spawn(async move {
        let mut leveled_up = Avatar::new(avatar_address, "lancer");
        leveled_up.level = 2;
        leveled_up.quest_list = QuestList::new(vec![Quest::new(1, "hunt 10 boars").completed()]);

        let evaluations = vec![
            TableEvaluation::new("daily_reward", agent_address, 100)
                .with_agent(Agent::new(agent_address).with_avatar(0, avatar_address))
                .with_gold_balance(GoldBalance {
                    address: agent_address,
                    currency: Currency::gold(),
                    quantity: 1_000,
                }),
            TableEvaluation::new("hack_and_slash", agent_address, 101)
                .with_avatar(leveled_up)
                .with_gold_balance(GoldBalance {
                    address: agent_address,
                    currency: Currency::gold(),
                    quantity: 900,
                }),
        ];
        for evaluation in evaluations {
            if sender.send(evaluation).await.is_err() {
                break;
            }
        }
    });

    handler
        .run(
            ChannelEvaluationSource::new(receiver),
            &mut cache,
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
        )
        .await?;
    producer.await?;

    for notification in notifications.drain() {
        info!(category = ?notification.category, "notification: {}", notification.message);
    }
    if let Some(balance) = cache.gold_balance() {
        info!(quantity = balance.quantity, "gold balance synced");
    }
    if let Some(avatar) = cache.current_avatar() {
        info!(name = %avatar.name, level = avatar.level, "avatar synced");
    }
    Ok(())
}
