use super::pipeline::Generator;
use crate::components::triggers::{Trigger, TriggerKind};
use crate::utils::time::{calculate_wait_duration, next_monthly_fire};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{error, info};

/// Run the installed monthly trigger until `shutdown` resolves.
///
/// A shutdown arriving while a run is in progress is picked up once the run
/// completes.
pub async fn run_monthly_scheduler(
    generator: Arc<Generator>,
    schedule: Trigger,
    mut shutdown: oneshot::Receiver<()>,
) {
    let TriggerKind::Monthly { day, hour } = schedule.kind else {
        error!("Trigger {} is not a monthly schedule", schedule.id);
        return;
    };
    let tz = generator.config().timezone;

    loop {
        let now = Utc::now();
        let next = next_monthly_fire(&now.with_timezone(&tz), day, hour);
        info!(
            "Next monthly summary ({}) scheduled for {}",
            next.month.format("%Y-%m"),
            next.at.with_timezone(&tz)
        );

        let wait_seconds = calculate_wait_duration(&now, &next.at);

        tokio::select! {
            _ = sleep(TokioDuration::from_secs(wait_seconds)) => {}
            _ = &mut shutdown => {
                info!("Monthly scheduler stopping");
                return;
            }
        }

        // Timer may wake marginally early
        let fired_at = Utc::now().max(next.at);
        if let Err(e) = generator.on_monthly_fire(&next, fired_at).await {
            error!("Monthly summary generation failed: {}", e);
        }
    }
}
