use crate::commands::AppContext;
use crate::notification::outcome::BuildResult;
use crate::review::parameters::BuildParameters;
use crate::steps::listener::ConsoleListener;
use crate::steps::notifier::{NotifyOutcome, ReviewBoardNotifier};

/// 构建后通知，退出码始终为 0
pub async fn handle_notify(
    context: &AppContext,
    parameters: &BuildParameters,
    result: &str,
) -> anyhow::Result<i32> {
    let result: BuildResult = result.parse()?;
    let listener = ConsoleListener;

    let outcome = ReviewBoardNotifier::new(&context.client)
        .perform(parameters, result, &listener)
        .await;

    if let NotifyOutcome::Sent(update) = &outcome {
        println!("✓ Review Board status update set to {} ({})", update.state, update.description);
    }

    Ok(0)
}
