use crate::infrastructure::error::ReviewBoardError;
use crate::notification::client::{StatusUpdate, StatusUpdateSender};
use crate::notification::outcome::{classify, BuildResult};
use crate::review::parameters::BuildParameters;
use crate::review::request::NOTIFY_PARAMETERS_MISSING;
use crate::steps::listener::BuildListener;
use crate::steps::INVALID_SERVER_URL_MESSAGE;

/// 通知步骤的处理结果，无论哪种都不会让构建失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent(StatusUpdate),
    Skipped(ReviewBoardError),
    Failed(ReviewBoardError),
}

impl NotifyOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotifyOutcome::Sent(_))
    }
}

/// 构建结束后把结果回写到 Review Board 的状态更新
pub struct ReviewBoardNotifier<'a> {
    sender: &'a dyn StatusUpdateSender,
}

impl<'a> ReviewBoardNotifier<'a> {
    pub fn new(sender: &'a dyn StatusUpdateSender) -> Self {
        Self { sender }
    }

    pub async fn perform(
        &self,
        parameters: &BuildParameters,
        result: BuildResult,
        listener: &dyn BuildListener,
    ) -> NotifyOutcome {
        let request = match parameters.parse_review_request() {
            Ok(request) => request,
            Err(e @ ReviewBoardError::InvalidServerUrl { .. }) => {
                listener.error(INVALID_SERVER_URL_MESSAGE);
                return NotifyOutcome::Skipped(e);
            }
            Err(e) => {
                listener.error(&e.to_string());
                return NotifyOutcome::Skipped(e);
            }
        };

        if !request.is_complete_for_notification() {
            listener.error(NOTIFY_PARAMETERS_MISSING);
            return NotifyOutcome::Skipped(ReviewBoardError::incomplete(NOTIFY_PARAMETERS_MISSING));
        }

        let outcome = classify(result);
        tracing::info!(result = %result, state = %outcome.state, "notifying Review Board of build result");

        let update = StatusUpdate::new(outcome.state, outcome.description);
        match self.sender.update_status_update(&request, &update).await {
            Ok(()) => NotifyOutcome::Sent(update),
            Err(e) => {
                listener.error(&format!(
                    "Unable to notify Review Board of the result of the build: {}",
                    e
                ));
                NotifyOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::parameters::{REVIEWBOARD_REVIEW_ID, REVIEWBOARD_SERVER, REVIEWBOARD_STATUS_UPDATE_ID};
    use crate::review::request::{ReviewRequest, StatusUpdateState};
    use crate::steps::listener::RecordingListener;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSender {
        sent: Mutex<Vec<(ReviewRequest, StatusUpdate)>>,
        fail_with: Option<ReviewBoardError>,
    }

    #[async_trait]
    impl StatusUpdateSender for FakeSender {
        async fn update_status_update(
            &self,
            request: &ReviewRequest,
            update: &StatusUpdate,
        ) -> Result<(), ReviewBoardError> {
            self.sent.lock().unwrap().push((request.clone(), update.clone()));
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    fn complete_parameters() -> BuildParameters {
        BuildParameters::new()
            .with(REVIEWBOARD_SERVER, "http://localhost")
            .with(REVIEWBOARD_REVIEW_ID, "1")
            .with(REVIEWBOARD_STATUS_UPDATE_ID, "2")
    }

    #[tokio::test]
    async fn test_build_statuses() {
        let cases = [
            (BuildResult::Success, StatusUpdateState::Success, "job succeeded"),
            (BuildResult::Aborted, StatusUpdateState::Error, "job aborted"),
            (BuildResult::NotBuilt, StatusUpdateState::Error, "job not built"),
            (BuildResult::Unstable, StatusUpdateState::Failure, "job unstable"),
            (BuildResult::Failure, StatusUpdateState::Failure, "job failed"),
        ];

        for (result, state, description) in cases {
            let sender = FakeSender::default();
            let listener = RecordingListener::new();
            let outcome = ReviewBoardNotifier::new(&sender)
                .perform(&complete_parameters(), result, &listener)
                .await;

            assert!(outcome.is_sent());
            let sent = sender.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].1.state, state);
            assert_eq!(sent[0].1.description, description);
            assert_eq!(sent[0].1.link_url, None);
            assert!(listener.errors().is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let sender = FakeSender::default();
        let listener = RecordingListener::new();
        let outcome = ReviewBoardNotifier::new(&sender)
            .perform(&BuildParameters::new(), BuildResult::Success, &listener)
            .await;

        assert!(matches!(
            outcome,
            NotifyOutcome::Skipped(ReviewBoardError::IncompleteDescriptor { .. })
        ));
        assert!(listener.contains(
            "REVIEWBOARD_REVIEW_ID, or REVIEWBOARD_STATUS_UPDATE_ID, or REVIEWBOARD_SERVER not provided in parameters"
        ));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let sender = FakeSender::default();
        let listener = RecordingListener::new();
        let parameters = BuildParameters::new().with(REVIEWBOARD_SERVER, "htp?:/invalidurl?/.");
        let outcome = ReviewBoardNotifier::new(&sender)
            .perform(&parameters, BuildResult::Success, &listener)
            .await;

        assert!(matches!(
            outcome,
            NotifyOutcome::Skipped(ReviewBoardError::InvalidServerUrl { .. })
        ));
        assert!(listener.contains("URL provided in REVIEWBOARD_SERVER is not a valid URL."));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_is_logged_and_skipped() {
        let sender = FakeSender::default();
        let listener = RecordingListener::new();
        let parameters = complete_parameters().with(REVIEWBOARD_REVIEW_ID, "forty-two");
        let outcome = ReviewBoardNotifier::new(&sender)
            .perform(&parameters, BuildResult::Success, &listener)
            .await;

        assert!(matches!(
            outcome,
            NotifyOutcome::Skipped(ReviewBoardError::MalformedParameter { .. })
        ));
        let errors = listener.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("REVIEWBOARD_REVIEW_ID"));
        assert!(errors[0].contains("forty-two"));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_error_is_logged() {
        let sender = FakeSender {
            fail_with: Some(ReviewBoardError::UnexpectedResponse { code: 500 }),
            ..Default::default()
        };
        let listener = RecordingListener::new();
        let outcome = ReviewBoardNotifier::new(&sender)
            .perform(&complete_parameters(), BuildResult::Success, &listener)
            .await;

        assert!(matches!(outcome, NotifyOutcome::Failed(_)));
        assert!(listener.contains("Unable to notify Review Board of the result of the build:"));
    }
}
