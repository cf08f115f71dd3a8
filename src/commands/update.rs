use crate::commands::AppContext;
use crate::review::parameters::BuildParameters;
use crate::review::request::StatusUpdateState;

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub state: String,
    pub description: String,
    pub url: Option<String>,
    pub url_text: Option<String>,
}

/// 手动发送任意状态，失败时返回非零退出码
pub async fn handle_update(
    context: &AppContext,
    parameters: &BuildParameters,
    request: UpdateRequest,
) -> anyhow::Result<i32> {
    let state: StatusUpdateState = request.state.parse()?;
    let review_request = parameters.parse_review_request()?;

    match context
        .client
        .send(
            &review_request,
            state,
            &request.description,
            request.url.as_deref(),
            request.url_text.as_deref(),
        )
        .await
    {
        Ok(()) => {
            println!("✓ Review Board status update set to {}", state);
            Ok(0)
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            if e.is_http_failure() {
                eprintln!("Check the credential configured for this server and the review request IDs.");
            }
            Ok(1)
        }
    }
}
