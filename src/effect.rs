//! Effects - side effects declared by the reducer

use tracing::warn;

use crate::action::Action;
use crate::api::ForecastClient;
use crate::state::LocationQuery;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current conditions; the settlement must echo `request_id`
    FetchForecast {
        request_id: u64,
        query: LocationQuery,
    },
}

/// Run one fetch and turn its outcome into the settling action. Failures
/// are logged in full and reach the state as the fixed user message.
pub async fn fetch_forecast(
    client: &ForecastClient,
    request_id: u64,
    query: LocationQuery,
) -> Action {
    match client.fetch(&query).await {
        Ok(forecast) => Action::ForecastDidLoad {
            request_id,
            forecast,
        },
        Err(e) => {
            warn!(request_id, %query, error = %e, "forecast fetch failed");
            Action::ForecastDidError {
                request_id,
                message: e.user_message().to_string(),
            }
        }
    }
}
