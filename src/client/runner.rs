//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{error::ClientError, session::run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// A duplicate user id is a configuration problem, not a transient
/// network failure; retrying would keep hitting the same rejection.
fn is_fatal(error: &(dyn std::error::Error + 'static)) -> bool {
    matches!(
        error.downcast_ref::<ClientError>(),
        Some(ClientError::DuplicateUserId(_))
    )
}

fn should_retry(attempt: u32) -> bool {
    attempt < MAX_RECONNECT_ATTEMPTS
}

/// Run the playback client with reconnection logic
pub async fn run_client(url: String, user_id: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            user_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &user_id).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                if is_fatal(e.as_ref()) {
                    tracing::error!("{}", e);
                    tracing::error!(
                        "Cannot connect with user_id '{}' as it is already in use. Exiting.",
                        user_id
                    );
                    std::process::exit(1);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_retry(reconnect_count) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
