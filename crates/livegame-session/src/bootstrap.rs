//! The once-per-load startup sequence.

use std::sync::Arc;

use livegame_client::RoomClient;
use livegame_protocol::Codec;

use crate::{HostBridge, SessionHandle, SessionState, StartupError};

/// Runs the startup handshake and returns a handle to the session state.
///
/// 1. Fetches identity and room descriptor from the host bridge
///    concurrently. Both must succeed; the first failure aborts startup
///    and the other result is discarded — no partial session.
/// 2. Opens the connection scoped to `(user_id, game_room_id)`.
/// 3. Sends the credential before any other traffic, if one is present.
/// 4. Registers all inbound handlers. A push arriving between open and
///    registration is dropped; the protocol accepts this race instead of
///    buffering.
/// 5. Requests the server's identity echo.
///
/// # Errors
/// [`StartupError::Bridge`] if either bridge fetch fails,
/// [`StartupError::Connect`] if the connection cannot be opened.
pub async fn start<B, C>(
    bridge: Arc<B>,
    client: Arc<RoomClient<C>>,
) -> Result<SessionHandle, StartupError>
where
    B: HostBridge,
    C: Codec,
{
    let (identity, room) = tokio::try_join!(
        bridge.fetch_user_info(),
        bridge.fetch_game_room_info()
    )?;
    tracing::info!(
        user_id = %identity.user_id,
        room_id = %room.game_room_id,
        game_version = %room.game_version,
        "starting game room session"
    );

    client.connect(identity.user_id, room.game_room_id).await?;

    match &identity.secret {
        Some(secret) => client.send_authenticate(secret).await,
        None => tracing::debug!("no credential, unauthenticated session"),
    }

    let session = SessionHandle::new(SessionState::new(identity, room));
    register_handlers(&client, &session, &bridge);

    client.request_user_info().await;
    Ok(session)
}

fn register_handlers<B, C>(
    client: &Arc<RoomClient<C>>,
    session: &SessionHandle,
    bridge: &Arc<B>,
) where
    B: HostBridge,
    C: Codec,
{
    {
        let session = session.clone();
        client.on_room_status(move |status| {
            session.lock().apply_room_status(&status);
        });
    }

    {
        let session = session.clone();
        client.on_user_info(move |update| {
            session.lock().merge_user_info(update);
        });
    }

    // Non-fatal to the connection; the UI replaces this sink with its own
    // `on_error` registration if it wants more than a log line.
    client.on_error(|err| {
        tracing::error!(message = %err.message, "game room server error");
    });

    {
        let bridge = Arc::clone(bridge);
        let conn = Arc::clone(client);
        client.on_room_close(move || {
            let bridge = Arc::clone(&bridge);
            let conn = Arc::clone(&conn);
            // The handler itself must not block the dispatch task.
            tokio::spawn(async move {
                if let Err(e) = bridge.notify_room_closed().await {
                    tracing::error!(
                        error = %e,
                        "failed to notify host of room close"
                    );
                }
                conn.disconnect().await;
            });
        });
    }
}
