use crate::SurrealOpts;

pub type SurrealClient = surrealdb::Surreal<surrealdb::engine::any::Any>;

/// Connect and sign in to the namespace/database named in `opts`.
pub async fn surreal_connect(opts: &SurrealOpts) -> anyhow::Result<SurrealClient> {
    // The SDK talks to remote servers over WebSocket
    let surreal_endpoint = opts
        .surreal_endpoint
        .replace("http://", "ws://")
        .replace("https://", "wss://");

    tracing::debug!("Connecting to SurrealDB at {}", surreal_endpoint);

    let surreal = surrealdb::engine::any::connect(surreal_endpoint).await?;

    surreal
        .signin(surrealdb::opt::auth::Root {
            username: &opts.surreal_username,
            password: &opts.surreal_password,
        })
        .await?;

    surreal.use_ns(&opts.namespace).use_db(&opts.database).await?;

    Ok(surreal)
}
