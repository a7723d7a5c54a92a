//! The connection factory.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::database::{Connector, Database};
use crate::error::{ConnectionError, ConnectionResult};
use crate::logging::TracingQueryLogger;
use crate::options::{ConnectionOption, ConnectionOptions};

/// Open a connection through `connector`.
///
/// The options are applied in order, then validated: a missing adapter is
/// reported before a missing URL. The connection is pinged before it is
/// returned; a connection that fails the ping is closed.
pub async fn open_with<I>(
    connector: &dyn Connector,
    options: I,
) -> ConnectionResult<Box<dyn Database>>
where
    I: IntoIterator<Item = ConnectionOption>,
{
    let opts: ConnectionOptions = options.into_iter().collect();
    let (adapter, url) = opts.validate()?;

    debug!(adapter = %adapter, "opening connection");

    let mut db = connector
        .connect(adapter, url)
        .await
        .map_err(|source| ConnectionError::Open { adapter, source })?;

    if let Err(source) = db.ping().await {
        if let Err(e) = db.close().await {
            warn!(adapter = %adapter, error = %e, "failed to close connection after ping");
        }
        return Err(ConnectionError::Ping { adapter, source });
    }

    db.set_logging(opts.debug);
    if opts.debug {
        if let Some(dispatch) = opts.logger {
            db.set_logger(Arc::new(TracingQueryLogger::new(dispatch)));
        }
    }

    Ok(db)
}
