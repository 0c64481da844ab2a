use crate::tls;
use citadel_spider::http::PgClient;
use citadel_spider::{api, pipeline, Config, LoadReport};
use dotenv::var;
use std::future::Future;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tokio_postgres::{self as pg, NoTls};
use tracing::{debug, error, info, trace, warn};

/// Fetch every character and load it, over one database session that is closed whatever the
/// outcome.
pub(crate) async fn run(config: &Config, tui: bool) -> anyhow::Result<LoadReport> {
    let http_client = api::build_client()?;

    let session = Session::open().await?;
    let result = pipeline::run(&http_client, &session.client, config, tui).await;
    session.close().await;

    Ok(result?)
}

/// The single connection of a run: the client, and the task driving its socket.
///
/// [`Session::close`] drains the connection; if the session is dropped without closing (an
/// early return or a panic), the driver task is aborted instead.
pub(crate) struct Session {
    pub(crate) client: PgClient,
    driver: Driver,
}

/// Connection task, aborted when dropped.
pub(crate) struct Driver(JoinHandle<()>);

impl Driver {
    /// Wait for the task to finish on its own.
    pub(crate) async fn join(mut self) {
        if let Err(err) = (&mut self.0).await {
            error!("citadel connection task failed, error({err})");
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Session {
    /// Connect to `CITADEL_URL`; with TLS when `CITADEL_ROOT_CERT` names a root certificate.
    pub(crate) async fn open() -> anyhow::Result<Self> {
        let url = var("CITADEL_URL").map_err(|err| {
            error!("environment variable CITADEL_URL not found");
            err
        })?;

        trace!("connecting to citadel ...");
        let session = match var("CITADEL_ROOT_CERT").ok().map(PathBuf::from) {
            Some(root_cert) => {
                let tls = tls::connector(&root_cert)?;
                let (client, conn) = pg::connect(&url, tls).await.map_err(|err| {
                    error!("citadel connection error: {}", err);
                    err
                })?;
                Self::spawn(client, conn)
            }
            None => {
                warn!("CITADEL_ROOT_CERT not set, connecting without TLS");
                let (client, conn) = pg::connect(&url, NoTls).await.map_err(|err| {
                    error!("citadel connection error: {}", err);
                    err
                })?;
                Self::spawn(client, conn)
            }
        };

        info!("connected to the database");
        Ok(session)
    }

    fn spawn<C>(client: PgClient, conn: C) -> Self
    where
        C: Future<Output = Result<(), pg::Error>> + Send + 'static,
    {
        let driver = tokio::spawn(async move {
            if let Err(err) = conn.await {
                error!("citadel connection error: {}", err);
            }
        });
        debug!("citadel connection established");

        Self {
            client,
            driver: Driver(driver),
        }
    }

    /// Drop the client, then wait for the connection to terminate.
    pub(crate) async fn close(self) {
        let Session { client, driver } = self;
        drop(client);

        driver.join().await;
        info!("connection closed");
    }
}
