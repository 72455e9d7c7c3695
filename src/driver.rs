//! Start/stop surface the hub drives.

use std::sync::{Arc, PoisonError};

use futures::channel::{
    mpsc::{self, UnboundedReceiver},
    oneshot,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::client::BulbClient;
use crate::config::{DriverConfig, ModuleInfo};
use crate::dispatcher::{Dispatcher, SharedStats};
use crate::errors::Error;
use crate::event::{DriverHandle, Event};
use crate::history::HistorySummary;
use crate::hub::Hub;
use crate::runtime::{self, JoinHandle};

type Result<T> = std::result::Result<T, Error>;

/// Diagnostics for a running driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDiagnostics {
    pub running: bool,
    pub discovering: bool,
    pub known_bulbs: usize,
    pub events_handled: usize,
    pub time_since_last_event: Option<f64>,
    pub history: HistorySummary,
}

enum Lifecycle<H> {
    Idle {
        hub: H,
        events: UnboundedReceiver<Event>,
    },
    Running {
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<()>>,
    },
    Stopped,
}

/// A Limitless driver bound to one vendor client and one hub.
///
/// The event channel exists from construction, so announcements that arrive
/// before [`Driver::start`] are queued rather than lost.
///
/// Dropping a running driver signals its dispatcher to stop.
pub struct Driver<C, H> {
    info: ModuleInfo,
    config: DriverConfig,
    client: Arc<C>,
    handle: DriverHandle,
    lifecycle: Lifecycle<H>,
    discovering: bool,
    stats: SharedStats,
}

impl<C: BulbClient, H: Hub> Driver<C, H> {
    pub fn new(info: ModuleInfo, client: C, hub: H) -> Self {
        let (tx, events) = mpsc::unbounded();
        let handle = DriverHandle::new(tx);
        let client = Arc::new(client);
        client.subscribe(handle.clone());

        Self {
            info,
            config: DriverConfig::default(),
            client,
            handle,
            lifecycle: Lifecycle::Idle { hub, events },
            discovering: false,
            stats: SharedStats::default(),
        }
    }

    pub fn module_info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Sender for the dispatcher's event channel.
    pub fn handle(&self) -> DriverHandle {
        self.handle.clone()
    }

    /// Whether the dispatcher is still consuming events.
    ///
    /// Turns `false` once [`Driver::stop`] returns, and also when the
    /// dispatcher stopped itself on a fail-fast bring-up failure.
    pub fn is_running(&self) -> bool {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).running
    }

    /// Bring the pipeline up and start discovering bulbs.
    ///
    /// The first call spawns the dispatcher with `config`. If discovery cannot
    /// be initiated the dispatcher keeps running and `start` may be called
    /// again; later configs are ignored.
    pub async fn start(&mut self, config: DriverConfig) -> Result<()> {
        info!("Starting with config {:?}", config);

        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle { hub, events } => {
                self.config = config;
                let (stop, stop_rx) = oneshot::channel();
                let dispatcher = Dispatcher::new(
                    Arc::clone(&self.client),
                    hub,
                    self.handle.clone(),
                    self.config.clone(),
                )
                .with_stats(Arc::clone(&self.stats));
                self.stats
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .running = true;
                let task = runtime::spawn(dispatcher.run(events, stop_rx));
                self.lifecycle = Lifecycle::Running { stop, task };
            }
            running @ Lifecycle::Running { .. } => {
                self.lifecycle = running;
                if self.discovering {
                    return Err(Error::AlreadyStarted);
                }
                debug!("Dispatcher already running, retrying discovery");
            }
            Lifecycle::Stopped => return Err(Error::Stopped),
        }

        self.client
            .start_discovery()
            .await
            .map_err(Error::Discovery)?;
        self.discovering = true;
        Ok(())
    }

    /// Stop the dispatcher and wait for it to finish.
    ///
    /// Returns the dispatcher's outcome, which is an error only if it had
    /// already stopped itself on a fail-fast bring-up failure. Stopping a
    /// driver that never started is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running { stop, task } => {
                info!("Stopping");
                // The dispatcher may already have exited on its own.
                let _ = stop.send(());
                self.discovering = false;
                task.await
            }
            idle @ Lifecycle::Idle { .. } => {
                self.lifecycle = idle;
                Ok(())
            }
            Lifecycle::Stopped => Ok(()),
        }
    }

    pub fn diagnostics(&self) -> DriverDiagnostics {
        let stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        DriverDiagnostics {
            running: stats.running,
            discovering: self.discovering,
            known_bulbs: stats.known_bulbs,
            events_handled: stats.history.total(),
            time_since_last_event: stats.history.time_since_last_event(),
            history: stats.history.summary(),
        }
    }
}

#[cfg(all(test, feature = "runtime-tokio"))]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::client::BulbClient;
    use crate::errors::BoxError;
    use crate::testing::{Command, MockClient, MockHub};
    use crate::types::{Bulb, BulbAddress, BulbState};

    fn driver() -> (Driver<MockClient, MockHub>, MockHub) {
        let hub = MockHub::default();
        let driver = Driver::new(
            ModuleInfo::new("com.limitless.driver", "driver-limitless"),
            MockClient::default(),
            hub.clone(),
        );
        (driver, hub)
    }

    async fn wait_for_events(driver: &Driver<MockClient, MockHub>, count: usize) {
        for _ in 0..200 {
            if driver.diagnostics().events_handled >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("dispatcher did not handle {count} events");
    }

    #[tokio::test]
    async fn test_start_subscribes_and_discovers() {
        let (mut driver, _hub) = driver();
        assert!(!driver.client().handle().is_closed());

        driver.start(DriverConfig::default()).await.unwrap();
        assert!(driver.is_running());
        assert_eq!(driver.client().commands(), vec![Command::StartDiscovery]);
        assert_eq!(driver.module_info().name, "driver-limitless");

        assert_eq!(
            driver.start(DriverConfig::default()).await.unwrap_err(),
            Error::AlreadyStarted
        );
        driver.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_discovery_failure_is_reported_and_retryable() {
        let (mut driver, _hub) = driver();
        driver.client().fail_discovery.store(true, Ordering::SeqCst);

        let err = driver.start(DriverConfig::default()).await.unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
        assert!(err.to_string().starts_with("failed to discover bulbs"));
        assert!(driver.is_running());

        driver.client().fail_discovery.store(false, Ordering::SeqCst);
        driver.start(DriverConfig::default()).await.unwrap();
        assert!(driver.diagnostics().discovering);
        driver.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_end_to_end_discovery_and_state() {
        let (mut driver, hub) = driver();
        let vendor = driver.client().handle();

        // Queued before start, handled once the dispatcher runs.
        vendor.bulb_discovered(Bulb::new("aa01", "Desk")).unwrap();
        driver
            .start(DriverConfig {
                command_timeout_ms: Some(1000),
                ..Default::default()
            })
            .await
            .unwrap();

        vendor.bulb_discovered(Bulb::new("AA01", "Desk")).unwrap();
        vendor
            .state_changed(
                BulbAddress::new("aa01"),
                BulbState {
                    power: 1,
                    brightness: 65535,
                    hue: 0,
                    saturation: 0,
                    kelvin: 2700,
                },
            )
            .unwrap();
        wait_for_events(&driver, 3).await;

        hub.commander(0).apply_on_off(false).unwrap();
        wait_for_events(&driver, 4).await;

        assert_eq!(hub.created().len(), 1);
        assert_eq!(hub.states().len(), 1);
        let address = BulbAddress::new("AA01");
        assert_eq!(
            driver.client().commands(),
            vec![
                Command::StartDiscovery,
                Command::RequestState(address.clone()),
                Command::TurnOff(address),
            ]
        );

        let diag = driver.diagnostics();
        assert!(diag.running);
        assert_eq!(diag.known_bulbs, 1);
        assert_eq!(diag.history.counts["discovered"], 2);

        driver.stop().await.unwrap();
        assert!(!driver.diagnostics().running);
    }

    #[tokio::test]
    async fn test_stop_is_final() {
        let (mut driver, _hub) = driver();
        driver.stop().await.unwrap();
        assert!(!driver.is_running());

        driver.start(DriverConfig::default()).await.unwrap();
        driver.stop().await.unwrap();
        assert!(!driver.is_running());

        assert_eq!(
            driver.start(DriverConfig::default()).await.unwrap_err(),
            Error::Stopped
        );
        driver.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_reports_fail_fast_exit() {
        let (mut driver, hub) = driver();
        hub.log.fail_create.store(true, Ordering::SeqCst);
        driver
            .start(DriverConfig {
                fail_fast: true,
                ..Default::default()
            })
            .await
            .unwrap();

        driver
            .handle()
            .bulb_discovered(Bulb::new("aa01", "Desk"))
            .unwrap();
        wait_for_events(&driver, 1).await;

        for _ in 0..200 {
            if !driver.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!driver.is_running());
        assert!(!driver.diagnostics().running);

        let err = driver.stop().await.unwrap_err();
        assert!(matches!(err, Error::DeviceCreation { .. }));
    }

    /// Vendor client whose state requests never complete.
    #[derive(Default)]
    struct StalledClient {
        inner: MockClient,
    }

    impl BulbClient for StalledClient {
        fn subscribe(&self, events: DriverHandle) {
            self.inner.subscribe(events);
        }

        async fn start_discovery(&self) -> std::result::Result<(), BoxError> {
            self.inner.start_discovery().await
        }

        async fn request_state(&self, bulb: &Bulb) -> std::result::Result<(), BoxError> {
            self.inner
                .commands
                .lock()
                .unwrap()
                .push(Command::RequestState(bulb.address().clone()));
            futures::future::pending().await
        }

        async fn turn_on(&self, bulb: &Bulb) -> std::result::Result<(), BoxError> {
            self.inner.turn_on(bulb).await
        }

        async fn turn_off(&self, bulb: &Bulb) -> std::result::Result<(), BoxError> {
            self.inner.turn_off(bulb).await
        }
    }

    #[tokio::test]
    async fn test_stop_abandons_stalled_command() {
        let hub = MockHub::default();
        let mut driver = Driver::new(
            ModuleInfo::new("com.limitless.driver", "driver-limitless"),
            StalledClient::default(),
            hub.clone(),
        );
        driver.start(DriverConfig::default()).await.unwrap();
        driver
            .handle()
            .bulb_discovered(Bulb::new("aa01", "Desk"))
            .unwrap();

        for _ in 0..200 {
            if driver.client().inner.commands().len() >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            driver.client().inner.commands(),
            vec![
                Command::StartDiscovery,
                Command::RequestState(BulbAddress::new("AA01")),
            ]
        );

        tokio::time::timeout(Duration::from_secs(2), driver.stop())
            .await
            .expect("stop waited on a stalled vendor command")
            .unwrap();
        assert!(!driver.is_running());
        assert_eq!(hub.created().len(), 1);
    }
}
