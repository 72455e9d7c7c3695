//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::BulbClient;
use crate::errors::BoxError;
use crate::event::{BulbCommander, DriverHandle};
use crate::hub::{Hub, LightDevice};
use crate::types::{Bulb, BulbAddress, DeviceInfo, LightState};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartDiscovery,
    RequestState(BulbAddress),
    TurnOn(BulbAddress),
    TurnOff(BulbAddress),
}

#[derive(Default)]
pub struct MockClient {
    pub commands: Mutex<Vec<Command>>,
    pub events: Mutex<Option<DriverHandle>>,
    pub fail_discovery: AtomicBool,
    pub fail_commands: AtomicBool,
}

impl MockClient {
    pub fn handle(&self) -> DriverHandle {
        self.events.lock().unwrap().clone().expect("not subscribed")
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    fn issue(&self, command: Command) -> Result<(), BoxError> {
        self.commands.lock().unwrap().push(command);
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err("bulb unreachable".into());
        }
        Ok(())
    }
}

impl BulbClient for MockClient {
    fn subscribe(&self, events: DriverHandle) {
        *self.events.lock().unwrap() = Some(events);
    }

    async fn start_discovery(&self) -> Result<(), BoxError> {
        self.commands.lock().unwrap().push(Command::StartDiscovery);
        if self.fail_discovery.load(Ordering::SeqCst) {
            return Err("no broadcast interface".into());
        }
        Ok(())
    }

    async fn request_state(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.issue(Command::RequestState(bulb.address().clone()))
    }

    async fn turn_on(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.issue(Command::TurnOn(bulb.address().clone()))
    }

    async fn turn_off(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.issue(Command::TurnOff(bulb.address().clone()))
    }
}

#[derive(Default)]
pub struct HubLog {
    pub created: Mutex<Vec<DeviceInfo>>,
    pub states: Mutex<Vec<(String, LightState)>>,
    pub commanders: Mutex<Vec<BulbCommander>>,
    pub fail_create: AtomicBool,
    pub fail_enable: AtomicBool,
}

#[derive(Default, Clone)]
pub struct MockHub {
    pub log: Arc<HubLog>,
}

impl MockHub {
    pub fn created(&self) -> Vec<DeviceInfo> {
        self.log.created.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<(String, LightState)> {
        self.log.states.lock().unwrap().clone()
    }

    pub fn commander(&self, index: usize) -> BulbCommander {
        self.log.commanders.lock().unwrap()[index].clone()
    }
}

impl Hub for MockHub {
    type Device = MockDevice;

    async fn create_light(
        &mut self,
        info: &DeviceInfo,
        commander: BulbCommander,
    ) -> Result<MockDevice, BoxError> {
        if self.log.fail_create.load(Ordering::SeqCst) {
            return Err("hub rejected device".into());
        }
        self.log.created.lock().unwrap().push(info.clone());
        self.log.commanders.lock().unwrap().push(commander);
        Ok(MockDevice {
            natural_id: info.natural_id.clone(),
            log: Arc::clone(&self.log),
        })
    }
}

pub struct MockDevice {
    natural_id: String,
    log: Arc<HubLog>,
}

impl LightDevice for MockDevice {
    async fn enable_on_off_channel(&mut self) -> Result<(), BoxError> {
        if self.log.fail_enable.load(Ordering::SeqCst) {
            return Err("channel refused".into());
        }
        Ok(())
    }

    async fn set_light_state(&mut self, state: &LightState) -> Result<(), BoxError> {
        self.log
            .states
            .lock()
            .unwrap()
            .push((self.natural_id.clone(), state.clone()));
        Ok(())
    }
}
