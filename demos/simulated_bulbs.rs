//! Run the driver against simulated bulbs and a printing hub.
//!
//! This demo demonstrates:
//! - Wiring a vendor client and a hub into a [`Driver`]
//! - Duplicate announcements being ignored
//! - State updates translated to hub light state
//! - On/off requests flowing back from the hub to the bulbs
//!
//! Run with: cargo run --example simulated_bulbs -- --bulbs 3

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use limitless_driver::{
    BoxError, Bulb, BulbClient, BulbCommander, BulbState, DeviceInfo, Driver, DriverConfig,
    DriverHandle, Hub, LightDevice, LightState, ModuleInfo,
};

#[derive(Parser)]
#[command(name = "simulated-bulbs")]
#[command(about = "Drive simulated Limitless bulbs through the hub driver", long_about = None)]
struct Cli {
    /// Number of simulated bulbs to announce
    #[arg(short, long, default_value = "2")]
    bulbs: u8,

    /// Path to a package.json with module metadata
    #[arg(short, long)]
    package: Option<String>,

    /// Per-command timeout in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,
}

/// Vendor client whose bulbs live in memory.
#[derive(Default)]
struct SimulatedClient {
    events: Mutex<Option<DriverHandle>>,
    bulbs: Vec<Bulb>,
    power: Arc<Mutex<Vec<u16>>>,
}

impl SimulatedClient {
    fn new(count: u8) -> Self {
        let bulbs: Vec<Bulb> = (0..count)
            .map(|i| Bulb::new(format!("d073d50000{i:02x}"), &format!("Bulb {i}")))
            .collect();
        SimulatedClient {
            power: Arc::new(Mutex::new(vec![1; bulbs.len()])),
            bulbs,
            events: Mutex::new(None),
        }
    }

    fn handle(&self) -> Result<DriverHandle, BoxError> {
        self.events
            .lock()
            .map_err(|_| "poisoned")?
            .clone()
            .ok_or_else(|| "not subscribed".into())
    }

    fn index(&self, bulb: &Bulb) -> Result<usize, BoxError> {
        self.bulbs
            .iter()
            .position(|b| b.address() == bulb.address())
            .ok_or_else(|| format!("unknown bulb {}", bulb.address()).into())
    }

    fn report(&self, index: usize) -> Result<(), BoxError> {
        let power = self.power.lock().map_err(|_| "poisoned")?[index];
        let state = BulbState {
            power,
            brightness: 40000,
            hue: (index as u16).wrapping_mul(12000),
            saturation: if index % 2 == 0 { 0 } else { 65535 },
            kelvin: 2700,
        };
        self.handle()?
            .state_changed(self.bulbs[index].address().clone(), state)?;
        Ok(())
    }

    fn set_power(&self, bulb: &Bulb, power: u16) -> Result<(), BoxError> {
        let index = self.index(bulb)?;
        self.power.lock().map_err(|_| "poisoned")?[index] = power;
        self.report(index)
    }
}

impl BulbClient for SimulatedClient {
    fn subscribe(&self, events: DriverHandle) {
        if let Ok(mut slot) = self.events.lock() {
            *slot = Some(events);
        }
    }

    async fn start_discovery(&self) -> Result<(), BoxError> {
        let handle = self.handle()?;
        for bulb in &self.bulbs {
            handle.bulb_discovered(bulb.clone())?;
            // Real bulbs announce themselves more than once.
            handle.bulb_discovered(bulb.clone())?;
        }
        Ok(())
    }

    async fn request_state(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.report(self.index(bulb)?)
    }

    async fn turn_on(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.set_power(bulb, 1)
    }

    async fn turn_off(&self, bulb: &Bulb) -> Result<(), BoxError> {
        self.set_power(bulb, 0)
    }
}

/// Hub that prints everything it is asked to do.
#[derive(Default)]
struct PrintingHub {
    commanders: Arc<Mutex<Vec<BulbCommander>>>,
}

struct PrintedLight {
    id: String,
}

impl Hub for PrintingHub {
    type Device = PrintedLight;

    async fn create_light(
        &mut self,
        info: &DeviceInfo,
        commander: BulbCommander,
    ) -> Result<PrintedLight, BoxError> {
        println!(
            "  + device {} ({})",
            info.natural_id,
            info.name.as_deref().unwrap_or("unnamed")
        );
        self.commanders.lock().map_err(|_| "poisoned")?.push(commander);
        Ok(PrintedLight {
            id: info.natural_id.clone(),
        })
    }
}

impl LightDevice for PrintedLight {
    async fn enable_on_off_channel(&mut self) -> Result<(), BoxError> {
        println!("  . {} on-off channel enabled", self.id);
        Ok(())
    }

    async fn set_light_state(&mut self, state: &LightState) -> Result<(), BoxError> {
        println!("  = {} {}", self.id, serde_json::to_string(state)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let info = match &cli.package {
        Some(path) => ModuleInfo::load(path)?,
        None => ModuleInfo::new("com.limitless.driver", "driver-limitless"),
    };
    println!("Module {} ({})", info.name, info.id);

    let hub = PrintingHub::default();
    let commanders = Arc::clone(&hub.commanders);
    let mut driver = Driver::new(info, SimulatedClient::new(cli.bulbs), hub);

    driver
        .start(DriverConfig {
            command_timeout_ms: cli.timeout_ms,
            ..Default::default()
        })
        .await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    println!("\nSwitching every bulb off from the hub...");
    let all: Vec<BulbCommander> = commanders.lock().map_err(|_| "poisoned")?.clone();
    for commander in &all {
        commander.apply_on_off(false)?;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    let diag = driver.diagnostics();
    println!(
        "\n{} bulb(s) known, {} event(s) handled",
        diag.known_bulbs, diag.events_handled
    );

    driver.stop().await?;
    println!("Done!");
    Ok(())
}
