//! fabricd daemon entry point.
//!
//! Brings up a virtual switch fabric over the loopback driver: loads the
//! port layout, attaches the master interface, enables every front port
//! and runs a short traffic pass so the tag path can be observed in the
//! logs.

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use switchfab_core::{route_ingress, transmit, FabricConfig, FabricContext, Iface};
use switchfab_driver::LoopbackDriver;
use switchfab_types::Frame;

/// Environment variable naming the fabric configuration file.
const CONFIG_ENV: &str = "SWITCHFAB_CONFIG";

/// Config path consulted when the environment variable is unset.
const DEFAULT_CONFIG_PATH: &str = "/etc/switchfab/fabric.yaml";

/// Port count used when no configuration file is found.
const DEFAULT_PORT_COUNT: usize = 3;

/// Initialize tracing/logging.
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Loads the fabric configuration from `SWITCHFAB_CONFIG`, then the
/// default path, then a built-in three-port layout.
fn load_config() -> anyhow::Result<FabricConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        info!("Loading fabric configuration from {}", path);
        return FabricConfig::load(&path).with_context(|| format!("loading {}", path));
    }

    if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
        info!("Loading fabric configuration from {}", DEFAULT_CONFIG_PATH);
        return FabricConfig::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("loading {}", DEFAULT_CONFIG_PATH));
    }

    info!(
        "No configuration file found, using built-in {}-port layout",
        DEFAULT_PORT_COUNT
    );
    Ok(FabricConfig::with_port_count(
        "switch0",
        "eth0",
        DEFAULT_PORT_COUNT,
    ))
}

/// One bring-up and traffic pass over the loopback driver.
async fn run(config: FabricConfig) -> anyhow::Result<()> {
    let driver = Arc::new(LoopbackDriver::new(config.num_slave_ports()));
    let fabric = FabricContext::new(&config, driver)?;

    // The "wire": frames the master would hand to its underlying device.
    let wire = Arc::new(Mutex::new(Vec::<Vec<u8>>::new()));
    let master = Iface::master(config.master.as_str());
    let tx_wire = Arc::clone(&wire);
    fabric.attach_master(
        Arc::clone(&master),
        Box::new(move |_, frame| {
            tx_wire
                .lock()
                .expect("wire lock poisoned")
                .push(frame.into_bytes());
            Ok(())
        }),
    )?;
    info!("Master interface {} attached", master.name());

    for index in 0..fabric.num_slave_ports() {
        fabric.port_enable(index)?;
    }
    info!("Enabled {} front ports", fabric.num_slave_ports());

    // Egress on the first port, then feed the tagged frame back in on
    // the master and check the tag routed it home.
    let port = fabric
        .slave_port(0)
        .context("fabric has no front ports configured")?;
    transmit(&port, Frame::from(&[0u8; 64][..]))?;

    let on_wire = {
        let mut wire = wire.lock().expect("wire lock poisoned");
        Frame::new(wire.pop().context("master transmit produced no frame")?)
    };
    info!("Tagged frame on the wire: {} bytes", on_wire.len());

    let target = route_ingress(&master, &on_wire);
    info!("Ingress dispatch delivered the frame to {}", target.name());

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    info!("--- Starting fabricd ---");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("fabricd configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Fabric {} with master {} and {} front ports",
        config.device,
        config.master,
        config.num_slave_ports()
    );

    match run(config).await {
        Ok(()) => {
            info!("fabricd exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("fabricd error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
