//! Main loop module.
//!
//! Lifecycle orchestration for the network interface.
//!
//! # Architecture
//!
//! - `context` - Tunables shared by every state machine
//! - `status` - Snapshot handle read by HTTP, CLI and status LED
//! - `orchestrator` - [`NetworkManager`]: boot, restart, per-iteration service
//!
//! # Usage
//!
//! ```ignore
//! static STATUS: NetworkStatus = NetworkStatus::new();
//!
//! let store = RecordStore::new(flash, irq);
//! let mut net = NetworkManager::new(chip, dhcp, store, timer, &STATUS, LifecycleConfig::default());
//! net.boot_sequence(&board, &mut services);
//! loop {
//!     net.service(&mut services);
//!     // command dispatch, HTTP ...
//! }
//! ```

pub mod context;
pub mod orchestrator;
pub mod status;

pub use context::LifecycleConfig;
pub use orchestrator::{BootReport, DependentServices, NetworkManager};
pub use status::NetworkStatus;
