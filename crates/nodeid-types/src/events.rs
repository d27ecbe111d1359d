//! Chain event data contracts consumed by node subsystems.
//!
//! These are plain data shapes delivered over subscription channels.
//! Every event carries an [`EventKind`]: either a notification that the
//! stream was (re)established, or a concrete event payload. No event
//! processing happens in this workspace.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Receiver;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Distinguishes a resubscription notice from a real event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Sent whenever a new connection to the chain is established.
    ///
    /// Events may have been lost while disconnected, so the receiver
    /// must resynchronise its state with the network.
    Subscribed,
    /// A new event was received and needs handling.
    Received,
}

// ---------------------------------------------------------------------------
// Public config
// ---------------------------------------------------------------------------

/// An IP address in CIDR notation together with its gateway.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IpConfig {
    /// Address with prefix length, e.g. `185.69.166.12/24`.
    pub ip: String,
    /// Gateway address.
    pub gw: String,
}

/// Public network configuration assigned to a node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublicConfig {
    /// Public IPv4 configuration.
    pub ipv4: IpConfig,
    /// Optional public IPv6 configuration.
    pub ipv6: Option<IpConfig>,
    /// Optional public domain name.
    pub domain: Option<String>,
}

/// Public configuration change notification.
///
/// `public_config` is `None` both for [`EventKind::Subscribed`] and when
/// the public configuration was removed from the node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublicConfigEvent {
    pub kind: EventKind,
    pub public_config: Option<PublicConfig>,
}

impl PublicConfigEvent {
    /// Resubscription notice.
    pub fn subscribed() -> Self {
        Self {
            kind: EventKind::Subscribed,
            public_config: None,
        }
    }

    /// A received configuration change.
    pub fn received(public_config: Option<PublicConfig>) -> Self {
        Self {
            kind: EventKind::Received,
            public_config,
        }
    }
}

// ---------------------------------------------------------------------------
// Contract events
// ---------------------------------------------------------------------------

/// A contract has been cancelled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractCancelledEvent {
    pub kind: EventKind,
    /// Contract identifier. Zero for [`EventKind::Subscribed`].
    pub contract: u64,
    /// Twin that owns the contract. Zero for [`EventKind::Subscribed`].
    pub twin_id: u32,
}

impl ContractCancelledEvent {
    /// Resubscription notice.
    pub fn subscribed() -> Self {
        Self {
            kind: EventKind::Subscribed,
            contract: 0,
            twin_id: 0,
        }
    }

    /// A received cancellation.
    pub fn received(contract: u64, twin_id: u32) -> Self {
        Self {
            kind: EventKind::Received,
            contract,
            twin_id,
        }
    }
}

/// A contract has been locked or unlocked.
///
/// On [`EventKind::Subscribed`] the stream was reconnected and events may
/// have been lost; the handler is responsible for resynchronising
/// contract lock state with the chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractLockedEvent {
    pub kind: EventKind,
    pub contract: u64,
    pub twin_id: u32,
    /// `true` when the contract was locked, `false` when unlocked.
    pub lock: bool,
}

impl ContractLockedEvent {
    /// Resubscription notice.
    pub fn subscribed() -> Self {
        Self {
            kind: EventKind::Subscribed,
            contract: 0,
            twin_id: 0,
            lock: false,
        }
    }

    /// A received lock state change.
    pub fn received(contract: u64, twin_id: u32, lock: bool) -> Self {
        Self {
            kind: EventKind::Received,
            contract,
            twin_id,
            lock,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Source of chain event subscriptions.
///
/// Each call opens an independent stream. A stream ends (the receiver
/// yields `None`) when the source shuts down; dropping the receiver
/// unsubscribes.
pub trait Events {
    /// Subscribes to public configuration changes for this node.
    fn public_config_events(&self) -> Receiver<PublicConfigEvent>;

    /// Subscribes to contract cancellations.
    fn contract_cancelled_events(&self) -> Receiver<ContractCancelledEvent>;

    /// Subscribes to contract lock/unlock changes.
    fn contract_locked_events(&self) -> Receiver<ContractLockedEvent>;
}
