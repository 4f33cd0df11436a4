use alloy_primitives::Address;
use clap::Parser;
use tkb_primitives::Fork;
use url::Url;

/// L1-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct L1Opts {
    /// The URL of the L1 execution client HTTP connection
    #[clap(long = "l1.el-url", env = "TKB_L1_EXECUTION_URL", id = "l1-el-url")]
    pub el_url: Url,
    /// The URL of the L1 execution client WebSocket connection, required for live events
    #[clap(long = "l1.el-ws-url", env = "TKB_L1_EXECUTION_WS_URL", id = "l1-el-ws-url")]
    pub el_ws_url: Option<Url>,
}

/// L2-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct L2Opts {
    /// The URL of the L2 execution client (taiko-geth) HTTP connection
    #[clap(long = "l2.el-url", env = "TKB_L2_EXECUTION_URL", id = "l2-el-url")]
    pub el_url: Option<Url>,
}

/// The contract addresses of every fork. Only the ones of the selected fork are required.
#[derive(Debug, Clone, Default, Parser)]
pub struct ContractAddresses {
    /// The address of the Ontake L1 `TaikoL1.sol`
    #[clap(long = "contracts.taiko-l1", env = "TKB_TAIKO_L1")]
    pub taiko_l1: Option<Address>,
    /// The address of the Ontake L2 `TaikoL2.sol`
    #[clap(long = "contracts.taiko-l2", env = "TKB_TAIKO_L2")]
    pub taiko_l2: Option<Address>,
    /// The address of the Pacaya L1 `TaikoInbox.sol`
    #[clap(long = "contracts.taiko-inbox", env = "TKB_TAIKO_INBOX")]
    pub taiko_inbox: Option<Address>,
    /// The address of the Pacaya L2 `TaikoAnchor.sol`
    #[clap(long = "contracts.taiko-anchor", env = "TKB_TAIKO_ANCHOR")]
    pub taiko_anchor: Option<Address>,
    /// The address of the Shasta L1 `Inbox.sol`
    #[clap(long = "contracts.shasta-inbox", env = "TKB_SHASTA_INBOX")]
    pub shasta_inbox: Option<Address>,
    /// The address of the Shasta L2 `Anchor.sol`
    #[clap(long = "contracts.shasta-anchor", env = "TKB_SHASTA_ANCHOR")]
    pub shasta_anchor: Option<Address>,
}

/// A contract address required by a command was not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("missing {contract} address for {fork}, set --contracts.{flag}")]
pub struct MissingAddress {
    /// The fork the contract belongs to.
    pub fork: Fork,
    /// The name of the contract.
    pub contract: &'static str,
    /// The flag that sets the address.
    pub flag: &'static str,
}

impl ContractAddresses {
    /// Returns the address of the L1 rollup contract of `fork`.
    pub fn inbox(&self, fork: Fork) -> Result<Address, MissingAddress> {
        let (address, contract, flag) = match fork {
            Fork::Ontake => (self.taiko_l1, "TaikoL1", "taiko-l1"),
            Fork::Pacaya => (self.taiko_inbox, "TaikoInbox", "taiko-inbox"),
            Fork::Shasta => (self.shasta_inbox, "Inbox", "shasta-inbox"),
        };
        address.ok_or(MissingAddress { fork, contract, flag })
    }

    /// Returns the address of the L2 anchor contract of `fork`.
    pub fn anchor(&self, fork: Fork) -> Result<Address, MissingAddress> {
        let (address, contract, flag) = match fork {
            Fork::Ontake => (self.taiko_l2, "TaikoL2", "taiko-l2"),
            Fork::Pacaya => (self.taiko_anchor, "TaikoAnchor", "taiko-anchor"),
            Fork::Shasta => (self.shasta_anchor, "Anchor", "shasta-anchor"),
        };
        address.ok_or(MissingAddress { fork, contract, flag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_resolved_per_fork() {
        let contracts = ContractAddresses {
            taiko_inbox: Some(Address::repeat_byte(1)),
            ..Default::default()
        };

        assert_eq!(contracts.inbox(Fork::Pacaya), Ok(Address::repeat_byte(1)));

        let err = contracts.inbox(Fork::Shasta).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing Inbox address for shasta, set --contracts.shasta-inbox"
        );
        assert!(contracts.anchor(Fork::Pacaya).is_err());
    }
}
