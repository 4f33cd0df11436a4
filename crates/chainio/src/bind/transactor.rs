use std::{fmt, marker::PhantomData};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolInterface};
use tkb_primitives::Fork;
use tracing::debug;

use super::{
    TransactOpts,
    error::{BindingError, decode_revert},
    session::TransactorSession,
};

/// Write access to a contract: typed and raw transactions, and plain value transfers.
///
/// The provider is responsible for signing, so it must carry a wallet or talk to a node that
/// manages the sender's keys.
#[derive(Debug)]
pub struct Transactor<P, E> {
    address: Address,
    provider: P,
    fork: Option<Fork>,
    contract: &'static str,
    _errors: PhantomData<fn() -> E>,
}

impl<P: Clone, E> Clone for Transactor<P, E> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            provider: self.provider.clone(),
            fork: self.fork,
            contract: self.contract,
            _errors: PhantomData,
        }
    }
}

impl<P, E> Transactor<P, E>
where
    P: Provider,
    E: SolInterface + fmt::Debug,
{
    /// Create a transactor for the contract at `address`.
    pub const fn new(
        address: Address,
        provider: P,
        fork: Option<Fork>,
        contract: &'static str,
    ) -> Self {
        Self { address, provider, fork, contract, _errors: PhantomData }
    }

    /// Returns the address of the contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// ABI-encode `call` and submit it as a transaction to the contract.
    pub async fn transact<C: SolCall>(
        &self,
        opts: &TransactOpts,
        call: &C,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transact_raw(opts, call.abi_encode().into()).await
    }

    /// Submit a transaction to the contract with the given calldata.
    ///
    /// Reverts surfaced during gas estimation are decoded like call reverts.
    pub async fn transact_raw(
        &self,
        opts: &TransactOpts,
        calldata: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        let tx =
            opts.apply(TransactionRequest::default().with_to(self.address).with_input(calldata));

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|err| decode_revert::<E>(err, self.fork, self.contract))?;

        debug!(contract = self.contract, tx_hash = %pending.tx_hash(), "Transaction sent");
        Ok(pending)
    }

    /// Send a plain value transfer to the contract, hitting its receive or fallback function.
    pub async fn transfer(
        &self,
        opts: &TransactOpts,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transact_raw(opts, Bytes::new()).await
    }

    /// Bind a copy of `opts` to this transactor.
    pub fn session(self, opts: TransactOpts) -> TransactorSession<P, E> {
        TransactorSession::new(self, opts)
    }
}
