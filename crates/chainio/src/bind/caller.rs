use std::{fmt, marker::PhantomData};

use alloy::{
    network::TransactionBuilder, providers::Provider, rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolInterface};
use tkb_primitives::Fork;
use tracing::trace;

use super::{
    CallOpts,
    error::{BindingError, decode_revert},
    session::CallerSession,
};

/// Read-only access to a contract: typed and raw `eth_call`s.
///
/// `E` is the contract's custom error interface, used to decode reverts.
#[derive(Debug)]
pub struct Caller<P, E> {
    address: Address,
    provider: P,
    fork: Option<Fork>,
    contract: &'static str,
    _errors: PhantomData<fn() -> E>,
}

impl<P: Clone, E> Clone for Caller<P, E> {
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

impl<P, E> Caller<P, E>
where
    P: Provider,
    E: SolInterface + fmt::Debug,
{
    /// Create a caller for the contract at `address`.
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

    /// ABI-encode `call`, execute it and decode its return value.
    pub async fn call<C: SolCall>(
        &self,
        opts: &CallOpts,
        call: &C,
    ) -> Result<C::Return, BindingError> {
        let output = self.call_raw(opts, call.abi_encode().into()).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    /// Execute an `eth_call` with the given calldata and return the raw output.
    pub async fn call_raw(&self, opts: &CallOpts, calldata: Bytes) -> Result<Bytes, BindingError> {
        let mut tx = TransactionRequest::default().with_to(self.address).with_input(calldata);
        if let Some(from) = opts.from {
            tx = tx.with_from(from);
        }

        let mut call = self.provider.call(tx);
        if let Some(block) = opts.block {
            call = call.block(block);
        }

        trace!(contract = self.contract, address = %self.address, block = ?opts.block, "eth_call");
        call.await.map_err(|err| decode_revert::<E>(err, self.fork, self.contract))
    }

    /// Bind a copy of `opts` to this caller.
    pub fn session(self, opts: CallOpts) -> CallerSession<P, E> {
        CallerSession::new(self, opts)
    }
}
