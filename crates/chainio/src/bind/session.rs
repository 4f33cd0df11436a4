use std::fmt;

use alloy::{
    network::Ethereum,
    providers::{PendingTransactionBuilder, Provider},
};
use alloy_primitives::Bytes;
use alloy_sol_types::{SolCall, SolInterface};

use super::{BindingError, CallOpts, Caller, TransactOpts, Transactor};

/// A [`Caller`] with preset [`CallOpts`].
#[derive(Debug)]
pub struct CallerSession<P, E> {
    caller: Caller<P, E>,
    opts: CallOpts,
}

impl<P, E> CallerSession<P, E>
where
    P: Provider,
    E: SolInterface + fmt::Debug,
{
    /// Bind `opts` to `caller`.
    pub const fn new(caller: Caller<P, E>, opts: CallOpts) -> Self {
        Self { caller, opts }
    }

    /// Returns the preset call options.
    pub const fn opts(&self) -> &CallOpts {
        &self.opts
    }

    /// See [`Caller::call`].
    pub async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return, BindingError> {
        self.caller.call(&self.opts, call).await
    }

    /// See [`Caller::call_raw`].
    pub async fn call_raw(&self, calldata: Bytes) -> Result<Bytes, BindingError> {
        self.caller.call_raw(&self.opts, calldata).await
    }
}

/// A [`Transactor`] with preset [`TransactOpts`].
#[derive(Debug)]
pub struct TransactorSession<P, E> {
    transactor: Transactor<P, E>,
    opts: TransactOpts,
}

impl<P, E> TransactorSession<P, E>
where
    P: Provider,
    E: SolInterface + fmt::Debug,
{
    /// Bind `opts` to `transactor`.
    pub const fn new(transactor: Transactor<P, E>, opts: TransactOpts) -> Self {
        Self { transactor, opts }
    }

    /// Returns the preset transaction options.
    pub const fn opts(&self) -> &TransactOpts {
        &self.opts
    }

    /// See [`Transactor::transact`].
    pub async fn transact<C: SolCall>(
        &self,
        call: &C,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transact(&self.opts, call).await
    }

    /// See [`Transactor::transact_raw`].
    pub async fn transact_raw(
        &self,
        calldata: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transact_raw(&self.opts, calldata).await
    }

    /// See [`Transactor::transfer`].
    pub async fn transfer(&self) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transfer(&self.opts).await
    }
}

/// Both a [`CallerSession`] and a [`TransactorSession`] over the same contract.
#[derive(Debug)]
pub struct Session<P, E> {
    caller: CallerSession<P, E>,
    transactor: TransactorSession<P, E>,
}

impl<P, E> Session<P, E>
where
    P: Provider,
    E: SolInterface + fmt::Debug,
{
    /// Bind both option sets to the given roles.
    pub const fn new(
        caller: Caller<P, E>,
        call_opts: CallOpts,
        transactor: Transactor<P, E>,
        transact_opts: TransactOpts,
    ) -> Self {
        Self {
            caller: CallerSession::new(caller, call_opts),
            transactor: TransactorSession::new(transactor, transact_opts),
        }
    }

    /// Returns the read-only half of the session.
    pub const fn caller(&self) -> &CallerSession<P, E> {
        &self.caller
    }

    /// Returns the write half of the session.
    pub const fn transactor(&self) -> &TransactorSession<P, E> {
        &self.transactor
    }

    /// See [`Caller::call`].
    pub async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return, BindingError> {
        self.caller.call(call).await
    }

    /// See [`Caller::call_raw`].
    pub async fn call_raw(&self, calldata: Bytes) -> Result<Bytes, BindingError> {
        self.caller.call_raw(calldata).await
    }

    /// See [`Transactor::transact`].
    pub async fn transact<C: SolCall>(
        &self,
        call: &C,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transact(call).await
    }

    /// See [`Transactor::transact_raw`].
    pub async fn transact_raw(
        &self,
        calldata: Bytes,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transact_raw(calldata).await
    }

    /// See [`Transactor::transfer`].
    pub async fn transfer(&self) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.transactor.transfer().await
    }
}
