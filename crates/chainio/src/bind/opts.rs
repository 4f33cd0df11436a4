use alloy::{eips::BlockId, rpc::types::TransactionRequest};
use alloy_primitives::{Address, B256, U256};

/// Options for read-only calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// The block to execute the call at. Latest if `None`.
    pub block: Option<BlockId>,
    /// The sender of the call.
    pub from: Option<Address>,
}

impl CallOpts {
    /// Execute calls at the given block.
    pub fn at_block(block: impl Into<BlockId>) -> Self {
        Self { block: Some(block.into()), from: None }
    }

    /// Set the sender of the call.
    pub const fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }
}

/// Options for state-changing transactions.
///
/// Every field left as `None` is filled by the provider's fillers (nonce, gas, fees, chain id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactOpts {
    /// The sender of the transaction. Must be known to the provider's wallet.
    pub from: Option<Address>,
    /// The amount of wei sent along with the transaction.
    pub value: Option<U256>,
    /// The gas limit.
    pub gas_limit: Option<u64>,
    /// The EIP-1559 max fee per gas.
    pub max_fee_per_gas: Option<u128>,
    /// The EIP-1559 max priority fee per gas.
    pub max_priority_fee_per_gas: Option<u128>,
    /// The nonce.
    pub nonce: Option<u64>,
}

impl TransactOpts {
    /// Send `value` wei along with the transaction.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the sender of the transaction.
    pub const fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Copy every set option onto the given request, leaving the others untouched.
    pub fn apply(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if let Some(from) = self.from {
            tx.from = Some(from);
        }
        if let Some(value) = self.value {
            tx.value = Some(value);
        }
        if let Some(gas) = self.gas_limit {
            tx.gas = Some(gas);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            tx.max_fee_per_gas = Some(max_fee);
        }
        if let Some(max_priority_fee) = self.max_priority_fee_per_gas {
            tx.max_priority_fee_per_gas = Some(max_priority_fee);
        }
        if let Some(nonce) = self.nonce {
            tx.nonce = Some(nonce);
        }
        tx
    }
}

/// Range options for historical log queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOpts {
    /// The first block of the range, inclusive.
    pub start: u64,
    /// The last block of the range, inclusive. Latest if `None`.
    pub end: Option<u64>,
}

impl FilterOpts {
    /// Query the inclusive `[start, end]` range.
    pub const fn range(start: u64, end: u64) -> Self {
        Self { start, end: Some(end) }
    }
}

/// Options for live log subscriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// Replay the events emitted since this block before following new ones.
    pub start: Option<u64>,
}

/// Constraints on the indexed event parameters (topics 1 to 3).
///
/// An empty set matches any value. Multiple values in a set are OR-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topics {
    /// Accepted values of the first indexed parameter.
    pub topic1: Vec<B256>,
    /// Accepted values of the second indexed parameter.
    pub topic2: Vec<B256>,
    /// Accepted values of the third indexed parameter.
    pub topic3: Vec<B256>,
}

impl Topics {
    /// Match any value of every indexed parameter.
    pub fn any() -> Self {
        Self::default()
    }

    /// Constrain the first indexed parameter.
    pub fn with_topic1(mut self, values: impl IntoIterator<Item = impl Into<B256>>) -> Self {
        self.topic1 = values.into_iter().map(Into::into).collect();
        self
    }

    /// Constrain the second indexed parameter.
    pub fn with_topic2(mut self, values: impl IntoIterator<Item = impl Into<B256>>) -> Self {
        self.topic2 = values.into_iter().map(Into::into).collect();
        self
    }

    /// Constrain the third indexed parameter.
    pub fn with_topic3(mut self, values: impl IntoIterator<Item = impl Into<B256>>) -> Self {
        self.topic3 = values.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transact_opts_only_override_set_fields() {
        let base = TransactionRequest {
            gas: Some(21_000),
            nonce: Some(7),
            value: Some(U256::from(1)),
            ..Default::default()
        };

        let opts = TransactOpts { value: Some(U256::from(5)), ..Default::default() };
        let tx = opts.apply(base);

        assert_eq!(tx.value, Some(U256::from(5)));
        assert_eq!(tx.gas, Some(21_000));
        assert_eq!(tx.nonce, Some(7));
        assert!(tx.from.is_none());
        // the options are left untouched
        assert_eq!(opts.value, Some(U256::from(5)));
    }

    #[test]
    fn topics_accept_addresses() {
        let addr = Address::repeat_byte(0xaa);
        let topics = Topics::any().with_topic2([addr.into_word()]);
        assert!(topics.topic1.is_empty());
        assert_eq!(topics.topic2, vec![addr.into_word()]);
    }
}
