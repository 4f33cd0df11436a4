use std::fmt;

use alloy::providers::Provider;
use alloy_primitives::Address;
use alloy_sol_types::SolInterface;
use tkb_primitives::Fork;

use crate::essential::IEssentialContract::{self, IEssentialContractInstance};

mod caller;
pub use caller::Caller;

mod error;
pub use error::BindingError;

mod filterer;
pub use filterer::{DecodedLog, Filterer, LogIterator};

mod opts;
pub use opts::{CallOpts, FilterOpts, TransactOpts, Topics, WatchOpts};

mod session;
pub use session::{CallerSession, Session, TransactorSession};

mod transactor;
pub use transactor::Transactor;

/// A typed wrapper over a deployed contract.
///
/// Every role is derived from the address, the provider and the contract's custom error
/// interface, which is used to decode reverts before falling back to every known interface.
pub trait Binding {
    /// The provider the binding talks to.
    type Provider: Provider + Clone;
    /// The custom error interface of the contract.
    type Errors: SolInterface + fmt::Debug;

    /// The name of the contract.
    const NAME: &'static str;
    /// The fork the contract belongs to, if any.
    const FORK: Option<Fork>;

    /// Returns the address of the contract.
    fn address(&self) -> Address;

    /// Returns the provider of the binding.
    fn provider(&self) -> &Self::Provider;

    /// Returns read-only access to the contract.
    fn caller(&self) -> Caller<Self::Provider, Self::Errors> {
        Caller::new(self.address(), self.provider().clone(), Self::FORK, Self::NAME)
    }

    /// Returns write access to the contract.
    fn transactor(&self) -> Transactor<Self::Provider, Self::Errors> {
        Transactor::new(self.address(), self.provider().clone(), Self::FORK, Self::NAME)
    }

    /// Returns event access to the contract.
    fn filterer(&self) -> Filterer<Self::Provider> {
        Filterer::new(self.address(), self.provider().clone())
    }

    /// Returns a session with both roles and their preset options.
    fn session(
        &self,
        call_opts: CallOpts,
        transact_opts: TransactOpts,
    ) -> Session<Self::Provider, Self::Errors> {
        Session::new(self.caller(), call_opts, self.transactor(), transact_opts)
    }

    /// Returns the `EssentialContract` interface (ownership, pausing, upgrades) at the same
    /// address.
    fn essential(&self) -> IEssentialContractInstance<Self::Provider> {
        IEssentialContract::new(self.address(), self.provider().clone())
    }
}

/// Declare a newtype wrapper over a generated contract instance and implement [`Binding`] for it.
///
/// The wrapper derefs to the instance, so every generated method stays available.
macro_rules! contract_binding {
    (
        $(#[$attr:meta])*
        $name:ident($($instance:ident)::+), errors: $errors:ty, fork: $fork:expr $(,)?
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, ::derive_more::Deref)]
        pub struct $name<P = $crate::DefaultProvider>($($instance)::+<P>);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "` at the given address, over HTTP.")]
            pub fn new<U: Into<::url::Url>>(
                el_client_url: U,
                address: ::alloy_primitives::Address,
            ) -> Self {
                Self($($instance)::+::new(address, $crate::default_provider(el_client_url)))
            }
        }

        impl<P: ::alloy::providers::Provider + Clone> $name<P> {
            #[doc = concat!("Create a new `", stringify!($name), "` at the given address, with any provider.")]
            pub fn from_provider(address: ::alloy_primitives::Address, provider: P) -> Self {
                Self($($instance)::+::new(address, provider))
            }
        }

        impl<P: ::alloy::providers::Provider + Clone> $crate::bind::Binding for $name<P> {
            type Provider = P;
            type Errors = $errors;

            const NAME: &'static str = stringify!($name);
            const FORK: Option<::tkb_primitives::Fork> = $fork;

            fn address(&self) -> ::alloy_primitives::Address {
                *self.0.address()
            }

            fn provider(&self) -> &P {
                self.0.provider()
            }
        }
    };
}
pub(crate) use contract_binding;
