use std::fmt::Debug;

use alloy_primitives::{Address, U256};
use tkb_chainio::{
    DefaultProvider, default_provider,
    essential::EssentialContract,
    ontake::{taiko_l1::TaikoL1, taiko_l2::TaikoL2},
    pacaya::{anchor::TaikoAnchor, inbox::TaikoInbox},
    shasta::{anchor::Anchor, inbox::Inbox},
};
use tkb_config::InspectOpts;
use tkb_primitives::{Fork, TokenAmount, summary::Summary};
use tracing::debug;

fn print_section<T: Debug>(title: &str, value: &T) {
    println!("== {title}\n{value:#?}");
}

fn print_bond_balance(account: Address, balance: U256) {
    println!("== bond balance of {account}\n{balance} wei ({} TAIKO)", TokenAmount(balance));
}

/// Print the main L1 state of a fork, and its L2 anchor state if an L2 node is configured.
pub(crate) async fn run(opts: InspectOpts) -> eyre::Result<()> {
    let address = opts.contracts.inbox(opts.fork)?;
    let provider = default_provider(opts.l1.el_url.clone());

    let essential = EssentialContract::from_provider(address, provider.clone()).state().await?;
    println!("== {} at {address}\n{}", opts.fork, essential.summary());

    match opts.fork {
        Fork::Ontake => inspect_ontake(address, provider).await?,
        Fork::Pacaya => inspect_pacaya(address, provider, opts.account).await?,
        Fork::Shasta => inspect_shasta(address, provider, opts.account).await?,
    }

    let Some(l2_url) = opts.l2.el_url.clone() else {
        debug!("No L2 execution URL, skipping the anchor state");
        return Ok(());
    };

    let anchor = opts.contracts.anchor(opts.fork)?;
    let l2_provider = default_provider(l2_url);
    match opts.fork {
        Fork::Ontake => {
            let taiko_l2 = TaikoL2::from_provider(anchor, l2_provider);
            print_section("last synced L1 block", &taiko_l2.last_synced_block().await?);
        }
        Fork::Pacaya => {
            let taiko_anchor = TaikoAnchor::from_provider(anchor, l2_provider);
            print_section("last synced L1 block", &taiko_anchor.last_synced_block().await?);
        }
        Fork::Shasta => {
            let anchor = Anchor::from_provider(anchor, l2_provider);
            print_section("L1 chain id", &anchor.l1_chain_id().await?);
            print_section("block state", &anchor.get_block_state().await?);
            print_section("proposal state", &anchor.get_proposal_state().await?);
        }
    }

    Ok(())
}

async fn inspect_ontake(address: Address, provider: DefaultProvider) -> eyre::Result<()> {
    let taiko_l1 = TaikoL1::from_provider(address, provider);

    print_section("config", &taiko_l1.get_config().await?);
    let (slot_a, slot_b) = taiko_l1.get_state_variables().await?;
    print_section("slot A", &slot_a);
    print_section("slot B", &slot_b);
    print_section("last verified block", &taiko_l1.get_last_verified_block().await?);

    Ok(())
}

async fn inspect_pacaya(
    address: Address,
    provider: DefaultProvider,
    account: Option<Address>,
) -> eyre::Result<()> {
    let inbox = TaikoInbox::from_provider(address, provider);

    print_section("config", &inbox.get_pacaya_config().await?);
    print_section("stats 1", &inbox.get_stats1().await?);
    print_section("stats 2", &inbox.get_stats2().await?);
    print_section("last verified transition", &inbox.get_last_verified_transition().await?);

    if let Some(account) = account {
        print_bond_balance(account, inbox.bond_balance_of(account).await?);
    }

    Ok(())
}

async fn inspect_shasta(
    address: Address,
    provider: DefaultProvider,
    account: Option<Address>,
) -> eyre::Result<()> {
    let inbox = Inbox::from_provider(address, provider);

    print_section("config", &inbox.get_config().await?);
    print_section("oldest forced inclusion due", &inbox.is_oldest_forced_inclusion_due().await?);

    if let Some(account) = account {
        print_bond_balance(account, inbox.bond_balance(account).await?);
    }

    Ok(())
}
