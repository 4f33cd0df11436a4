use std::fmt::{Debug, Write};

use alloy::consensus::Transaction;
use alloy_primitives::hex;
use eyre::WrapErr;
use tkb_chainio::errors::decode_custom_error;
use tkb_clients::execution::ExecutionClient;
use tkb_codec::{
    ontake::unpack_tx_list_bytes,
    pacaya::{decode_propose_batch_calldata, decode_tx_list},
    shasta::{decode_propose_input, decode_prove_input, decode_proved_event, decode_proposed_event},
};
use tkb_config::DecodeCommand;
use tkb_primitives::summary::Summary;

/// Decode the payload of a `decode` subcommand into printable text.
pub(crate) async fn decode(command: DecodeCommand) -> eyre::Result<String> {
    let output = match command {
        DecodeCommand::Error { data } => decode_error(&data),
        DecodeCommand::Tx { hash, l1 } => {
            let client = ExecutionClient::new(l1.el_url);
            client.debug_revert_reason(hash).await?.decode()
        }
        DecodeCommand::Proposed { data } => render(&decode_proposed_event(&data)?),
        DecodeCommand::Proved { data } => render(&decode_proved_event(&data)?),
        DecodeCommand::ProposeInput { data } => render(&decode_propose_input(&data)?),
        DecodeCommand::ProveInput { data } => render(&decode_prove_input(&data)?),
        DecodeCommand::Calldata { data } => decode_calldata(&data)?,
    };

    Ok(output)
}

fn render<T: Debug + Summary>(value: &T) -> String {
    format!("{}\n{value:#?}", value.summary())
}

fn decode_error(data: &[u8]) -> String {
    match decode_custom_error(data) {
        Some(decoded) => decoded.to_string(),
        None => format!("unknown revert data: {}", hex::encode_prefixed(data)),
    }
}

/// Decode `proposeBatch` calldata, falling back to `proposeBlock(V2)`, along with the
/// transactions of its calldata transaction list.
fn decode_calldata(data: &[u8]) -> eyre::Result<String> {
    let (mut output, tx_list) = match decode_propose_batch_calldata(data) {
        Ok(calldata) => {
            let mut output = String::from("Pacaya batch proposal\n");
            if let Some(forced) = &calldata.forced_inclusion {
                writeln!(output, "forced inclusion: {forced:#?}")?;
            }
            writeln!(output, "params: {:#?}", calldata.params)?;
            (output, calldata.tx_list)
        }
        Err(pacaya_err) => {
            let tx_list = unpack_tx_list_bytes(data).wrap_err_with(|| {
                format!("not a Pacaya batch proposal ({pacaya_err}) nor an Ontake block proposal")
            })?;
            (String::from("Ontake block proposal\n"), tx_list)
        }
    };

    if tx_list.is_empty() {
        output.push_str("transactions: in blobs");
        return Ok(output);
    }

    let txs = decode_tx_list(&tx_list)?;
    write!(output, "transactions ({}):", txs.len())?;
    for tx in &txs {
        write!(
            output,
            "\n  {} nonce={} to={} value={}",
            tx.tx_hash(),
            tx.nonce(),
            tx.to().map_or_else(|| "create".to_owned(), |to| to.to_string()),
            tx.value()
        )?;
    }

    Ok(output)
}
