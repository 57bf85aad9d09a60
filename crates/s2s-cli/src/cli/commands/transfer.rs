//! `s2s transfer` – one download-then-upload transfer from flags.

use anyhow::Result;
use s2s_core::{transfer, CurlTransport};

use crate::cli::TransferArgs;

pub async fn run_transfer(transport: &CurlTransport, args: &TransferArgs) -> Result<()> {
    let params = args.to_params();
    let result = transfer::execute_item(transport, &params, 0).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
