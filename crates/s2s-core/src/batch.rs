//! Run the transfer for every item of a batch.
//!
//! Keeps up to `max_concurrent` transfers in flight; when one finishes the
//! next item starts. Items share nothing but the transport handle, and one
//! item's failure never cancels the others.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::transfer::{self, TransferError, TransferResult};
use crate::transport::HttpTransport;

/// Outcome of one batch item: a result record, or the error it raised.
pub type ItemOutcome = Result<TransferResult, TransferError>;

/// Runs all `items`, returning one outcome per item in item order.
pub async fn run_batch<T>(
    transport: Arc<T>,
    items: Vec<Map<String, Value>>,
    max_concurrent: usize,
) -> Vec<ItemOutcome>
where
    T: HttpTransport + 'static,
{
    let max_concurrent = max_concurrent.max(1);
    let total = items.len();
    let items = Arc::new(items);
    let mut outcomes: Vec<Option<ItemOutcome>> = (0..total).map(|_| None).collect();
    let mut join_set = tokio::task::JoinSet::new();
    let mut next = 0usize;

    loop {
        while join_set.len() < max_concurrent && next < total {
            let index = next;
            next += 1;
            let transport = Arc::clone(&transport);
            let items = Arc::clone(&items);
            join_set.spawn(async move {
                let outcome =
                    transfer::execute_item(transport.as_ref(), items.as_slice(), index).await;
                (index, outcome)
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        let (index, outcome) = match joined {
            Ok(done) => done,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        match &outcome {
            Ok(result) if result.is_success() => {
                tracing::debug!(item = index, "batch item transferred")
            }
            Ok(_) => tracing::debug!(item = index, "batch item reported an error result"),
            Err(e) => tracing::warn!(item = index, "batch item raised: {}", e),
        }
        outcomes[index] = Some(outcome);
    }

    outcomes.into_iter().flatten().collect()
}
