//! Runs the three tandem-fetch demonstrations in order: a parallel fan-out,
//! a fetch raced against a deadline, and a paced count.

mod telemetry;

use std::time::Duration;

use anyhow::Context;
use futures_util::StreamExt;
use tandem_fetch::{
    CancellationSignal, FetchOutcome, FetchRequest, Fetcher, HttpClient, PacedOptions,
    ParallelFetcher, ReqwestClient, paced,
};
use tracing::{debug, info};

const POSTS: [&str; 3] = [
    "https://jsonplaceholder.typicode.com/posts/1",
    "https://jsonplaceholder.typicode.com/posts/2",
    "https://jsonplaceholder.typicode.com/posts/3",
];

/// Fixed inputs for one run of the demo.
#[derive(Debug, Clone)]
struct DemoPlan {
    targets: Vec<FetchRequest>,
    cancel_target: FetchRequest,
    deadline: Duration,
    paced: PacedOptions,
}

impl DemoPlan {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            targets: FetchRequest::many(POSTS).context("invalid demo target")?,
            cancel_target: FetchRequest::new(POSTS[0]).context("invalid demo target")?,
            deadline: Duration::from_millis(500),
            paced: PacedOptions::default(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry()?;

    let plan = DemoPlan::new()?;
    let client = ReqwestClient::new().context("failed to build HTTP client")?;
    let parallel = ParallelFetcher::new(Fetcher::new(client));

    info!(targets = plan.targets.len(), "starting fan-out");
    for result in parallel.fetch_all(&plan.targets).await {
        println!("{result}");
    }

    run_with_deadline(parallel.fetcher(), &plan).await;

    let mut sequence = paced(plan.paced);
    while let Some(value) = sequence.next().await {
        println!("{value}");
    }

    Ok(())
}

async fn run_with_deadline<C: HttpClient>(fetcher: &Fetcher<C>, plan: &DemoPlan) {
    let signal = CancellationSignal::new();
    let _deadline = signal.cancel_after(plan.deadline);

    let mut fetch = fetcher.cancellable(plan.cancel_target.clone(), signal);
    match fetch.run().await {
        FetchOutcome::Cancelled => println!("Task was canceled."),
        FetchOutcome::Completed(result) => {
            debug!(url = fetch.request().url(), bytes = result.as_text().len(), "deadline fetch completed");
        }
    }
}
