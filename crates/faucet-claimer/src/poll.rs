//! The claim loop: resolve the address once, then claim on a fixed interval.

use crate::client::ClaimApi;
use crate::error::ClaimerResult;
use crate::outcome::ClaimOutcome;
use crate::prompt::prompt_address;
use crate::store::AddressStore;
use async_trait::async_trait;
use chrono::Utc;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of the delay between claims
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Use the stored address, or ask for one and store it.
pub fn resolve_address<R: BufRead, W: Write>(
    store: &AddressStore,
    input: &mut R,
    output: &mut W,
) -> ClaimerResult<String> {
    let address = match store.load()? {
        Some(address) => {
            info!("Loaded address from {}", store.path().display());
            address
        }
        None => {
            let address = prompt_address(input, output)?;
            store.save(&address)?;
            writeln!(output, "Address saved successfully!")?;
            address
        }
    };

    writeln!(output, "Using address: {}", address)?;
    Ok(address)
}

/// Running totals of classified claims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub successes: u64,
    pub infos: u64,
    pub failures: u64,
}

impl PollStats {
    fn record(&mut self, outcome: &ClaimOutcome) {
        self.cycles += 1;
        match outcome {
            ClaimOutcome::Success(_) => self.successes += 1,
            ClaimOutcome::Info(_) => self.infos += 1,
            ClaimOutcome::Failed => self.failures += 1,
        }
    }
}

/// Repeatedly claims for one address
pub struct PollLoop<A, C> {
    api: A,
    clock: C,
    address: String,
    interval: Duration,
    stats: PollStats,
}

impl<A: ClaimApi, C: Clock> PollLoop<A, C> {
    pub fn new(api: A, clock: C, address: impl Into<String>, interval: Duration) -> Self {
        Self {
            api,
            clock,
            address: address.into(),
            interval,
            stats: PollStats::default(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Submit one claim and print its outcome
    pub async fn run_cycle<W: Write>(&mut self, output: &mut W) -> ClaimerResult<ClaimOutcome> {
        writeln!(output, "Sending request...")?;

        let response = self.api.claim(&self.address).await;
        let outcome = ClaimOutcome::classify(response.as_ref());

        writeln!(output, "{}", outcome)?;
        output.flush()?;

        self.stats.record(&outcome);
        match &outcome {
            ClaimOutcome::Failed => warn!(
                "Claim #{} for {} failed ({} failures so far)",
                self.stats.cycles, self.address, self.stats.failures
            ),
            _ => info!(
                "Claim #{} for {}: {:?}",
                self.stats.cycles, self.address, outcome
            ),
        }

        Ok(outcome)
    }

    /// Claim, sleep, repeat.
    ///
    /// With `max_cycles` set the loop returns after that many claims and does
    /// not sleep after the last one; without it the loop never returns
    /// successfully.
    pub async fn run<W: Write>(
        &mut self,
        output: &mut W,
        max_cycles: Option<u64>,
    ) -> ClaimerResult<PollStats> {
        let mut completed = 0u64;

        loop {
            if max_cycles.is_some_and(|max| completed >= max) {
                return Ok(self.stats);
            }

            if completed > 0 {
                if let Some(next) = chrono::Duration::from_std(self.interval)
                    .ok()
                    .and_then(|delay| Utc::now().checked_add_signed(delay))
                {
                    debug!("Next claim at {}", next.to_rfc3339());
                }
                self.clock.sleep(self.interval).await;
            }

            self.run_cycle(output).await?;
            completed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClaimResponse, MockClaimApi};
    use crate::error::ClaimerError;
    use mockall::Sequence;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Records requested sleeps instead of waiting
    #[derive(Clone, Default)]
    struct RecordingClock {
        sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Clock for RecordingClock {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn api_returning(response: Option<ClaimResponse>) -> MockClaimApi {
        let mut api = MockClaimApi::new();
        api.expect_claim()
            .times(1)
            .returning(move |_| response.clone());
        api
    }

    async fn single_cycle(response: Option<ClaimResponse>) -> (ClaimOutcome, String) {
        let mut poll = PollLoop::new(
            api_returning(response),
            RecordingClock::default(),
            "0xABC",
            Duration::from_secs(60),
        );
        let mut output: Vec<u8> = Vec::new();
        let outcome = poll.run_cycle(&mut output).await.unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_txhash_prints_success() {
        let (outcome, printed) = single_cycle(Some(ClaimResponse::with_msg("Txhash 0xabc"))).await;

        assert!(outcome.is_success());
        assert_eq!(printed, "Sending request...\nSuccess! Txhash 0xabc\n");
    }

    #[tokio::test]
    async fn test_plain_message_prints_info() {
        let (outcome, printed) = single_cycle(Some(ClaimResponse::with_msg("already claimed"))).await;

        assert_eq!(outcome, ClaimOutcome::Info("already claimed".to_string()));
        assert!(printed.contains("Response received: already claimed"));
        assert!(!printed.contains("Txhash"));
    }

    #[tokio::test]
    async fn test_absent_response_prints_failure() {
        let (outcome, printed) = single_cycle(None).await;

        assert_eq!(outcome, ClaimOutcome::Failed);
        assert!(printed.contains("Failed to send request or invalid response."));
    }

    #[tokio::test]
    async fn test_empty_response_prints_failure() {
        let (outcome, printed) = single_cycle(Some(ClaimResponse::default())).await;

        assert_eq!(outcome, ClaimOutcome::Failed);
        assert!(printed.contains("Failed to send request or invalid response."));
    }

    #[tokio::test]
    async fn test_run_sleeps_between_cycles_only() {
        let mut seq = Sequence::new();
        let mut api = MockClaimApi::new();
        for response in [
            None,
            Some(ClaimResponse::with_msg("already claimed")),
            Some(ClaimResponse::with_msg("Txhash 0x01")),
        ] {
            api.expect_claim()
                .withf(|address| address.to_string() == "0xABC")
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| response.clone());
        }

        let clock = RecordingClock::default();
        let mut poll = PollLoop::new(api, clock.clone(), "0xABC", Duration::from_secs(60));
        let mut output: Vec<u8> = Vec::new();

        let stats = poll.run(&mut output, Some(3)).await.unwrap();

        assert_eq!(
            stats,
            PollStats {
                cycles: 3,
                successes: 1,
                infos: 1,
                failures: 1,
            }
        );
        assert_eq!(
            *clock.sleeps.lock().unwrap(),
            vec![Duration::from_secs(60), Duration::from_secs(60)]
        );

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Sending request...").count(), 3);
        assert!(printed.ends_with("Success! Txhash 0x01\n"));
    }

    #[tokio::test]
    async fn test_zero_cycles_does_nothing() {
        let mut api = MockClaimApi::new();
        api.expect_claim().never();

        let clock = RecordingClock::default();
        let mut poll = PollLoop::new(api, clock.clone(), "0xABC", Duration::from_secs(60));
        let mut output: Vec<u8> = Vec::new();

        let stats = poll.run(&mut output, Some(0)).await.unwrap();

        assert_eq!(stats, PollStats::default());
        assert!(clock.sleeps.lock().unwrap().is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn test_first_run_prompts_and_second_run_does_not() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = AddressStore::new(dir.path().join("address.json"));

        let mut output = Vec::new();
        let first = resolve_address(&store, &mut Cursor::new("0xABC\n"), &mut output)?;
        let printed = String::from_utf8(output)?;

        assert_eq!(first, "0xABC");
        assert!(printed.starts_with(crate::prompt::ADDRESS_PROMPT));
        assert!(printed.contains("Address saved successfully!"));
        assert!(printed.ends_with("Using address: 0xABC\n"));

        let mut output = Vec::new();
        let second = resolve_address(&store, &mut Cursor::new(""), &mut output)?;

        assert_eq!(second, "0xABC");
        assert_eq!(String::from_utf8(output)?, "Using address: 0xABC\n");
        Ok(())
    }

    #[test]
    fn test_closed_input_without_record() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = AddressStore::new(dir.path().join("address.json"));

        let result = resolve_address(&store, &mut Cursor::new(""), &mut Vec::<u8>::new());

        assert!(matches!(result, Err(ClaimerError::InputClosed)));
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn test_malformed_record_is_fatal() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = AddressStore::new(dir.path().join("address.json"));
        std::fs::write(store.path(), "not json")?;

        let result = resolve_address(&store, &mut Cursor::new("0xABC\n"), &mut Vec::<u8>::new());

        assert!(matches!(result, Err(ClaimerError::Serialization(_))));
        Ok(())
    }
}
