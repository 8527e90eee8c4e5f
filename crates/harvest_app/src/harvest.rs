//! The per-keyword harvesting loop: drives the search client with credential
//! rotation and persists both artifacts after every page.

use std::collections::HashSet;
use std::time::Duration;

use harvest_core::{apply_page, next_key, ChannelRegistry, HarvestState, PageDisposition};
use harvest_engine::{PageOutcome, SearchApi};
use harvest_logging::{harvest_error, harvest_info, harvest_warn};

use crate::persistence::{HarvestFiles, StoreError};

/// Why a whole run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every keyword reached a terminal outcome for this run.
    Completed,
    /// Every configured API key hit its quota; the caller shuts down.
    CredentialsExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordOutcome {
    AlreadyCompleted,
    Completed,
    /// A non-quota failure; the keyword resumes from its saved cursor on a
    /// future run.
    Blocked,
    CredentialsExhausted,
}

pub struct Harvester<'a, S> {
    client: &'a S,
    files: &'a HarvestFiles,
    max_results: u64,
    page_delay: Duration,
}

impl<'a, S: SearchApi> Harvester<'a, S> {
    pub fn new(
        client: &'a S,
        files: &'a HarvestFiles,
        max_results: u64,
        page_delay: Duration,
    ) -> Self {
        Self {
            client,
            files,
            max_results,
            page_delay,
        }
    }

    /// Processes each keyword to a terminal outcome, strictly in order.
    ///
    /// Quota exhaustion of the whole pool stops the run: the keys are shared
    /// across keywords, so no later keyword could make progress either.
    pub async fn run(
        &self,
        keywords: &[String],
        api_keys: &[String],
        state: &mut HarvestState,
        registry: &mut ChannelRegistry,
    ) -> Result<RunOutcome, StoreError> {
        for keyword in keywords {
            let outcome = self
                .harvest_keyword(keyword, api_keys, state, registry)
                .await?;
            if outcome == KeywordOutcome::CredentialsExhausted {
                return Ok(RunOutcome::CredentialsExhausted);
            }
        }
        Ok(RunOutcome::Completed)
    }

    async fn harvest_keyword(
        &self,
        keyword: &str,
        api_keys: &[String],
        state: &mut HarvestState,
        registry: &mut ChannelRegistry,
    ) -> Result<KeywordOutcome, StoreError> {
        let mut progress = state.get(keyword).cloned().unwrap_or_default();
        if progress.completed {
            harvest_info!("keyword '{keyword}' already completed, skipping");
            return Ok(KeywordOutcome::AlreadyCompleted);
        }

        // Exhaustion marks are scoped to this keyword's loop; every keyword
        // starts back at index 0 with a clean slate.
        let mut key_index = 0usize;
        let mut exhausted: HashSet<usize> = HashSet::new();

        loop {
            let api_key = api_keys[key_index].as_str();
            harvest_info!(
                "keyword '{keyword}': fetching page with key index {key_index} (cursor {:?})",
                progress.last_page_token
            );

            let outcome = self
                .client
                .search_page(keyword, api_key, progress.last_page_token.as_deref())
                .await;

            match outcome {
                PageOutcome::Page(page) => {
                    let disposition = apply_page(
                        &mut progress,
                        registry,
                        &page.channel_ids,
                        page.item_count,
                        page.next_page_token,
                        self.max_results,
                    );
                    state.insert(keyword.to_string(), progress.clone());
                    self.persist(state, registry)?;
                    harvest_info!(
                        "keyword '{keyword}': {} items fetched so far, {} unique channels",
                        progress.fetched_count,
                        registry.len()
                    );

                    match disposition {
                        PageDisposition::Completed => {
                            harvest_info!(
                                "keyword '{keyword}' completed with {} items",
                                progress.fetched_count
                            );
                            return Ok(KeywordOutcome::Completed);
                        }
                        PageDisposition::MorePages => {
                            // Small delay to be gentle with the API.
                            tokio::time::sleep(self.page_delay).await;
                        }
                    }
                }
                PageOutcome::QuotaExhausted => {
                    exhausted.insert(key_index);
                    match next_key(api_keys, &exhausted, key_index) {
                        Some((idx, _)) => {
                            harvest_warn!(
                                "quota exhausted on key index {key_index}, switching to index {idx}"
                            );
                            key_index = idx;
                            // Retry the same cursor with the new key.
                        }
                        None => {
                            state.insert(keyword.to_string(), progress.clone());
                            self.persist(state, registry)?;
                            return Ok(KeywordOutcome::CredentialsExhausted);
                        }
                    }
                }
                PageOutcome::Failed(failure) => {
                    state.insert(keyword.to_string(), progress.clone());
                    self.persist(state, registry)?;
                    harvest_error!(
                        "keyword '{keyword}': search failed ({}): {}; leaving it for a future run",
                        failure.kind,
                        failure.message
                    );
                    return Ok(KeywordOutcome::Blocked);
                }
            }
        }
    }

    fn persist(&self, state: &HarvestState, registry: &ChannelRegistry) -> Result<(), StoreError> {
        self.files.save_state(state)?;
        self.files.save_channels(registry)
    }
}
