//! Entry service: listing, seed grouping, search, detail, ingestion.

use chrono::{NaiveDate, Utc};
use promptstash_common::{AppError, AppResult, IdGenerator, config::MediaConfig};
use promptstash_db::entities::{entry, user, user::Tier};
use promptstash_db::repositories::EntryRepository;
use sea_orm::{Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::{BTreeSet, HashMap};

use crate::access::check_visibility;
use crate::metadata::{parse_metadata, prompt_words};
use crate::services::common_tag::CommonTagService;

/// Input for creating an entry.
///
/// The raw metadata blob is parsed once here; the stored entry carries the
/// structured result.
#[derive(Debug, Deserialize)]
pub struct CreateEntryInput {
    pub seed: i64,
    pub date: NaiveDate,
    pub image_path: String,
    #[serde(default = "default_visibility")]
    pub visibility: Tier,
    #[serde(default)]
    pub raw_metadata: String,
}

const fn default_visibility() -> Tier {
    Tier::Free
}

/// One image inside a group response.
///
/// Group payloads carry the thumbnail URL only; the full-resolution URL is
/// reserved for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct GroupImage {
    pub id: String,
    pub seed: i64,
    pub date: String,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
}

/// A group of entries sharing one seed, presented as variants of one
/// generation. Prompt fields come from the representative (first) entry.
#[derive(Debug, Serialize)]
pub struct EntryGroup {
    pub seed: i64,
    pub images: Vec<GroupImage>,
    pub prompt: String,
    pub negative_prompt: String,
    pub prompt_words: Vec<String>,
    pub raw_metadata: String,
    pub generation_params: Json,
}

/// Response for the entries listing.
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub total_groups: usize,
    pub groups: Vec<EntryGroup>,
}

/// Structured metadata in the detail response.
#[derive(Debug, Serialize)]
pub struct EntryMetadata {
    pub prompt: String,
    pub negative_prompt: String,
    pub generation_params: Json,
}

/// Response for a single entry detail.
#[derive(Debug, Serialize)]
pub struct EntryDetailResponse {
    pub id: String,
    pub seed: i64,
    pub date: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub metadata: EntryMetadata,
}

/// Service for entry listing, grouping, search and ingestion.
#[derive(Clone)]
pub struct EntryService {
    entry_repo: EntryRepository,
    tags: CommonTagService,
    media: MediaConfig,
    id_gen: IdGenerator,
}

impl EntryService {
    /// Create a new entry service.
    #[must_use]
    pub const fn new(
        entry_repo: EntryRepository,
        tags: CommonTagService,
        media: MediaConfig,
    ) -> Self {
        Self {
            entry_repo,
            tags,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// List a user's entries grouped by seed.
    ///
    /// The date filter is exact (directory semantics) and applied in SQL;
    /// the search term matches case-insensitively against prompt and
    /// negative prompt and combines with the date filter via AND.
    /// `total_groups` counts all matching groups before pagination.
    pub async fn list(
        &self,
        user_id: &str,
        directory: Option<NaiveDate>,
        search: Option<&str>,
        limit: Option<u64>,
        offset: u64,
    ) -> AppResult<EntryListResponse> {
        let entries = self.entry_repo.find_for_user(user_id, directory).await?;

        let matching: Vec<entry::Model> = match search.map(str::trim) {
            Some(term) if !term.is_empty() => {
                let needle = term.to_lowercase();
                entries
                    .into_iter()
                    .filter(|e| matches_search(e, &needle))
                    .collect()
            }
            _ => entries,
        };

        let mut groups = group_by_seed(matching);

        // Newest group first: order by representative (first) entry id
        // descending. The sort is stable, so groups with an equal key keep
        // ascending-id order.
        groups.sort_by(|a, b| b[0].id.cmp(&a[0].id));

        let total_groups = groups.len();

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let groups = groups
            .into_iter()
            .skip(offset)
            .take(limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX)))
            .map(|g| self.group_response(g))
            .collect();

        Ok(EntryListResponse {
            total_groups,
            groups,
        })
    }

    /// Distinct entry dates for a user, formatted `YYYY-MM-DD`.
    ///
    /// Set semantics; returned ascending for determinism.
    pub async fn directories(&self, user_id: &str) -> AppResult<Vec<String>> {
        let entries = self.entry_repo.find_for_user(user_id, None).await?;
        let dates: BTreeSet<NaiveDate> = entries.into_iter().map(|e| e.date).collect();
        Ok(dates
            .into_iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect())
    }

    /// Single entry detail with the full-resolution URL.
    ///
    /// Fails with `EntryNotFound` for an unknown id and `Forbidden` when
    /// the requester's tier does not cover the entry's visibility.
    pub async fn get_detail(
        &self,
        requester: &user::Model,
        id: &str,
    ) -> AppResult<EntryDetailResponse> {
        let entry = self.entry_repo.get_by_id(id).await?;
        check_visibility(requester, &entry)?;
        Ok(self.detail_response(entry))
    }

    /// Create an entry from a raw metadata blob.
    ///
    /// The blob is parsed into prompt, negative prompt and generation
    /// params; each prompt word increments the owner's common-tag count.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateEntryInput,
    ) -> AppResult<EntryDetailResponse> {
        if input.image_path.trim().is_empty() {
            return Err(AppError::Validation("image_path must not be empty".into()));
        }
        if input.seed < 0 {
            return Err(AppError::Validation("seed must not be negative".into()));
        }

        let meta = parse_metadata(&input.raw_metadata);

        let model = entry::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            date: Set(input.date),
            seed: Set(input.seed),
            prompt: Set(meta.prompt.clone()),
            negative_prompt: Set(meta.negative_prompt.clone()),
            generation_params: Set(serde_json::to_value(&meta.generation_params).unwrap_or_default()),
            raw_metadata: Set(input.raw_metadata),
            visibility: Set(input.visibility),
            image_path: Set(input.image_path),
            created_at: Set(Utc::now().into()),
        };

        // The entry insert and the tag bumps commit or roll back together.
        let entry_repo = self.entry_repo.clone();
        let tags = self.tags.clone();
        let owner = user_id.to_string();
        let words = meta.prompt_words.clone();

        let entry = self
            .entry_repo
            .conn()
            .transaction::<_, entry::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let entry = entry_repo.create(txn, model).await?;
                    tags.observe_on(txn, &owner, &words).await?;
                    Ok(entry)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(err) => AppError::Database(err.to_string()),
                TransactionError::Transaction(err) => err,
            })?;

        Ok(self.detail_response(entry))
    }

    fn group_response(&self, entries: Vec<entry::Model>) -> EntryGroup {
        let seed = entries[0].seed;
        let prompt = entries[0].prompt.clone();
        let negative_prompt = entries[0].negative_prompt.clone();
        let raw_metadata = entries[0].raw_metadata.clone();
        let generation_params = entries[0].generation_params.clone();

        let images = entries
            .into_iter()
            .map(|e| GroupImage {
                thumbnail_url: Some(self.thumbnail_url(&e.image_path)),
                image_url: None,
                date: e.date.format("%Y-%m-%d").to_string(),
                id: e.id,
                seed: e.seed,
            })
            .collect();

        EntryGroup {
            seed,
            images,
            prompt_words: prompt_words(&prompt),
            prompt,
            negative_prompt,
            raw_metadata,
            generation_params,
        }
    }

    fn detail_response(&self, entry: entry::Model) -> EntryDetailResponse {
        EntryDetailResponse {
            image_url: Some(self.image_url(&entry.image_path)),
            thumbnail_url: None,
            date: entry.date.format("%Y-%m-%d").to_string(),
            id: entry.id,
            seed: entry.seed,
            metadata: EntryMetadata {
                prompt: entry.prompt,
                negative_prompt: entry.negative_prompt,
                generation_params: entry.generation_params,
            },
        }
    }

    fn image_url(&self, image_path: &str) -> String {
        format!("{}/{image_path}", self.media.base_url.trim_end_matches('/'))
    }

    fn thumbnail_url(&self, image_path: &str) -> String {
        format!(
            "{}/{image_path}",
            self.media.thumbnail_base_url.trim_end_matches('/')
        )
    }
}

/// Case-insensitive substring match against the prompt fields.
fn matches_search(entry: &entry::Model, needle: &str) -> bool {
    entry.prompt.to_lowercase().contains(needle)
        || entry.negative_prompt.to_lowercase().contains(needle)
}

/// Partition entries by seed, preserving first-seen order of seeds and
/// input order within each group (id ascending for a sorted input).
fn group_by_seed(entries: Vec<entry::Model>) -> Vec<Vec<entry::Model>> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<Vec<entry::Model>> = Vec::new();

    for entry in entries {
        match index.get(&entry.seed) {
            Some(&i) => groups[i].push(entry),
            None => {
                index.insert(entry.seed, groups.len());
                groups.push(vec![entry]);
            }
        }
    }

    groups
}
