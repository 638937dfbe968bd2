// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, Span};

use crate::assembler::merge::merge_records;
use crate::assembler::ordering::{effective_atom_features, ordered_score_keys};
use crate::asset::Asset;
use crate::config::{FeatureRequest, RuntimeOptions};
use crate::errors::{AssemblyError, ExtractionError, RegistryError};
use crate::observability::messages::assembler::{
    AssemblyCompleted, AssemblyStarted, CleanupCompleted,
};
use crate::observability::messages::extractor::{
    ExtractionCompleted, ExtractionFailed, ExtractorResolved,
};
use crate::observability::messages::StructuredLog;
use crate::registry::ExtractorRegistry;
use crate::store::ResultStore;
use crate::traits::{ExtractorContext, FeatureExtractor};
use crate::types::{RawResultSet, ScoreKey, ScoreRecord};

/// Everything an assembler shares with the extractors it builds.
#[derive(Clone)]
pub struct AssemblyContext {
    pub options: RuntimeOptions,
    pub result_store: Arc<dyn ResultStore>,
    /// Parent span for every event the assembly and its extractors emit.
    pub span: Span,
}

impl AssemblyContext {
    pub fn new(options: RuntimeOptions, result_store: Arc<dyn ResultStore>) -> Self {
        Self {
            options,
            result_store,
            span: tracing::info_span!("feature_assembly"),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl fmt::Debug for AssemblyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyContext")
            .field("options", &self.options)
            .field("result_store", &self.result_store.name())
            .finish()
    }
}

/// Lifecycle of a [`FeatureAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Built, `run` not yet completed.
    Configured,
    /// `run` completed; records are available.
    Assembled,
    /// A cleanup operation ran last.
    Cleaned,
}

/// Coordinates feature extractors and merges their per-asset output.
///
/// The assembler does no extraction, retrying or caching of its own. For each
/// requested type it resolves a variant, builds an instance bound to the
/// shared assets and runtime context, runs it, and merges what it returns.
///
/// # Examples
///
/// ```no_run
/// use feature_assembler::assembler::{AssemblyContext, FeatureAssembler};
/// use feature_assembler::asset::Asset;
/// use feature_assembler::config::{FeatureRequest, RuntimeOptions};
/// use feature_assembler::registry::ExtractorRegistry;
/// use feature_assembler::store::InMemoryResultStore;
/// use std::sync::Arc;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let request = FeatureRequest::new().with_atoms("VMAF_feature", ["vif", "adm"]);
/// let assets = vec![Asset::new("demo", 0, 0, "ref.yuv", "dis.yuv", 1920, 1080)];
/// let context = AssemblyContext::new(RuntimeOptions::default(), Arc::new(InMemoryResultStore::new()));
///
/// let mut assembler = FeatureAssembler::new(request, assets, ExtractorRegistry::builtin(), context);
/// let records = assembler.run().await?;
/// println!("{:?}", records[0]);
/// # Ok(())
/// # }
/// ```
pub struct FeatureAssembler {
    request: FeatureRequest,
    assets: Arc<[Asset]>,
    registry: ExtractorRegistry,
    context: AssemblyContext,
    raw_results: HashMap<String, RawResultSet>,
    records: Option<Vec<ScoreRecord>>,
    state: AssemblerState,
}

impl FeatureAssembler {
    pub fn new(
        request: FeatureRequest,
        assets: impl Into<Arc<[Asset]>>,
        registry: ExtractorRegistry,
        context: AssemblyContext,
    ) -> Self {
        Self {
            request,
            assets: assets.into(),
            registry,
            context,
            raw_results: HashMap::new(),
            records: None,
            state: AssemblerState::Configured,
        }
    }

    /// Run every requested extractor and merge the results.
    ///
    /// Returns one record per asset, in asset order. Each record's key set
    /// equals [`ordered_score_key_list`](Self::ordered_score_key_list).
    pub async fn run(&mut self) -> Result<&[ScoreRecord], AssemblyError> {
        let span = self.context.span.clone();
        let started = Instant::now();

        span.in_scope(|| {
            AssemblyStarted {
                type_count: self.request.len(),
                asset_count: self.assets.len(),
                max_concurrency: self.context.options.max_concurrency,
            }
            .log()
        });

        let extracted = self.extract_all().instrument(span.clone()).await?;
        self.raw_results.extend(extracted);

        let records = span.in_scope(|| {
            merge_records(
                &self.request,
                &self.registry,
                &self.raw_results,
                self.assets.len(),
            )
        })?;

        span.in_scope(|| {
            AssemblyCompleted {
                record_count: records.len(),
                key_count: records.first().map_or(0, |record| record.len()),
                duration: started.elapsed(),
            }
            .log()
        });

        self.state = AssemblerState::Assembled;
        Ok(self.records.insert(records).as_slice())
    }

    /// Resolve every requested type, then run the extractors.
    ///
    /// Resolution happens up front so a configuration defect surfaces before
    /// any extractor does work.
    async fn extract_all(&self) -> Result<Vec<(String, RawResultSet)>, AssemblyError> {
        let mut jobs = Vec::with_capacity(self.request.len());

        for (type_tag, selection) in self.request.iter() {
            let variant = self.registry.resolve(type_tag)?;
            let resolved = ExtractorResolved {
                type_tag,
                version: variant.version(),
                atom_count: effective_atom_features(selection, variant).len(),
            };
            resolved.log();

            let span = resolved.span("run");
            let extractor = variant.instantiate(self.extractor_context(span.clone()));
            jobs.push((type_tag.clone(), extractor, span));
        }

        let max_concurrency = self.context.options.max_concurrency;
        if max_concurrency <= 1 || jobs.len() <= 1 {
            let mut extracted = Vec::with_capacity(jobs.len());
            for (type_tag, extractor, span) in jobs {
                extracted.push(run_extractor(type_tag, extractor).instrument(span).await?);
            }
            return Ok(extracted);
        }

        let semaphore = Arc::new(Semaphore::new(max_concurrency));
        let mut tasks = JoinSet::new();
        let job_count = jobs.len();

        for (index, (type_tag, extractor, span)) in jobs.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire().await?;
                    let outcome = run_extractor(type_tag, extractor).await?;
                    Ok::<_, AssemblyError>((index, outcome))
                }
                .instrument(span),
            );
        }

        let mut extracted = Vec::with_capacity(job_count);
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(AssemblyError::from).and_then(|outcome| outcome) {
                Ok(done) => extracted.push(done),
                Err(e) => {
                    // No extractor may keep writing once the caller sees the failure.
                    tasks.shutdown().await;
                    return Err(e);
                }
            }
        }

        extracted.sort_by_key(|(index, _)| *index);
        Ok(extracted.into_iter().map(|(_, outcome)| outcome).collect())
    }

    fn extractor_context(&self, span: Span) -> ExtractorContext {
        ExtractorContext::new(
            self.assets.clone(),
            span,
            self.context.options.clone(),
            self.context.result_store.clone(),
        )
    }

    fn fresh_instances(&self) -> Result<Vec<(&str, Arc<dyn FeatureExtractor>)>, RegistryError> {
        let mut instances = Vec::with_capacity(self.request.len());
        for type_tag in self.request.requested_types() {
            let variant = self.registry.resolve(type_tag)?;
            let context = self.extractor_context(self.context.span.clone());
            instances.push((type_tag, variant.instantiate(context)));
        }
        Ok(instances)
    }

    /// Delete the log files of every requested extractor type.
    ///
    /// Valid in any state, repeatable, and a no-op when nothing was logged.
    pub async fn remove_logs(&mut self) -> Result<(), AssemblyError> {
        self.cleanup(Cleanup::Logs).await
    }

    /// Delete the stored results of every requested extractor type.
    ///
    /// Valid in any state, repeatable, and a no-op when nothing was stored.
    pub async fn remove_results(&mut self) -> Result<(), AssemblyError> {
        self.cleanup(Cleanup::Results).await
    }

    /// Cleanup always works on freshly built instances, never on the ones
    /// `run` used.
    async fn cleanup(&mut self, cleanup: Cleanup) -> Result<(), AssemblyError> {
        let span = self.context.span.clone();
        let instances = span.in_scope(|| self.fresh_instances())?;

        for (type_tag, extractor) in &instances {
            let outcome = match cleanup {
                Cleanup::Logs => extractor.remove_logs().instrument(span.clone()).await,
                Cleanup::Results => extractor.remove_results().instrument(span.clone()).await,
            };
            if let Err(source) = outcome {
                span.in_scope(|| log_failure(type_tag, &source));
                return Err(AssemblyError::Extraction {
                    type_tag: type_tag.to_string(),
                    source,
                });
            }
        }

        span.in_scope(|| {
            CleanupCompleted {
                operation: cleanup.as_str(),
                type_count: instances.len(),
            }
            .log()
        });
        self.state = AssemblerState::Cleaned;
        Ok(())
    }

    /// Score keys in canonical order: type tag, then atom feature.
    pub fn ordered_score_key_list(&self) -> Result<Vec<ScoreKey>, RegistryError> {
        ordered_score_keys(&self.request, &self.registry)
    }

    /// Records from the last successful `run`.
    pub fn records(&self) -> Option<&[ScoreRecord]> {
        self.records.as_deref()
    }

    /// Raw output of one extractor type, as returned by its `run`.
    pub fn raw_results(&self, type_tag: &str) -> Option<&RawResultSet> {
        self.raw_results.get(type_tag)
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn request(&self) -> &FeatureRequest {
        &self.request
    }

    /// One positional vector per asset, laid out by the ordered key list.
    pub fn feature_vectors(&self) -> Result<Vec<Vec<f64>>, AssemblyError> {
        let records = self.records().ok_or(AssemblyError::NotAssembled)?;
        let keys = self.ordered_score_key_list()?;

        records
            .iter()
            .enumerate()
            .map(|(asset_index, record)| {
                keys.iter()
                    .map(|key| {
                        record
                            .get(key)
                            .copied()
                            .ok_or_else(|| AssemblyError::KeyOrderMismatch {
                                score_key: key.clone(),
                                asset_index,
                            })
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Debug for FeatureAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureAssembler")
            .field("request", &self.request)
            .field("asset_count", &self.assets.len())
            .field("registry", &self.registry)
            .field("state", &self.state)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Cleanup {
    Logs,
    Results,
}

impl Cleanup {
    fn as_str(self) -> &'static str {
        match self {
            Cleanup::Logs => "remove_logs",
            Cleanup::Results => "remove_results",
        }
    }
}

async fn run_extractor(
    type_tag: String,
    extractor: Arc<dyn FeatureExtractor>,
) -> Result<(String, RawResultSet), AssemblyError> {
    let started = Instant::now();
    match extractor.run().await {
        Ok(results) => {
            ExtractionCompleted {
                type_tag: &type_tag,
                asset_count: results.len(),
                duration: started.elapsed(),
            }
            .log();
            Ok((type_tag, results))
        }
        Err(source) => {
            log_failure(&type_tag, &source);
            Err(AssemblyError::Extraction { type_tag, source })
        }
    }
}

fn log_failure(type_tag: &str, error: &ExtractionError) {
    ExtractionFailed { type_tag, error }.log();
}
