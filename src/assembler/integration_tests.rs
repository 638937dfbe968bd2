// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::assembler::{AssemblerState, AssemblyContext, FeatureAssembler};
use crate::asset::Asset;
use crate::backends::stub::{
    stub_score, AlternateVmafStub, FailingStub, IncompleteStub, MisalignedStub, NoiseStub,
    SlowStub, VmafStub,
};
use crate::config::{FeatureRequest, RuntimeOptions};
use crate::errors::{AssemblyError, ExtractionError, RegistryError};
use crate::registry::{ExtractorRegistry, ExtractorVariant};
use crate::store::InMemoryResultStore;
use crate::types::ScoreKey;

/// Integration tests for the assembler running real (stub) extractors
#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        dir: TempDir,
        store: Arc<InMemoryResultStore>,
        registry: ExtractorRegistry,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                store: Arc::new(InMemoryResultStore::new()),
                registry: ExtractorRegistry::new()
                    .with_variant(ExtractorVariant::of::<VmafStub>())
                    .with_variant(ExtractorVariant::of::<NoiseStub>())
                    .with_variant(ExtractorVariant::of::<FailingStub>())
                    .with_variant(ExtractorVariant::of::<IncompleteStub>())
                    .with_variant(ExtractorVariant::of::<MisalignedStub>())
                    .with_variant(ExtractorVariant::of::<SlowStub>()),
            }
        }

        fn log_dir(&self) -> std::path::PathBuf {
            self.dir.path().join("logs")
        }

        fn assembler(&self, request: FeatureRequest, assets: Vec<Asset>) -> FeatureAssembler {
            self.assembler_with(request, assets, 1)
        }

        fn assembler_with(
            &self,
            request: FeatureRequest,
            assets: Vec<Asset>,
            max_concurrency: usize,
        ) -> FeatureAssembler {
            let options = RuntimeOptions::default()
                .with_log_dir(self.log_dir())
                .with_workdir_root(self.dir.path().join("workdir"))
                .with_max_concurrency(max_concurrency);
            let context = AssemblyContext::new(options, self.store.clone());
            FeatureAssembler::new(request, assets, self.registry.clone(), context)
        }
    }

    fn assets(count: u32) -> Vec<Asset> {
        (0..count)
            .map(|id| Asset::new("test", 0, id, "ref.yuv", format!("dis{}.yuv", id), 64, 48))
            .collect()
    }

    fn keys(raw: &[&str]) -> Vec<ScoreKey> {
        raw.iter().map(|key| ScoreKey::from(*key)).collect()
    }

    fn computed_count(log_dir: &Path, asset: &Asset) -> usize {
        std::fs::read_to_string(VmafStub::log_path(log_dir, asset))
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_explicit_atoms_two_assets() {
        let harness = Harness::new();
        let assets = assets(2);
        let mut assembler = harness.assembler(
            FeatureRequest::new().with_atoms("vmaf", ["vif", "ansnr"]),
            assets.clone(),
        );

        let records = assembler.run().await.unwrap().to_vec();

        assert_eq!(records.len(), 2);
        for (record, asset) in records.iter().zip(&assets) {
            let record_keys: Vec<ScoreKey> = record.keys().cloned().collect();
            assert_eq!(record_keys, keys(&["vmaf_ansnr_score", "vmaf_vif_score"]));
            assert_eq!(record["vmaf_vif_score"], stub_score(asset, "vif"));
            assert_eq!(record["vmaf_ansnr_score"], stub_score(asset, "ansnr"));
        }
        assert_eq!(
            assembler.ordered_score_key_list().unwrap(),
            keys(&["vmaf_ansnr_score", "vmaf_vif_score"])
        );
        assert_eq!(assembler.state(), AssemblerState::Assembled);
    }

    #[tokio::test]
    async fn test_all_atoms_follow_declared_set() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("vmaf"), assets(1));

        let records = assembler.run().await.unwrap();

        let record_keys: Vec<ScoreKey> = records[0].keys().cloned().collect();
        assert_eq!(
            record_keys,
            keys(&["vmaf_ansnr_score", "vmaf_motion_score", "vmaf_vif_score"])
        );
    }

    #[tokio::test]
    async fn test_record_keys_match_ordered_key_list() {
        let harness = Harness::new();
        let request = FeatureRequest::new()
            .with_atoms("vmaf", ["motion", "vif"])
            .with_all("noise");
        let mut assembler = harness.assembler(request, assets(3));

        let records = assembler.run().await.unwrap().to_vec();
        let ordered = assembler.ordered_score_key_list().unwrap();

        assert_eq!(records.len(), 3);
        for record in &records {
            let record_keys: Vec<ScoreKey> = record.keys().cloned().collect();
            assert_eq!(record_keys, ordered);
        }
    }

    #[tokio::test]
    async fn test_raw_results_keep_unrequested_keys() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_atoms("vmaf", ["vif"]), assets(1));

        assert!(assembler.records().is_none());
        assembler.run().await.unwrap();

        let raw = assembler.raw_results("vmaf").unwrap();
        assert_eq!(raw[0].len(), 3);
        assert_eq!(assembler.records().unwrap()[0].len(), 1);
        assert!(assembler.raw_results("noise").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_extraction_matches_sequential() {
        let request = FeatureRequest::new().with_all("vmaf").with_all("noise");

        let sequential = Harness::new();
        let mut first = sequential.assembler_with(request.clone(), assets(4), 1);
        let expected = first.run().await.unwrap().to_vec();

        let concurrent = Harness::new();
        let mut second = concurrent.assembler_with(request, assets(4), 4);
        let actual = second.run().await.unwrap().to_vec();

        assert_eq!(actual, expected);
        assert_eq!(second.feature_vectors().unwrap(), first.feature_vectors().unwrap());
    }

    #[tokio::test]
    async fn test_unknown_type_fails_before_any_extraction() {
        let harness = Harness::new();
        let assets = assets(2);
        let mut assembler = harness.assembler(
            FeatureRequest::new().with_all("vmaf").with_all("psnr"),
            assets.clone(),
        );

        let error = assembler.run().await.unwrap_err();

        assert!(matches!(
            error,
            AssemblyError::Configuration(RegistryError::NotRegistered { ref tag, .. }) if tag == "psnr"
        ));
        assert_eq!(computed_count(&harness.log_dir(), &assets[0]), 0);
        assert!(harness.store.is_empty());
        assert_eq!(assembler.state(), AssemblerState::Configured);
        assert!(assembler.records().is_none());
    }

    #[tokio::test]
    async fn test_ambiguous_type_is_configuration_error() {
        let mut harness = Harness::new();
        harness.registry.register(ExtractorVariant::of::<AlternateVmafStub>());
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("vmaf"), assets(1));

        let error = assembler.run().await.unwrap_err();
        assert!(matches!(
            error,
            AssemblyError::Configuration(RegistryError::Ambiguous { count: 2, .. })
        ));
        assert!(assembler.ordered_score_key_list().is_err());
    }

    #[tokio::test]
    async fn test_extraction_failure_is_propagated() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("failing"), assets(1));

        match assembler.run().await.unwrap_err() {
            AssemblyError::Extraction { type_tag, source } => {
                assert_eq!(type_tag, "failing");
                assert!(matches!(source, ExtractionError::Failed(_)));
            }
            other => panic!("expected Extraction error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_extraction_failure_is_propagated() {
        let harness = Harness::new();
        let request = FeatureRequest::new().with_all("vmaf").with_all("failing");
        let mut assembler = harness.assembler_with(request, assets(2), 2);

        let error = assembler.run().await.unwrap_err();
        assert!(matches!(error, AssemblyError::Extraction { ref type_tag, .. } if type_tag == "failing"));
    }

    #[tokio::test]
    async fn test_concurrent_failure_stops_other_extractors() {
        let harness = Harness::new();
        let request = FeatureRequest::new().with_all("slow").with_all("failing");
        let mut assembler = harness.assembler_with(request, assets(2), 2);

        let error = assembler.run().await.unwrap_err();
        assert!(matches!(error, AssemblyError::Extraction { ref type_tag, .. } if type_tag == "failing"));
        assert!(harness.store.is_empty());

        // Nothing is written after run() has reported the failure.
        tokio::time::sleep(SlowStub::DELAY * 2).await;
        assert!(harness.store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_declared_score_is_consistency_violation() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("incomplete"), assets(2));

        let error = assembler.run().await.unwrap_err();

        assert!(error.is_consistency_violation());
        match error {
            AssemblyError::MissingScore {
                score_key,
                asset_index,
                ..
            } => {
                assert_eq!(score_key.as_str(), "incomplete_absent_score");
                assert_eq!(asset_index, 0);
            }
            other => panic!("expected MissingScore, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_explicit_subset_avoids_missing_score() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(
            FeatureRequest::new().with_atoms("incomplete", ["present"]),
            assets(2),
        );

        let records = assembler.run().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].contains_key("incomplete_present_score"));
    }

    #[tokio::test]
    async fn test_result_count_mismatch() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("misaligned"), assets(2));

        let error = assembler.run().await.unwrap_err();
        assert!(matches!(
            error,
            AssemblyError::ResultCountMismatch { expected: 2, actual: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_zero_assets() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("vmaf"), Vec::new());

        let records = assembler.run().await.unwrap();
        assert!(records.is_empty());
        assert!(assembler.feature_vectors().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_feature_vectors_follow_ordered_keys() {
        let harness = Harness::new();
        let assets = assets(2);
        let mut assembler = harness.assembler(
            FeatureRequest::new().with_atoms("vmaf", ["vif", "motion"]).with_atoms("noise", ["grain"]),
            assets.clone(),
        );

        assert!(matches!(
            assembler.feature_vectors(),
            Err(AssemblyError::NotAssembled)
        ));

        assembler.run().await.unwrap();
        let vectors = assembler.feature_vectors().unwrap();

        for (vector, asset) in vectors.iter().zip(&assets) {
            assert_eq!(
                vector,
                &vec![
                    stub_score(asset, "grain"),
                    stub_score(asset, "motion"),
                    stub_score(asset, "vif"),
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_rerun_reuses_stored_results() {
        let harness = Harness::new();
        let assets = assets(2);
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("vmaf"), assets.clone());

        let first = assembler.run().await.unwrap().to_vec();
        let second = assembler.run().await.unwrap().to_vec();

        assert_eq!(first, second);
        for asset in &assets {
            assert_eq!(computed_count(&harness.log_dir(), asset), 1);
        }
    }

    #[tokio::test]
    async fn test_cleanup_before_run_is_a_no_op() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(
            FeatureRequest::new().with_all("vmaf").with_all("noise"),
            assets(2),
        );

        assembler.remove_logs().await.unwrap();
        assembler.remove_results().await.unwrap();
        assembler.remove_logs().await.unwrap();
        assembler.remove_results().await.unwrap();

        assert_eq!(assembler.state(), AssemblerState::Cleaned);
        assert!(assembler.records().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_removes_what_run_produced() {
        let harness = Harness::new();
        let assets = assets(2);
        let request = FeatureRequest::new().with_all("vmaf");
        let mut assembler = harness.assembler(request.clone(), assets.clone());

        assembler.run().await.unwrap();
        assert_eq!(harness.store.len(), 2);
        assert_eq!(computed_count(&harness.log_dir(), &assets[0]), 1);

        // A separately built assembler finds the same files and entries.
        let mut other = harness.assembler(request, assets.clone());
        other.remove_logs().await.unwrap();
        other.remove_results().await.unwrap();

        assert!(harness.store.is_empty());
        for asset in &assets {
            assert!(!VmafStub::log_path(&harness.log_dir(), asset).exists());
        }

        // Records of the first run stay readable after cleanup.
        assert_eq!(assembler.records().unwrap().len(), 2);

        // Nothing stored any more, so the next run computes again.
        assembler.run().await.unwrap();
        assert_eq!(computed_count(&harness.log_dir(), &assets[0]), 1);
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_propagated() {
        let harness = Harness::new();
        let mut assembler = harness.assembler(FeatureRequest::new().with_all("failing"), assets(1));

        let error = assembler.remove_logs().await.unwrap_err();
        assert!(matches!(error, AssemblyError::Extraction { ref type_tag, .. } if type_tag == "failing"));
        assert_eq!(assembler.state(), AssemblerState::Configured);
    }
}
