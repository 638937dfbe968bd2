// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::Instrument;

use super::log_parser::{FrameScores, MalformedLine};
use crate::asset::Asset;
use crate::errors::ExtractionError;
use crate::observability::messages::extractor::{ToolInvocation, WorkdirRemoved};
use crate::observability::messages::store::{ResultStoreHit, ResultStored, ResultsRemoved};
use crate::observability::messages::StructuredLog;
use crate::store::ResultKey;
use crate::traits::{ExtractorContext, ExtractorKind, FeatureExtractor};
use crate::types::{RawResultSet, ScoreMap};

const STDERR_LOG: &str = "stderr.log";

/// Elementary VMAF features computed by the external `vmaf` tool.
///
/// For each asset the tool is run as
/// `{vmaf_executable} all {yuv_type} {ref_path} {dis_path} {width} {height}`
/// and every atom score is the mean of its per-frame values. Results are
/// memoized in the shared result store.
///
/// # Locations
///
/// * log: `{log_dir}/VMAF_feature_0.1_{signature}.log`
/// * workdir: `{workdir_root}/VMAF_feature_{signature}` (holds the tool's stderr)
///
/// Both depend only on the asset and the runtime options, so any instance
/// finds the files another instance wrote.
pub struct VmafFeatureExtractor {
    context: ExtractorContext,
}

impl ExtractorKind for VmafFeatureExtractor {
    const TYPE: &'static str = "VMAF_feature";
    const VERSION: &'static str = "0.1";
    const ATOM_FEATURES: &'static [&'static str] = &["vif", "adm", "ansnr", "motion"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

impl VmafFeatureExtractor {
    pub fn log_path(&self, asset: &Asset) -> PathBuf {
        self.context.log_dir().join(format!(
            "{}_{}_{}.log",
            Self::TYPE,
            Self::VERSION,
            asset.signature()
        ))
    }

    pub fn workdir(&self, asset: &Asset) -> PathBuf {
        self.context
            .options
            .workdir_root
            .join(format!("{}_{}", Self::TYPE, asset.signature()))
    }

    fn result_key(asset: &Asset) -> ResultKey {
        ResultKey::new(Self::TYPE, Self::VERSION, asset)
    }

    fn program(&self) -> &Path {
        &self.context.options.vmaf_executable
    }

    async fn extract_asset(
        &self,
        asset_index: usize,
        asset: &Asset,
    ) -> Result<ScoreMap, ExtractionError> {
        let workdir = self.workdir(asset);
        create_dir(&workdir).await?;

        let log_path = self.log_path(asset);
        let frames = if self.context.fifo_mode() {
            self.stream_tool_output(asset_index, asset, &workdir, &log_path)
                .await?
        } else {
            self.run_tool_to_log(asset_index, asset, &workdir, &log_path)
                .await?
        };

        if frames.is_empty() {
            return Err(ExtractionError::NoFrames { path: log_path });
        }

        let mut scores = ScoreMap::new();
        for atom in Self::ATOM_FEATURES {
            let mean = frames.mean(atom).ok_or_else(|| ExtractionError::MissingAtom {
                atom: atom.to_string(),
                path: log_path.clone(),
            })?;
            scores.insert(Self::score_key_for(atom), mean);
        }

        if self.context.delete_workdir() {
            remove_dir(&workdir).await?;
            WorkdirRemoved { path: &workdir }.log();
        }

        Ok(scores)
    }

    async fn command(&self, asset: &Asset, workdir: &Path) -> Result<Command, ExtractionError> {
        let stderr_path = workdir.join(STDERR_LOG);
        let stderr = fs::File::create(&stderr_path)
            .await
            .map_err(|source| io_error(&stderr_path, source))?
            .into_std()
            .await;

        let mut command = Command::new(self.program());
        command
            .arg("all")
            .arg(&asset.yuv_type)
            .arg(&asset.ref_path)
            .arg(&asset.dis_path)
            .arg(asset.width.to_string())
            .arg(asset.height.to_string())
            .stdin(Stdio::null())
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);
        Ok(command)
    }

    /// Read the tool's stdout through a pipe, parsing and logging each line
    /// as it arrives.
    async fn stream_tool_output(
        &self,
        asset_index: usize,
        asset: &Asset,
        workdir: &Path,
        log_path: &Path,
    ) -> Result<FrameScores, ExtractionError> {
        let mut command = self.command(asset, workdir).await?;
        command.stdout(Stdio::piped());

        self.log_invocation(asset);
        let mut child = command.spawn().map_err(|source| self.launch_error(source))?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ExtractionError::Failed(format!("'{}' stdout not captured", self.program().display()))
        })?;

        let mut log = fs::File::create(log_path)
            .await
            .map_err(|source| io_error(log_path, source))?;
        let mut frames = FrameScores::new(Self::ATOM_FEATURES);
        let mut malformed: Option<MalformedLine> = None;

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|source| io_error(log_path, source))?
        {
            log.write_all(line.as_bytes())
                .await
                .map_err(|source| io_error(log_path, source))?;
            log.write_all(b"\n")
                .await
                .map_err(|source| io_error(log_path, source))?;

            if let Err(bad) = frames.push_line(&line) {
                malformed.get_or_insert(bad);
            }
        }
        log.flush().await.map_err(|source| io_error(log_path, source))?;

        let status = child
            .wait()
            .await
            .map_err(|source| self.launch_error(source))?;
        self.check_status(status, asset_index, workdir).await?;

        match malformed {
            Some(bad) => Err(malformed_log(log_path, bad)),
            None => Ok(frames),
        }
    }

    /// Send the tool's stdout straight to the log file and parse it once the
    /// tool has exited.
    async fn run_tool_to_log(
        &self,
        asset_index: usize,
        asset: &Asset,
        workdir: &Path,
        log_path: &Path,
    ) -> Result<FrameScores, ExtractionError> {
        let mut command = self.command(asset, workdir).await?;
        let log = fs::File::create(log_path)
            .await
            .map_err(|source| io_error(log_path, source))?
            .into_std()
            .await;
        command.stdout(Stdio::from(log));

        self.log_invocation(asset);
        let status = command
            .status()
            .await
            .map_err(|source| self.launch_error(source))?;
        self.check_status(status, asset_index, workdir).await?;

        let content = fs::read_to_string(log_path)
            .await
            .map_err(|source| io_error(log_path, source))?;

        let mut frames = FrameScores::new(Self::ATOM_FEATURES);
        for line in content.lines() {
            frames
                .push_line(line)
                .map_err(|bad| malformed_log(log_path, bad))?;
        }
        Ok(frames)
    }

    fn log_invocation(&self, asset: &Asset) {
        ToolInvocation {
            program: self.program(),
            asset_signature: &asset.signature(),
            fifo_mode: self.context.fifo_mode(),
        }
        .log();
    }

    fn launch_error(&self, source: std::io::Error) -> ExtractionError {
        ExtractionError::ToolLaunch {
            program: self.program().display().to_string(),
            source,
        }
    }

    async fn check_status(
        &self,
        status: ExitStatus,
        asset_index: usize,
        workdir: &Path,
    ) -> Result<(), ExtractionError> {
        if status.success() {
            return Ok(());
        }
        let stderr = fs::read(workdir.join(STDERR_LOG))
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .unwrap_or_else(|e| format!("<stderr unavailable: {}>", e));
        Err(ExtractionError::ToolFailed {
            program: self.program().display().to_string(),
            asset_index,
            status: status.to_string(),
            stderr,
        })
    }
}

#[async_trait]
impl FeatureExtractor for VmafFeatureExtractor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        create_dir(self.context.log_dir()).await?;
        let store = &self.context.result_store;

        let mut results = Vec::with_capacity(self.context.assets.len());
        for (asset_index, asset) in self.context.assets.iter().enumerate() {
            let key = Self::result_key(asset);
            if let Some(stored) = store.load(&key)? {
                ResultStoreHit {
                    key: &key,
                    store: store.name(),
                }
                .log();
                results.push(stored);
                continue;
            }

            let asset_span = tracing::debug_span!(
                parent: &self.context.span,
                "asset",
                asset_index,
                signature = %key.asset_signature
            );
            let scores = self
                .extract_asset(asset_index, asset)
                .instrument(asset_span)
                .await?;

            store.save(&key, &scores)?;
            ResultStored {
                key: &key,
                store: store.name(),
                score_count: scores.len(),
            }
            .log();
            results.push(scores);
        }
        Ok(results)
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        for asset in self.context.assets.iter() {
            let path = self.log_path(asset);
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(ExtractionError::Io { path, source }),
            }
        }
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        let store = &self.context.result_store;
        let mut removed = 0;
        for asset in self.context.assets.iter() {
            if store.delete(&Self::result_key(asset))? {
                removed += 1;
            }
        }
        ResultsRemoved {
            type_tag: Self::TYPE,
            removed,
            store: store.name(),
        }
        .log();
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ExtractionError {
    ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed_log(path: &Path, bad: MalformedLine) -> ExtractionError {
    ExtractionError::MalformedLog {
        path: path.to_path_buf(),
        line_number: bad.line_number,
        line: bad.line,
    }
}

async fn create_dir(path: &Path) -> Result<(), ExtractionError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| io_error(path, source))
}

async fn remove_dir(path: &Path) -> Result<(), ExtractionError> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_error(path, source)),
    }
}
