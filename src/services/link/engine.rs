use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};
use crate::models::link::{LinkEvent, LinkOutcome, LinkRequest, LinkStatus, LinkSummary};
use crate::services::fs::resolve::resolve_dir;
use crate::services::link::decision::{decide, detail, Decision, Destination, SourceState};
use crate::services::link::sink::ProgressSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Validating,
    Processing,
    Completed,
}

/// What a finished run reports back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    pub state: EngineState,
    pub summary: LinkSummary,
    /// The sink closed before every item was processed.
    pub cancelled: bool,
}

/// Runs one link request to completion. Items are handled strictly in request order.
#[derive(Debug)]
pub struct HardlinkEngine {
    state: EngineState,
    summary: LinkSummary,
    cancelled: bool,
}

impl Default for HardlinkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HardlinkEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            summary: LinkSummary::default(),
            cancelled: false,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn run<S: ProgressSink>(mut self, request: &LinkRequest, sink: &mut S) -> LinkReport {
        self.state = EngineState::Validating;
        let dst = match validate(request) {
            Ok(dst) => dst,
            Err(reason) => {
                tracing::warn!(%reason, "rejecting link request");
                sink.emit(LinkEvent::Rejected(reason));
                self.state = EngineState::Completed;
                return self.report();
            }
        };

        self.state = EngineState::Processing;
        let total = request.src_files.len();
        for (index, raw) in request.src_files.iter().enumerate() {
            let mut batch = Batch {
                sink: &mut *sink,
                summary: &mut self.summary,
                item: index + 1,
                total,
                emitted: 0,
            };
            if batch.link_item(Path::new(raw), &dst).is_break() {
                self.cancelled = true;
                break;
            }
        }
        self.state = EngineState::Completed;

        if self.cancelled {
            tracing::info!(summary = ?self.summary, "link session cancelled by client");
        } else {
            sink.emit(LinkEvent::Summary(self.summary));
        }
        self.report()
    }

    fn report(&self) -> LinkReport {
        LinkReport {
            state: self.state,
            summary: self.summary,
            cancelled: self.cancelled,
        }
    }
}

fn validate(request: &LinkRequest) -> std::result::Result<PathBuf, String> {
    if !request.link {
        return Err("link flag must be true".to_string());
    }
    if request.src_files.is_empty() {
        return Err("no source files given".to_string());
    }
    resolve_dir(&request.dst_path).map_err(|err| format!("destination: {err}"))
}

/// Emission state for one requested item.
struct Batch<'a, S: ProgressSink> {
    sink: &'a mut S,
    summary: &'a mut LinkSummary,
    item: usize,
    total: usize,
    /// Outcomes sent so far for this item.
    emitted: usize,
}

impl<S: ProgressSink> Batch<'_, S> {
    fn link_item(&mut self, src: &Path, dst_dir: &Path) -> ControlFlow<()> {
        self.check()?;
        let Some(name) = src.file_name() else {
            return self.emit(LinkOutcome::failed(
                src.to_path_buf(),
                "source has no file name",
            ));
        };
        if contains_destination(src, dst_dir) {
            return self.emit(LinkOutcome::failed(
                src.to_path_buf(),
                detail(&Error::DestinationInsideSource),
            ));
        }

        let target = dst_dir.join(name);
        self.link_path(src, target.clone())?;

        // A directory without files still got mirrored; report it once.
        if self.emitted == 0 {
            return self.emit(LinkOutcome::linked(src.to_path_buf(), &target));
        }
        ControlFlow::Continue(())
    }

    fn link_path(&mut self, src: &Path, target: PathBuf) -> ControlFlow<()> {
        let destination = Destination::probe(target);
        match decide(SourceState::probe(src), &destination) {
            Decision::Link => {
                let outcome = match create_link(src, &destination.path) {
                    Ok(()) => LinkOutcome::linked(src.to_path_buf(), &destination.path),
                    Err(err) => outcome_for_error(src, &err),
                };
                self.emit(outcome)
            }
            Decision::Mirror => self.mirror(src, &destination.path),
            Decision::Skip(err) => self.emit(LinkOutcome::skipped(src.to_path_buf(), detail(&err))),
            Decision::Fail(err) => self.emit(LinkOutcome::failed(src.to_path_buf(), detail(&err))),
        }
    }

    /// Recreates `src` under `target`, linking each file. Children go in name order.
    fn mirror(&mut self, src: &Path, target: &Path) -> ControlFlow<()> {
        if let Err(err) = ensure_dir(target) {
            return self.emit(outcome_for_error(src, &err));
        }

        let mut children = match read_children(src) {
            Ok(children) => children,
            Err(err) => return self.emit(LinkOutcome::failed(src.to_path_buf(), err.to_string())),
        };
        children.sort();

        for child in children {
            self.check()?;
            let Some(name) = child.file_name() else {
                continue;
            };
            let child_target = target.join(name);
            self.link_path(&child, child_target)?;
        }
        ControlFlow::Continue(())
    }

    fn check(&self) -> ControlFlow<()> {
        if self.sink.is_closed() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn emit(&mut self, outcome: LinkOutcome) -> ControlFlow<()> {
        match outcome.status {
            LinkStatus::Failed => tracing::warn!(
                source = %outcome.source_path.display(),
                detail = %outcome.detail,
                "link failed"
            ),
            _ => tracing::debug!(
                source = %outcome.source_path.display(),
                status = outcome.status.as_str(),
                "link outcome"
            ),
        }
        self.summary.record(outcome.status);
        self.emitted += 1;

        let event = LinkEvent::Outcome {
            item: self.item,
            total: self.total,
            outcome,
        };
        if self.sink.emit(event) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

/// True when `src` is a real directory and the canonical `dst_dir` lies within it.
fn contains_destination(src: &Path, dst_dir: &Path) -> bool {
    match fs::symlink_metadata(src) {
        Ok(md) if md.is_dir() => fs::canonicalize(src)
            .map(|src| dst_dir.starts_with(src))
            .unwrap_or(false),
        _ => false,
    }
}

fn create_link(src: &Path, target: &Path) -> Result<()> {
    fs::hard_link(src, target).map_err(|err| match err.kind() {
        io::ErrorKind::AlreadyExists => Error::AlreadyExists(target.to_path_buf()),
        io::ErrorKind::CrossesDevices => Error::CrossDeviceLink,
        _ => Error::Io(err),
    })
}

/// Creates `target`, or accepts it if it is already a real directory.
fn ensure_dir(target: &Path) -> Result<()> {
    match fs::create_dir(target) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            match fs::symlink_metadata(target) {
                Ok(md) if md.is_dir() => Ok(()),
                _ => Err(Error::NotADirectory(target.to_path_buf())),
            }
        }
        Err(err) => Err(Error::Io(err)),
    }
}

fn read_children(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect()
}

// A destination that appeared between probe and link is still a skip, not a failure.
fn outcome_for_error(src: &Path, err: &Error) -> LinkOutcome {
    match err {
        Error::AlreadyExists(_) => LinkOutcome::skipped(src.to_path_buf(), detail(err)),
        _ => LinkOutcome::failed(src.to_path_buf(), detail(err)),
    }
}
