//! Media processing worker.
//!
//! Uploads of images and videos are stored with `processing_status =
//! 'pending'` and their id is pushed onto a bounded queue. A single worker
//! task drains the queue: images get a JPEG thumbnail, videos are
//! transcoded to H.264/AAC MP4 and get a frame thumbnail. A failure marks
//! the file `failed` and never touches the upload itself.

use std::path::PathBuf;
use std::sync::Arc;

use rise_core::ffmpeg::{self, FfmpegError};
use rise_core::files::{thumbnail_path, truncate_error, FileType, ProcessingStatus};
use rise_core::media::{generate_thumbnail, MediaError, VIDEO_THUMBNAIL_OFFSET_SECS};
use rise_db::models::file::{FileRecord, TranscodedVideo};
use rise_db::repositories::FileRepo;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::storage::{ObjectStore, StorageError};

/// One file waiting for processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaJob {
    pub file_id: Uuid,
}

/// Sending half of the media queue, held in `AppState`.
#[derive(Clone)]
pub struct MediaQueue {
    sender: mpsc::Sender<MediaJob>,
}

impl MediaQueue {
    /// Create a queue of `capacity` jobs and the receiver the worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MediaJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Enqueue without waiting. Returns `false` if the queue is full or the
    /// worker has stopped.
    pub fn enqueue(&self, file_id: Uuid) -> bool {
        match self.sender.try_send(MediaJob { file_id }) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%file_id, error = %e, "Media queue rejected job");
                false
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaJobError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thumbnail task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run the media worker until `cancel` fires or every sender is dropped.
pub async fn run(
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    mut receiver: mpsc::Receiver<MediaJob>,
    cancel: CancellationToken,
) {
    tracing::info!(backend = store.backend_tag(), "Media worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Media worker stopping");
                break;
            }
            job = receiver.recv() => {
                let Some(job) = job else {
                    tracing::info!("Media queue closed, worker stopping");
                    break;
                };
                process_job(&pool, store.as_ref(), job).await;
            }
        }
    }
}

/// Process one job to a terminal state.
///
/// Jobs for missing rows or rows no longer `pending` are dropped.
pub async fn process_job(pool: &PgPool, store: &dyn ObjectStore, job: MediaJob) {
    let file_id = job.file_id;

    let file = match FileRepo::find_by_id(pool, file_id).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            tracing::debug!(%file_id, "Media job for a deleted file, skipping");
            return;
        }
        Err(e) => {
            tracing::error!(%file_id, error = %e, "Media job: failed to load file");
            return;
        }
    };

    let current = match ProcessingStatus::parse(&file.processing_status) {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(%file_id, error = %e, "Media job: unreadable processing status");
            return;
        }
    };
    if current
        .transition(ProcessingStatus::Processing)
        .is_err()
    {
        tracing::debug!(%file_id, status = current.as_str(), "Media job: nothing to do");
        return;
    }
    match FileRepo::transition(
        pool,
        file_id,
        ProcessingStatus::Pending,
        ProcessingStatus::Processing,
    )
    .await
    {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            tracing::error!(%file_id, error = %e, "Media job: failed to claim file");
            return;
        }
    }

    let outcome = match FileType::parse(&file.file_type) {
        Ok(FileType::Image) => process_image(store, &file).await,
        Ok(FileType::Video) => process_video(store, &file).await,
        _ => Ok(Processed::default()),
    };

    let written = match outcome {
        Ok(done) => {
            tracing::info!(%file_id, file_type = %file.file_type, "Media processing finished");
            FileRepo::mark_ready(pool, file_id, done.thumbnail_path.as_deref(), done.video).await
        }
        Err(e) => {
            tracing::warn!(%file_id, error = %e, "Media processing failed");
            FileRepo::mark_failed(pool, file_id, &truncate_error(&e.to_string())).await
        }
    };
    if let Err(e) = written {
        tracing::error!(%file_id, error = %e, "Media job: failed to record outcome");
    }
}

#[derive(Debug, Default)]
struct Processed {
    thumbnail_path: Option<String>,
    video: Option<TranscodedVideo>,
}

async fn process_image(
    store: &dyn ObjectStore,
    file: &FileRecord,
) -> Result<Processed, MediaJobError> {
    let bytes = store.get(&file.file_path).await?;
    let thumbnail = tokio::task::spawn_blocking(move || generate_thumbnail(&bytes)).await??;

    let key = thumbnail_path(file.id);
    store.put(&key, &thumbnail).await?;
    Ok(Processed {
        thumbnail_path: Some(key),
        video: None,
    })
}

async fn process_video(
    store: &dyn ObjectStore,
    file: &FileRecord,
) -> Result<Processed, MediaJobError> {
    let original = store.get(&file.file_path).await?;
    let scratch = Scratch::new(file.id);
    tokio::fs::write(&scratch.input, &original).await?;

    let result = async {
        ffmpeg::transcode_video(&scratch.input, &scratch.output).await?;
        ffmpeg::extract_frame_thumbnail(
            &scratch.output,
            &scratch.thumbnail,
            VIDEO_THUMBNAIL_OFFSET_SECS,
        )
        .await?;

        let transcoded = tokio::fs::read(&scratch.output).await?;
        let thumbnail = tokio::fs::read(&scratch.thumbnail).await?;

        store.put(&file.file_path, &transcoded).await?;
        let key = thumbnail_path(file.id);
        store.put(&key, &thumbnail).await?;

        Ok::<_, MediaJobError>(Processed {
            thumbnail_path: Some(key),
            video: Some(TranscodedVideo {
                original_file_size: original.len() as i64,
                file_size: transcoded.len() as i64,
            }),
        })
    }
    .await;

    scratch.cleanup().await;
    result
}

/// Temporary files for one video job.
struct Scratch {
    input: PathBuf,
    output: PathBuf,
    thumbnail: PathBuf,
}

impl Scratch {
    fn new(file_id: Uuid) -> Self {
        let dir = std::env::temp_dir();
        Self {
            input: dir.join(format!("rise-media-{file_id}-source")),
            output: dir.join(format!("rise-media-{file_id}.mp4")),
            thumbnail: dir.join(format!("rise-media-{file_id}.jpg")),
        }
    }

    async fn cleanup(&self) {
        for path in [&self.input, &self.output, &self.thumbnail] {
            let _ = tokio::fs::remove_file(path).await;
        }
    }
}
