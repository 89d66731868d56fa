//! File attachment rules: entity kinds, file kinds, storage paths, the
//! media processing state machine, and source/reference pagination.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size for attachment listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page an attachment listing may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Stored processing errors are truncated to this many characters.
pub const MAX_PROCESSING_ERROR_LEN: usize = 500;

/// Directory holding generated thumbnails inside the object store.
pub const THUMBNAIL_DIR: &str = "thumbnails";

// ---------------------------------------------------------------------------
// Entity and file kinds
// ---------------------------------------------------------------------------

/// Entities a file can originate from or be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Project,
    Group,
    Session,
    SessionMaster,
    WorkLead,
    WorkLeadMaster,
    Profile,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Group => "group",
            Self::Session => "session",
            Self::SessionMaster => "session_master",
            Self::WorkLead => "work_lead",
            Self::WorkLeadMaster => "work_lead_master",
            Self::Profile => "profile",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "project" => Ok(Self::Project),
            "group" => Ok(Self::Group),
            "session" => Ok(Self::Session),
            "session_master" => Ok(Self::SessionMaster),
            "work_lead" => Ok(Self::WorkLead),
            "work_lead_master" => Ok(Self::WorkLeadMaster),
            "profile" => Ok(Self::Profile),
            other => Err(CoreError::Validation(format!(
                "Unknown entity type '{other}'"
            ))),
        }
    }
}

/// Coarse content category of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Image,
    Document,
    Video,
    Audio,
    GpsTrack,
    WeatherData,
    Other,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::GpsTrack => "gps_track",
            Self::WeatherData => "weather_data",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "gps_track" => Ok(Self::GpsTrack),
            "weather_data" => Ok(Self::WeatherData),
            "other" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!("Unknown file type '{other}'"))),
        }
    }

    /// Detect the file type from a MIME type.
    pub fn detect(mime_type: Option<&str>) -> Self {
        let Some(mime) = mime_type.filter(|m| !m.is_empty()) else {
            return Self::Other;
        };
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime == "application/gpx+xml" || mime.ends_with("/gpx") {
            Self::GpsTrack
        } else {
            Self::Document
        }
    }

    /// Images get a thumbnail and videos are transcoded after upload.
    pub fn needs_processing(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

// ---------------------------------------------------------------------------
// Processing state machine
// ---------------------------------------------------------------------------

/// Background media processing state persisted on `files.processing_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Ready,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown processing status '{other}'"
            ))),
        }
    }

    /// Initial state for a freshly uploaded file.
    pub fn initial_for(file_type: FileType) -> Self {
        if file_type.needs_processing() {
            Self::Pending
        } else {
            Self::Ready
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// `pending -> processing -> ready | failed`. Terminal states never move.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Ready)
                | (Self::Processing, Self::Failed)
                | (Self::Pending, Self::Failed)
        )
    }

    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot move processing status from {} to {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

/// Truncate a processing error to the stored maximum, on a char boundary.
pub fn truncate_error(message: &str) -> String {
    message.chars().take(MAX_PROCESSING_ERROR_LEN).collect()
}

// ---------------------------------------------------------------------------
// Storage paths
// ---------------------------------------------------------------------------

/// Replace characters that would break a storage key.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Object-store key for a source upload.
pub fn storage_path(
    entity_type: EntityType,
    entity_id: i64,
    file_id: uuid::Uuid,
    file_name: &str,
) -> String {
    format!(
        "{}/{entity_id}/{file_id}_{}",
        entity_type.as_str(),
        sanitize_file_name(file_name)
    )
}

/// Object-store key for a generated thumbnail.
pub fn thumbnail_path(file_id: uuid::Uuid) -> String {
    format!("{THUMBNAIL_DIR}/{file_id}.jpg")
}

/// Reject keys that could escape the storage root.
pub fn validate_storage_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part == ".." || part.is_empty())
    {
        return Err(CoreError::Validation(format!("Invalid storage path '{key}'")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pagination across sources then references
// ---------------------------------------------------------------------------

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Which slice of sources and references makes up a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSplit {
    pub source_offset: i64,
    pub source_take: i64,
    pub reference_offset: i64,
    pub reference_take: i64,
}

/// Sources are listed first, references fill the rest of the page.
pub fn split_page(offset: i64, limit: i64, sources_count: i64) -> PageSplit {
    let source_take = if offset < sources_count {
        limit.min(sources_count - offset)
    } else {
        0
    };
    PageSplit {
        source_offset: offset,
        source_take,
        reference_offset: (offset - sources_count).max(0),
        reference_take: limit - source_take,
    }
}
