//! Shared constants used across the application.

/// User agent string sent with every probe request.
///
/// Some hosts answer differently to non-browser clients, so probes identify as
/// a regular desktop browser.
pub const PROBE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Mega RPC API base URL.
pub const MEGA_API_URL: &str = "https://g.api.mega.co.nz";

/// Default Google Drive direct-download endpoint (the file id is appended).
pub const DRIVE_FILE_URL: &str = "https://drive.google.com/uc?export=download&id=";

/// Default Google Drive folder browse endpoint (the folder id is appended).
pub const DRIVE_FOLDER_URL: &str = "https://drive.google.com/drive/folders/";

/// Marker Google Drive puts in its content policy headers when a file is too
/// large to be virus scanned but still exists.
pub const DRIVE_UNTRUSTED_CONTENT_MARKER: &str = "DriveUntrustedContentHttp";

/// Client-side redirect emitted by MediaFire on a live file page.
pub const MEDIAFIRE_REDIRECT_MARKER: &str = "window.location.href";
