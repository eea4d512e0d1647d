use crate::application::services::file_extension;

/// MIME type sent alongside raw audio bodies.
pub fn audio_mime_type(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("mp4") | Some("m4a") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}
