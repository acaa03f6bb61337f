/// Fallback used when an upload carries no usable filename
pub const DEFAULT_AUDIO_FILENAME: &str = "audio";

/// Reduce a client-supplied filename to a single safe object key segment.
///
/// Only the last path component is kept (both `/` and `\` count as
/// separators), and characters that are awkward in S3 keys or media URIs are
/// replaced with `_`. Never fails: an empty result becomes
/// [`DEFAULT_AUDIO_FILENAME`].
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name != filename.trim() {
        tracing::warn!("Path components stripped from upload filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == '#'
                || c == '%'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        DEFAULT_AUDIO_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("recording.mp3"), "recording.mp3");
        assert_eq!(sanitize_filename("minha gravação.wav"), "minha gravação.wav");
        assert_eq!(sanitize_filename("take<1>.ogg"), "take_1_.ogg");
        assert_eq!(sanitize_filename("50%#done.m4a"), "50__done.m4a");
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\voice.flac"), "voice.flac");
        assert_eq!(sanitize_filename("dir/"), DEFAULT_AUDIO_FILENAME);
        assert_eq!(sanitize_filename(".."), DEFAULT_AUDIO_FILENAME);
        assert_eq!(sanitize_filename("   "), DEFAULT_AUDIO_FILENAME);
    }
}
