/// Default limit on reassembled or outgoing text: 16 MiB.
pub const DEFAULT_MAX_TEXT_LEN: usize = 16 * 1024 * 1024;

/// Configuration for encoding and reassembling messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum text size in bytes. Default: 16 MiB.
    pub max_text_len: usize,
}

impl CodecConfig {
    /// No limit on text size.
    pub const fn unbounded() -> Self {
        Self {
            max_text_len: usize::MAX,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}
