use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};

/// Resolves a tokenizer path that may be `tokenizer.json` itself or a
/// directory containing one.
fn resolve_tokenizer_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join("tokenizer.json")
    } else {
        path.to_path_buf()
    }
}

/// Loads a tokenizer from a `tokenizer.json` file or its parent directory.
pub fn load_tokenizer(path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_file = resolve_tokenizer_file(path);

    if !tokenizer_file.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("tokenizer file not found: {}", tokenizer_file.display()),
        ));
    }

    Tokenizer::from_file(&tokenizer_file).map_err(io::Error::other)
}

/// Loads a tokenizer with truncation and padding configured for a fixed
/// maximum sequence length.
///
/// Inputs longer than `max_len` tokens are cut down to fit the encoder's
/// context window. Padding uses the tokenizer's batch-longest strategy, so a
/// single sequence passes through unpadded.
pub fn load_tokenizer_with_limits(path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    tokenizer.with_padding(Some(PaddingParams::default()));

    Ok(tokenizer)
}
