use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Load a flat sequence of samples from a text file.
///
/// The file must contain real numbers separated by whitespace or newlines,
/// with no header. Parsing fails fast on the first malformed token.
pub fn load_samples<P: AsRef<Path>>(file: P) -> Result<Vec<f64>> {
    let file = file.as_ref();
    let contents =
        fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

    let mut samples = Vec::new();
    for (i_line, line) in contents.lines().enumerate() {
        for token in line.split_whitespace() {
            let sample: f64 = token
                .parse()
                .with_context(|| format!("invalid sample {token:?} on line {}", i_line + 1))?;
            samples.push(sample);
        }
    }

    Ok(samples)
}
