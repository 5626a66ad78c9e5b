//! Core compression functionality

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Supported compression algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// gzip (RFC 1952)
    Gzip,
    /// Brotli
    #[serde(rename = "br")]
    Brotli,
    /// Zstandard
    Zstd,
}

impl CompressionAlgorithm {
    /// Get the Content-Encoding header value
    pub fn encoding_name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Brotli => "br",
            Self::Zstd => "zstd",
        }
    }

    /// Highest level the codec understands; larger levels are clamped
    pub fn max_level(&self) -> u32 {
        match self {
            Self::Gzip => 9,
            Self::Brotli => 11,
            Self::Zstd => 22,
        }
    }

    /// Parse a content-coding token
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => Some(Self::Gzip),
            "br" => Some(Self::Brotli),
            "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }
}

/// Compressor for response bodies
#[derive(Debug)]
pub struct Compressor;

impl Compressor {
    /// Compress data using the specified algorithm and level
    pub fn compress(
        data: &[u8],
        algorithm: CompressionAlgorithm,
        level: u32,
    ) -> Result<Bytes, std::io::Error> {
        let level = level.min(algorithm.max_level());
        match algorithm {
            CompressionAlgorithm::Gzip => Self::compress_gzip(data, level),
            CompressionAlgorithm::Brotli => Self::compress_brotli(data, level),
            CompressionAlgorithm::Zstd => Self::compress_zstd(data, level),
        }
    }

    fn compress_gzip(data: &[u8], level: u32) -> Result<Bytes, std::io::Error> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
        encoder.write_all(data)?;
        Ok(Bytes::from(encoder.finish()?))
    }

    fn compress_brotli(data: &[u8], level: u32) -> Result<Bytes, std::io::Error> {
        let mut compressed = Vec::new();
        brotli::BrotliCompress(
            &mut std::io::Cursor::new(data),
            &mut compressed,
            &brotli::enc::BrotliEncoderParams {
                quality: level as i32,
                ..Default::default()
            },
        )?;
        Ok(Bytes::from(compressed))
    }

    fn compress_zstd(data: &[u8], level: u32) -> Result<Bytes, std::io::Error> {
        let compressed = zstd::encode_all(data, level as i32)?;
        Ok(Bytes::from(compressed))
    }

    /// Negotiate compression algorithm based on Accept-Encoding header
    ///
    /// Entries are weighted by their `q` parameter (default 1). `q=0`
    /// excludes a coding and `*` covers codings not listed explicitly. The
    /// highest weight wins; ties go to the earlier entry in `preferred`.
    pub fn negotiate_algorithm(
        accept_encoding: Option<&str>,
        preferred: &[CompressionAlgorithm],
    ) -> Option<CompressionAlgorithm> {
        let accepted = parse_accept_encoding(accept_encoding?);

        let weight_of = |algo: &CompressionAlgorithm| -> f32 {
            accepted
                .iter()
                .find(|(coding, _)| CompressionAlgorithm::from_name(coding) == Some(*algo))
                .or_else(|| accepted.iter().find(|(coding, _)| coding == "*"))
                .map_or(0.0, |(_, q)| *q)
        };

        let mut best: Option<(CompressionAlgorithm, f32)> = None;
        for algo in preferred {
            let q = weight_of(algo);
            if q > 0.0 && best.map_or(true, |(_, best_q)| q > best_q) {
                best = Some((*algo, q));
            }
        }
        best.map(|(algo, _)| algo)
    }
}

/// Split an Accept-Encoding value into lowercase codings and their weights.
/// Entries with a malformed `q` are dropped.
fn parse_accept_encoding(value: &str) -> Vec<(String, f32)> {
    value
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let coding = parts.next()?.trim().to_ascii_lowercase();
            if coding.is_empty() {
                return None;
            }
            let mut q = 1.0;
            for param in parts {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    q = value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q))?;
                }
            }
            Some((coding, q))
        })
        .collect()
}
