// Algorithm selectors and the codec registry.
//
// Two pure, total lookups:
//   resolve(Algorithm)  -> CodecId
//   codec_for_id(CodecId) -> &'static dyn Codec
//
// Raw CodecId values match the platform compression library constants so
// they can be logged or stored alongside payloads unambiguously.

use std::fmt;
use std::str::FromStr;

use super::Codec;
use super::lz4::Lz4Codec;
use super::lzfse::LzfseCodec;
use super::lzma::LzmaCodec;
use super::zlib::ZlibCodec;

static LZ4: Lz4Codec = Lz4Codec;
static ZLIB: ZlibCodec = ZlibCodec::new(super::zlib::DEFAULT_LEVEL);
static LZMA: LzmaCodec = LzmaCodec;
static LZFSE: LzfseCodec = LzfseCodec;

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// Compression algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// LZ4: very fast, modest ratio.
    Fast,
    /// zlib level 5: balance between speed and ratio.
    Balanced,
    /// LZMA: best ratio, slowest.
    HighRatio,
    /// LZFSE: zlib-like ratio at much higher speed.
    #[default]
    PlatformOptimized,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fast,
        Algorithm::Balanced,
        Algorithm::HighRatio,
        Algorithm::PlatformOptimized,
    ];

    /// Name of the underlying codec.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fast => "lz4",
            Self::Balanced => "zlib",
            Self::HighRatio => "lzma",
            Self::PlatformOptimized => "lzfse",
        }
    }

    /// Descriptive class name.
    pub fn class(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::HighRatio => "high-ratio",
            Self::PlatformOptimized => "platform",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compression algorithm: {0:?}")]
pub struct ParseAlgorithmError(String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == lower || a.class() == lower)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CodecId
// ---------------------------------------------------------------------------

/// Identifier of an external codec.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecId {
    Lz4 = 0x100,
    Zlib = 0x205,
    Lzma = 0x306,
    Lzfse = 0x801,
}

impl CodecId {
    pub fn raw(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for CodecId {
    type Error = u16;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0x100 => Ok(Self::Lz4),
            0x205 => Ok(Self::Zlib),
            0x306 => Ok(Self::Lzma),
            0x801 => Ok(Self::Lzfse),
            other => Err(other),
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.raw())
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Map an algorithm selector to its codec identifier.
pub fn resolve(algorithm: Algorithm) -> CodecId {
    match algorithm {
        Algorithm::Fast => CodecId::Lz4,
        Algorithm::Balanced => CodecId::Zlib,
        Algorithm::HighRatio => CodecId::Lzma,
        Algorithm::PlatformOptimized => CodecId::Lzfse,
    }
}

/// Look up the codec registered under `id`.
pub fn codec_for_id(id: CodecId) -> &'static dyn Codec {
    match id {
        CodecId::Lz4 => &LZ4,
        CodecId::Zlib => &ZLIB,
        CodecId::Lzma => &LZMA,
        CodecId::Lzfse => &LZFSE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
