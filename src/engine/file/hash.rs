use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use sha2::digest::DynDigest;

use crate::domain::error::ExpectationError;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithms available to `expect_file_hash_to_equal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b,
    Blake2s,
}

impl HashAlgorithm {
    pub const ALL: [Self; 14] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b,
        Self::Blake2s,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake2b => "blake2b",
            Self::Blake2s => "blake2s",
        }
    }

    /// Resolves a caller-supplied name. Case-insensitive; `sha-256`,
    /// `sha3-256` and `sha512/256` spellings are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|ch| if ch == '-' || ch == '/' { '_' } else { ch })
            .collect();
        let normalized = match normalized.as_str() {
            "sha_1" => "sha1",
            "sha_224" => "sha224",
            "sha_256" => "sha256",
            "sha_384" => "sha384",
            "sha_512" => "sha512",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == normalized)
    }

    fn hasher(self) -> Box<dyn DynDigest> {
        match self {
            Self::Md5 => Box::new(md5::Md5::default()),
            Self::Sha1 => Box::new(sha1::Sha1::default()),
            Self::Sha224 => Box::new(sha2::Sha224::default()),
            Self::Sha256 => Box::new(sha2::Sha256::default()),
            Self::Sha384 => Box::new(sha2::Sha384::default()),
            Self::Sha512 => Box::new(sha2::Sha512::default()),
            Self::Sha512_224 => Box::new(sha2::Sha512_224::default()),
            Self::Sha512_256 => Box::new(sha2::Sha512_256::default()),
            Self::Sha3_224 => Box::new(sha3::Sha3_224::default()),
            Self::Sha3_256 => Box::new(sha3::Sha3_256::default()),
            Self::Sha3_384 => Box::new(sha3::Sha3_384::default()),
            Self::Sha3_512 => Box::new(sha3::Sha3_512::default()),
            Self::Blake2b => Box::new(blake2::Blake2b512::default()),
            Self::Blake2s => Box::new(blake2::Blake2s256::default()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ExpectationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let supported: Vec<&str> = Self::ALL.iter().map(|alg| alg.as_str()).collect();
            ExpectationError::invalid_parameter(
                "hash_alg",
                format!(
                    "unsupported hash algorithm `{s}`; expected one of: {}",
                    supported.join(", ")
                ),
            )
        })
    }
}

/// Streams `path` through `algorithm` and returns the lowercase hex digest.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, ExpectationError> {
    let file = File::open(path).map_err(|source| ExpectationError::io("open", path, source))?;
    hash_reader(file, algorithm).map_err(|source| ExpectationError::io("read", path, source))
}

pub fn hash_reader<R: Read>(reader: R, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
