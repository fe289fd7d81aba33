use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal server failures. Session-level errors are logged, not returned.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address.
        addr: SocketAddr,
        /// Underlying socket error.
        source: io::Error,
    },
    /// Accepting a connection failed.
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
    /// The backing image could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Image {
        /// Image path.
        path: PathBuf,
        /// Underlying file error.
        source: io::Error,
    },
    /// The backing image is not a whole number of 32-bit words.
    #[error("image {} is {len} bytes, not a multiple of 4", path.display())]
    ImageAlignment {
        /// Image path.
        path: PathBuf,
        /// Image length in bytes.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use super::ServerError;

    #[test]
    fn messages_name_the_offending_input() {
        let alignment = ServerError::ImageAlignment {
            path: PathBuf::from("mem.bin"),
            len: 6,
        };
        assert_eq!(
            alignment.to_string(),
            "image mem.bin is 6 bytes, not a multiple of 4"
        );

        let bind = ServerError::Bind {
            addr: "127.0.0.1:8000".parse().expect("literal address"),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(bind.to_string().starts_with("failed to bind 127.0.0.1:8000: "));
    }
}
