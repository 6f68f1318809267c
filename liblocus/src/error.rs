//! Objects related to reporting errors from this library

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error on the record file")]
    Io(#[from] std::io::Error),

    #[error("malformed record data")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
