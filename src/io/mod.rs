pub mod csv_reader;
pub mod error;
pub mod parse;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use csv_reader::CsvAccountStream;
pub use error::IoError;
pub use parse::RawAccountRecord;
pub use request::{CreateTransferRequest, TransferCommand};
pub use response::{AccountView, ErrorOutput, TransferOutput, WalletView};
