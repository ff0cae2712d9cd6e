pub mod dispatch;
pub mod ingest;
pub mod replay;
pub mod search;
pub mod tools;
pub mod verify;
