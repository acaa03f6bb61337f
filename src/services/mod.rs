pub mod fetcher;
pub mod naming;
pub mod poller;
pub mod storage;
pub mod transcribe_service;
pub mod transcription;
